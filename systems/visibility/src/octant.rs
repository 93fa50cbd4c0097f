//! Coordinate frames of the eight 45 degree scan wedges.

use imla_core::Point;
use imla_grid::TileMap;

/// One of the eight wedges, numbered clockwise from twelve o'clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Octant(u8);

impl Octant {
    pub(crate) const ALL: [Octant; 8] = [
        Octant(0),
        Octant(1),
        Octant(2),
        Octant(3),
        Octant(4),
        Octant(5),
        Octant(6),
        Octant(7),
    ];

    /// Maps octant-local `(row, col)` to a world offset `(dx, dy)`.
    pub(crate) const fn transform(self, row: i32, col: i32) -> (i32, i32) {
        match self.0 {
            0 => (col, -row),
            1 => (row, -col),
            2 => (row, col),
            3 => (col, row),
            4 => (-col, row),
            5 => (-row, col),
            6 => (-row, -col),
            _ => (-col, -row),
        }
    }

    /// Whether the axis point of a row has stepped past the edge this octant
    /// scans toward.
    pub(crate) fn has_left(self, map: &TileMap, axis: Point) -> bool {
        let width = i64::from(map.width());
        let height = i64::from(map.height());
        match self.0 {
            0 | 7 => axis.y() < 0,
            3 | 4 => i64::from(axis.y()) >= height,
            1 | 2 => i64::from(axis.x()) >= width,
            _ => axis.x() < 0,
        }
    }
}
