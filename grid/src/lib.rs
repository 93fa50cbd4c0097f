#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tile storage and spatial predicates for Imla levels.
//!
//! A [`TileMap`] is a dense row-major arena of optional tiles. Points outside
//! the bounds and points without a tile are both treated as outside the
//! world: they are never walkable, never block sight and cost an infinite
//! amount to enter. None of the queries panic or return errors.

mod tile;

pub use tile::Tile;

use imla_core::Point;

/// Extra cost added to diagonal steps so that searches prefer straight lines
/// over zig-zags of the same Chebyshev length.
pub const DIAGONAL_PENALTY: f32 = 0.01;

/// Neighbor offsets in search order: diagonals first, then orthogonals.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
];

/// Dense, fixed-size grid of optional tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    width: u32,
    height: u32,
    tiles: Vec<Option<Tile>>,
}

impl TileMap {
    /// Creates a map of the provided dimensions without any tiles.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            tiles: vec![None; capacity],
        }
    }

    /// Creates a map where every point holds a copy of `tile`.
    #[must_use]
    pub fn filled(width: u32, height: u32, tile: Tile) -> Self {
        let mut map = Self::new(width, height);
        map.tiles.fill(Some(tile));
        map
    }

    /// Number of columns in the map.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the map.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether `0 <= x < width` and `0 <= y < height`.
    #[must_use]
    pub fn is_point_in_range(&self, point: Point) -> bool {
        self.index(point).is_some()
    }

    /// Tile stored at the point, if any.
    #[must_use]
    pub fn tile(&self, point: Point) -> Option<&Tile> {
        self.index(point)
            .and_then(|index| self.tiles.get(index))
            .and_then(Option::as_ref)
    }

    /// Mutable access to the tile stored at the point, if any.
    pub fn tile_mut(&mut self, point: Point) -> Option<&mut Tile> {
        let index = self.index(point)?;
        self.tiles.get_mut(index).and_then(Option::as_mut)
    }

    /// Stores a tile at the point. Returns `false` when the point is out of range.
    pub fn set_tile(&mut self, point: Point, tile: Tile) -> bool {
        match self.index(point).and_then(|index| self.tiles.get_mut(index)) {
            Some(slot) => {
                *slot = Some(tile);
                true
            }
            None => false,
        }
    }

    /// Removes the tile at the point, turning it into a hole in the world.
    pub fn clear_tile(&mut self, point: Point) -> Option<Tile> {
        let index = self.index(point)?;
        self.tiles.get_mut(index).and_then(Option::take)
    }

    /// Reports whether an actor could stand on the point.
    #[must_use]
    pub fn is_walkable(&self, point: Point) -> bool {
        self.tile(point).is_some_and(|tile| !tile.blocks_movement())
    }

    /// Reports whether the point occludes sight. Absent tiles never do.
    #[must_use]
    pub fn blocks_sight(&self, point: Point) -> bool {
        self.tile(point).is_some_and(Tile::blocks_sight)
    }

    /// King-move neighbors of `point` that exist and do not block movement.
    ///
    /// Returns `None` when `point` itself is out of range or absent. The four
    /// diagonals are yielded before the four orthogonals, which fixes the
    /// tie-break order of every search built on top of this map.
    #[must_use]
    pub fn neighbors(&self, point: Point) -> Option<Neighbors> {
        let _ = self.tile(point)?;

        let mut candidates = [None; 8];
        let mut count = 0;
        for offset in NEIGHBOR_OFFSETS {
            let candidate = point + offset;
            if self.is_walkable(candidate) {
                candidates[count] = Some(candidate);
                count += 1;
            }
        }

        Some(Neighbors {
            candidates,
            position: 0,
        })
    }

    /// Cost of stepping from `from` onto `to`.
    ///
    /// Equals the movement weight of `to`, plus [`DIAGONAL_PENALTY`] when the
    /// step changes both coordinates. Absent targets cost `f32::INFINITY`.
    #[must_use]
    pub fn weight(&self, from: Point, to: Point) -> f32 {
        let Some(tile) = self.tile(to) else {
            return f32::INFINITY;
        };

        if from.is_diagonal_to(to) {
            tile.movement_weight() + DIAGONAL_PENALTY
        } else {
            tile.movement_weight()
        }
    }

    /// Iterates every in-range point in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let width = i32::try_from(self.width).unwrap_or(i32::MAX);
        let height = i32::try_from(self.height).unwrap_or(i32::MAX);
        (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }

    /// Iterates every stored tile together with its point.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Tile)> + '_ {
        self.points()
            .zip(self.tiles.iter())
            .filter_map(|(point, tile)| tile.as_ref().map(|tile| (point, tile)))
    }

    /// Number of tiles currently visible.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.tiles
            .iter()
            .flatten()
            .filter(|tile| tile.is_visible())
            .count()
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = u32::try_from(point.x()).ok()?;
        let y = u32::try_from(point.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(y).ok()?;
        let column = usize::try_from(x).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Fixed-capacity iterator over the walkable neighbors of a point.
#[derive(Clone, Debug)]
pub struct Neighbors {
    candidates: [Option<Point>; 8],
    position: usize,
}

impl Iterator for Neighbors {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.candidates.get(self.position).copied().flatten();
        if next.is_some() {
            self.position += 1;
        }
        next
    }
}
