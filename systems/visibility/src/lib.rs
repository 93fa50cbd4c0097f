#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Field-of-view and line-of-sight computations over a [`TileMap`].
//!
//! [`refresh_visibility`] runs recursive shadowcasting from an origin and
//! writes `is_in_los`, `is_visible` and `has_been_visible` onto every tile it
//! reaches. [`are_points_in_los`] answers a direct point-to-point question by
//! rasterizing the segment between the two points.

mod octant;
mod shadow;

use bresenham::Bresenham;
use imla_core::Point;
use imla_grid::TileMap;

use crate::{
    octant::Octant,
    shadow::{Shadow, ShadowLine},
};

/// Recomputes visibility from `origin` and returns the number of visible tiles.
///
/// The origin tile itself is always in line of sight and visible. Tiles
/// further than `sight_range` rows from the origin along an octant's major
/// axis may be in line of sight but are never visible. A sweep from a point
/// outside the map leaves every tile untouched.
pub fn refresh_visibility(map: &mut TileMap, origin: Point, sight_range: u32) -> usize {
    if !map.is_point_in_range(origin) {
        tracing::debug!(?origin, "visibility origin outside the map");
        return map.visible_count();
    }

    if let Some(tile) = map.tile_mut(origin) {
        tile.mark_sight(true, true);
    }

    for octant in Octant::ALL {
        scan_octant(map, origin, sight_range, octant);
    }

    let visible = map.visible_count();
    tracing::trace!(?origin, sight_range, visible, "visibility refreshed");
    visible
}

fn scan_octant(map: &mut TileMap, origin: Point, sight_range: u32, octant: Octant) {
    let mut line = ShadowLine::default();
    let mut full_shadow = false;

    for row in 1_u32.. {
        let Ok(row_offset) = i32::try_from(row) else {
            break;
        };
        if octant.has_left(map, origin + octant.transform(row_offset, 0)) {
            break;
        }

        let in_range = row <= sight_range;
        for col in 0..=row {
            let Ok(col_offset) = i32::try_from(col) else {
                break;
            };
            let point = origin + octant.transform(row_offset, col_offset);
            let Some(tile) = map.tile_mut(point) else {
                continue;
            };

            if full_shadow {
                tile.mark_sight(false, false);
                continue;
            }

            let projection = Shadow::project_tile(row, col);
            let in_los = !line.is_in_shadow(&projection);
            tile.mark_sight(in_los, in_range);

            if in_los && tile.blocks_sight() {
                line.add(projection);
                full_shadow = line.is_full_shadow();
            }
        }
    }
}

/// Reports whether nothing opaque lies on the straight line from `from` to `to`.
///
/// Both endpoints are included in the test, so an opaque endpoint breaks line
/// of sight. A point always sees itself. Absent tiles never block.
#[must_use]
pub fn are_points_in_los(map: &TileMap, from: Point, to: Point) -> bool {
    if from == to {
        return true;
    }

    let start = (from.x() as isize, from.y() as isize);
    let end = (to.x() as isize, to.y() as isize);
    Bresenham::new(start, end)
        .chain(std::iter::once(end))
        .all(|(x, y)| !map.blocks_sight(rasterized_point(x, y)))
}

fn rasterized_point(x: isize, y: isize) -> Point {
    let x = i32::try_from(x).unwrap_or(i32::MAX);
    let y = i32::try_from(y).unwrap_or(i32::MAX);
    Point::new(x, y)
}
