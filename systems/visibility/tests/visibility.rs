use imla_core::Point;
use imla_grid::{Tile, TileMap};
use imla_system_visibility::{are_points_in_los, refresh_visibility};

/// 12x12 floor with a closed wall ring spanning (2,2)..=(7,7).
fn sealed_room_map() -> TileMap {
    let mut map = TileMap::filled(12, 12, Tile::floor());
    for i in 2..=7 {
        for point in [
            Point::new(i, 2),
            Point::new(i, 7),
            Point::new(2, i),
            Point::new(7, i),
        ] {
            assert!(map.set_tile(point, Tile::wall()));
        }
    }
    map
}

fn inside_room(point: Point) -> bool {
    (2..=7).contains(&point.x()) && (2..=7).contains(&point.y())
}

#[test]
fn sealed_room_hides_the_outside() {
    let mut map = sealed_room_map();

    for origin in [Point::new(3, 3), Point::new(4, 5), Point::new(6, 6)] {
        let _ = refresh_visibility(&mut map, origin, 30);

        for (point, tile) in map.iter() {
            if !inside_room(point) {
                assert!(
                    !tile.is_visible(),
                    "{point:?} outside the room is visible from {origin:?}"
                );
                assert!(!tile.has_been_visible());
            }
        }
    }
}

#[test]
fn repeated_sweeps_are_identical() {
    let mut first = sealed_room_map();
    assert!(first.set_tile(Point::new(7, 4), Tile::floor()));
    let mut second = first.clone();

    let _ = refresh_visibility(&mut first, Point::new(4, 4), 6);
    let _ = refresh_visibility(&mut second, Point::new(4, 4), 6);
    let _ = refresh_visibility(&mut second, Point::new(4, 4), 6);

    assert_eq!(first, second);
}

#[test]
fn visibility_invariants_hold_while_walking() {
    let mut map = sealed_room_map();
    assert!(map.set_tile(Point::new(7, 4), Tile::floor()));

    let walk = [
        Point::new(3, 4),
        Point::new(5, 4),
        Point::new(7, 4),
        Point::new(9, 4),
        Point::new(10, 10),
        Point::new(4, 4),
    ];

    let mut remembered: Vec<Point> = Vec::new();
    for origin in walk {
        let _ = refresh_visibility(&mut map, origin, 5);

        for (point, tile) in map.iter() {
            if tile.is_visible() {
                assert!(tile.is_in_los(), "{point:?} visible without LOS");
                assert!(tile.has_been_visible(), "{point:?} visible but not remembered");
            }
        }
        for point in &remembered {
            assert!(map.tile(*point).expect("tile").has_been_visible());
        }
        remembered = map
            .iter()
            .filter(|(_, tile)| tile.has_been_visible())
            .map(|(point, _)| point)
            .collect();
    }
}

#[test]
fn wall_row_cuts_line_of_sight() {
    let mut map = TileMap::filled(6, 6, Tile::floor());
    for x in 0..6 {
        assert!(map.set_tile(Point::new(x, 2), Tile::wall()));
    }

    assert!(!are_points_in_los(&map, Point::new(0, 0), Point::new(0, 5)));
    assert!(are_points_in_los(&map, Point::new(0, 3), Point::new(5, 5)));
}
