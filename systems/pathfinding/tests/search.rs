use imla_core::Point;
use imla_grid::{Tile, TileMap};
use imla_system_pathfinding::{a_star, dijkstra, find_path, PathError};

fn walled_map(gap: Option<i32>) -> TileMap {
    let mut map = TileMap::filled(6, 6, Tile::floor());
    for x in 0..6 {
        if Some(x) != gap {
            assert!(map.set_tile(Point::new(x, 2), Tile::wall()));
        }
    }
    map
}

#[test]
fn a_star_matches_dijkstra_cost_on_open_grid() {
    let map = TileMap::filled(10, 10, Tile::floor());
    let pairs = [
        (Point::new(0, 0), Point::new(7, 3)),
        (Point::new(2, 9), Point::new(9, 0)),
        (Point::new(5, 5), Point::new(0, 5)),
        (Point::new(9, 9), Point::new(0, 0)),
    ];

    for (start, goal) in pairs {
        let uniform = dijkstra(&map, start, goal);
        let guided = a_star(&map, start, goal);

        let uniform_cost = uniform.cost_to(goal).expect("dijkstra reaches goal");
        let guided_cost = guided.cost_to(goal).expect("a* reaches goal");
        assert!(
            (uniform_cost - guided_cost).abs() < 1e-4,
            "{start:?} -> {goal:?}: dijkstra {uniform_cost}, a* {guided_cost}"
        );

        let uniform_path = uniform.path(start, goal).expect("dijkstra path");
        let guided_path = guided.path(start, goal).expect("a* path");
        assert!(guided_path.len() <= uniform_path.len());
        assert_eq!(
            guided_path.len() as u32,
            start.chebyshev_distance(goal),
            "open grid paths take one king move per step"
        );
        assert_eq!(guided_path.last(), Some(&goal));
    }
}

#[test]
fn paths_prefer_straight_lines_over_zig_zags() {
    let map = TileMap::filled(8, 3, Tile::floor());

    let path = find_path(&map, Point::new(0, 1), Point::new(6, 1)).expect("path");

    assert!(path.iter().all(|point| point.y() == 1), "path wandered: {path:?}");
}

#[test]
fn sealed_wall_reports_no_path() {
    let map = walled_map(None);

    assert_eq!(
        find_path(&map, Point::new(0, 0), Point::new(0, 5)),
        Err(PathError::Unreachable {
            goal: Point::new(0, 5)
        })
    );
    assert!(!dijkstra(&map, Point::new(0, 0), Point::new(0, 5)).reached(Point::new(0, 5)));
}

#[test]
fn wall_with_gap_is_routed_around() {
    let map = walled_map(Some(5));

    let path = find_path(&map, Point::new(0, 0), Point::new(0, 5)).expect("path through gap");

    assert!(path.contains(&Point::new(5, 2)));
    assert_eq!(path.last(), Some(&Point::new(0, 5)));
    for window in path.windows(2) {
        assert_eq!(window[0].chebyshev_distance(window[1]), 1);
    }
    assert!(path.iter().all(|point| map.is_walkable(*point)));
}

#[test]
fn searches_from_missing_tiles_reach_nothing() {
    let mut map = TileMap::filled(4, 4, Tile::floor());
    let _ = map.clear_tile(Point::new(0, 0));

    let result = a_star(&map, Point::new(0, 0), Point::new(3, 3));

    assert!(!result.reached(Point::new(3, 3)));
    assert_eq!(result.came_from().len(), 1);
}
