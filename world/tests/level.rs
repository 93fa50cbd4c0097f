use imla_core::{Command, Direction, Event, ItemDrop, ItemKind, PlayerProfile, Point};
use imla_world::{self as world, query, LevelLayout};

const CELLAR: &str = "\
#######
#@..o.#
#.##..#
#=..^$#
#######
";

#[test]
fn layout_populates_a_fresh_world() {
    let layout = LevelLayout::parse(CELLAR, PlayerProfile::default()).expect("valid layout");
    let (world, events) = layout.into_world();

    assert_eq!(
        events.first(),
        Some(&Event::PlayerSpawned {
            at: Point::new(1, 1)
        })
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CommandRejected { .. })));

    assert_eq!(query::monster_view(&world).into_vec().len(), 1);
    assert_eq!(query::interactables(&world).len(), 1);
    assert_eq!(query::floor_effects(&world).len(), 1);
    assert_eq!(
        query::floor_items(&world)
            .iter()
            .map(|item| item.drop)
            .collect::<Vec<_>>(),
        vec![ItemDrop::new(ItemKind::Gold, 5)]
    );
    assert!(query::tile_map(&world)
        .tile(Point::new(2, 2))
        .is_some_and(|tile| tile.blocks_sight()));
}

#[test]
fn visibility_refresh_hides_tiles_behind_the_inner_wall() {
    let layout = LevelLayout::parse(CELLAR, PlayerProfile::default()).expect("valid layout");
    let (mut world, _) = layout.into_world();

    let mut events = Vec::new();
    world::apply(&mut world, Command::RefreshVisibility, &mut events);

    let map = query::tile_map(&world);
    assert!(map.tile(Point::new(4, 1)).is_some_and(|tile| tile.is_visible()));
    assert!(map.tile(Point::new(3, 3)).is_some_and(|tile| !tile.is_visible()));
    let orc = query::monster_view(&world)
        .into_vec()
        .pop()
        .expect("orc spawned");
    assert!(orc.is_visible);
}

#[test]
fn walking_into_a_chest_is_blocked() {
    let layout = LevelLayout::parse(CELLAR, PlayerProfile::default()).expect("valid layout");
    let (mut world, _) = layout.into_world();

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::MovePlayer {
            direction: Direction::South,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::MovePlayer {
            direction: Direction::South,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![
            Event::PlayerMoved {
                from: Point::new(1, 1),
                to: Point::new(1, 2)
            },
            Event::PlayerBlocked {
                target: Point::new(1, 3)
            },
        ]
    );
}
