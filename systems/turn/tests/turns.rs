use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use imla_core::{
    AiState, Command, Direction, Event, Intent, MonsterProfile, PlayerProfile, Point,
};
use imla_grid::{Tile, TileMap};
use imla_system_turn::{Config, TurnController};
use imla_world::{self as world, query, LevelLayout, World};

fn open_world(width: u32, height: u32) -> World {
    World::new(TileMap::filled(width, height, Tile::floor()))
}

fn spawn(world: &mut World, commands: Vec<Command>) {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    assert!(
        !events
            .iter()
            .any(|event| matches!(event, Event::CommandRejected { .. })),
        "setup rejected: {events:?}"
    );
}

fn monster_moves(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::MonsterMoved { .. }))
        .count()
}

#[test]
fn fast_monster_takes_two_steps_per_turn() {
    let mut world = open_world(8, 3);
    spawn(
        &mut world,
        vec![
            Command::SpawnPlayer {
                at: Point::new(0, 1),
                profile: PlayerProfile::default(),
            },
            Command::SpawnMonster {
                at: Point::new(7, 1),
                profile: MonsterProfile::orc().with_speed(24),
            },
        ],
    );
    let mut controller = TurnController::new(Config::new(1));
    let _ = controller.begin_level(&mut world);

    let outcome = controller.resolve(&mut world, Intent::Wait);

    assert!(outcome.consumed());
    assert_eq!(monster_moves(outcome.events()), 2);
    let orc = query::monster_view(&world).into_vec().remove(0);
    assert_eq!(orc.position.chebyshev_distance(Point::new(0, 1)), 5);
    assert_eq!(orc.action_points, 0);
    assert_eq!(orc.state, AiState::Pursuing);
}

#[test]
fn slow_monster_acts_every_other_turn() {
    let mut world = open_world(8, 3);
    spawn(
        &mut world,
        vec![
            Command::SpawnPlayer {
                at: Point::new(0, 1),
                profile: PlayerProfile::default(),
            },
            Command::SpawnMonster {
                at: Point::new(7, 1),
                profile: MonsterProfile::orc().with_speed(6),
            },
        ],
    );
    let mut controller = TurnController::new(Config::new(1));
    let _ = controller.begin_level(&mut world);

    let moves: Vec<usize> = (0..4)
        .map(|_| monster_moves(controller.resolve(&mut world, Intent::Wait).events()))
        .collect();

    assert_eq!(moves, vec![0, 1, 0, 1]);
}

#[test]
fn non_consuming_intents_leave_the_world_alone() {
    let (mut world, _) = LevelLayout::parse("#####\n#@.o#\n#####", PlayerProfile::default())
        .expect("valid layout")
        .into_world();
    let mut controller = TurnController::new(Config::new(3));

    for intent in [Intent::Confirm, Intent::Cancel, Intent::OpenMenu] {
        let outcome = controller.resolve(&mut world, intent);
        assert!(!outcome.consumed());
        assert!(outcome.events().is_empty());
        assert!(outcome.player_alive());
    }
    assert_eq!(query::turn(&world), 0);
}

#[test]
fn bumping_a_wall_still_consumes_the_turn() {
    let (mut world, _) = LevelLayout::parse("###\n#@#\n###", PlayerProfile::default())
        .expect("valid layout")
        .into_world();
    let mut controller = TurnController::new(Config::new(3));

    let outcome = controller.resolve(&mut world, Intent::MoveOrAttack(Direction::North));

    assert!(outcome.consumed());
    assert!(outcome.events().contains(&Event::PlayerBlocked {
        target: Point::new(1, 0)
    }));
    assert!(outcome
        .events()
        .contains(&Event::TurnAdvanced { turn: 1 }));
}

#[test]
fn moving_into_a_monster_attacks_it() {
    let (mut world, _) = LevelLayout::parse("#####\n#@o.#\n#####", PlayerProfile::default())
        .expect("valid layout")
        .into_world();
    let mut controller = TurnController::new(Config::new(11));
    let _ = controller.begin_level(&mut world);

    let mut killed = false;
    for _ in 0..10 {
        let outcome = controller.resolve(&mut world, Intent::MoveOrAttack(Direction::East));
        assert!(!outcome
            .events()
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. })));
        if outcome
            .events()
            .iter()
            .any(|event| matches!(event, Event::MonsterDied { .. }))
        {
            killed = true;
            break;
        }
    }

    assert!(killed, "the orc should fall within ten swings");
    assert_eq!(query::monster_view(&world).iter().count(), 0);
    assert_eq!(query::floor_items(&world).len(), 1);
}

#[test]
fn monster_pass_stops_once_the_player_dies() {
    let fragile = PlayerProfile {
        health_max: 0.5,
        ..PlayerProfile::default()
    };
    let (mut world, _) = LevelLayout::parse("#####\n#o@o#\n#####", fragile)
        .expect("valid layout")
        .into_world();
    let mut controller = TurnController::new(Config::new(5));

    let outcome = controller.resolve(&mut world, Intent::Wait);

    let hits = outcome
        .events()
        .iter()
        .filter(|event| matches!(event, Event::PlayerDamaged { .. }))
        .count();
    assert_eq!(hits, 1);
    assert!(!outcome.player_alive());
    assert!(outcome
        .events()
        .iter()
        .any(|event| matches!(event, Event::PlayerDied { .. })));

    let after = controller.resolve(&mut world, Intent::Wait);
    assert!(!after.consumed());
}

#[test]
fn walled_off_monster_stays_idle() {
    let layout = "\
#######
#.....#
#######
#..o..#
#..@..#
#######
";
    let mut world = LevelLayout::parse(layout, PlayerProfile::default())
        .expect("valid layout")
        .into_world()
        .0;
    let orc = query::monster_view(&world).into_vec().remove(0).id;
    let mut controller = TurnController::new(Config::new(9));

    let outcome = controller.resolve(&mut world, Intent::Wait);

    assert!(outcome.events().contains(&Event::MonsterStateChanged {
        monster: orc,
        from: AiState::Idle,
        to: AiState::Engaged
    }));

    let sealed = "\
#######
#..o..#
#######
#.....#
#..@..#
#######
";
    let mut world = LevelLayout::parse(sealed, PlayerProfile::default())
        .expect("valid layout")
        .into_world()
        .0;
    let orc = query::monster_view(&world).into_vec().remove(0).id;

    let outcome = controller.resolve(&mut world, Intent::Wait);

    assert!(outcome
        .events()
        .contains(&Event::MonsterIdled { monster: orc }));
    assert_eq!(monster_moves(outcome.events()), 0);
}

#[test]
fn monster_follows_the_last_seen_route_around_a_corner() {
    let layout = "\
#########
#o.....@#
#######.#
#######.#
#######.#
#######.#
#########
";
    let (mut world, _) = LevelLayout::parse(layout, PlayerProfile::default())
        .expect("valid layout")
        .into_world();
    let orc = query::monster_view(&world).into_vec().remove(0).id;
    let mut controller = TurnController::new(Config::new(17));
    let _ = controller.begin_level(&mut world);

    let mut intents = vec![Intent::Wait];
    intents.extend(std::iter::repeat(Intent::MoveOrAttack(Direction::South)).take(3));
    intents.extend(std::iter::repeat(Intent::Wait).take(8));

    let mut events = Vec::new();
    for intent in intents {
        events.extend(controller.resolve(&mut world, intent).into_events());
    }

    assert!(
        events.contains(&Event::MonsterMoved {
            monster: orc,
            from: Point::new(6, 1),
            to: Point::new(7, 2)
        }),
        "orc never reached the last seen tile"
    );
    let snapshot = query::monster(&world, orc).expect("orc alive");
    assert_eq!(snapshot.position, Point::new(7, 3));
    assert_eq!(snapshot.state, AiState::Engaged);
    assert_eq!(query::player_position(&world), Some(Point::new(7, 4)));
}

const ARENA: &str = "\
############
#@....:....#
#..##...g..#
#..#..o....#
#.....^..o.#
#=...$.....#
############
";

fn scripted_intents() -> Vec<Intent> {
    let mut script = vec![
        Intent::MoveOrAttack(Direction::East),
        Intent::MoveOrAttack(Direction::SouthEast),
        Intent::Wait,
        Intent::Cancel,
        Intent::MoveOrAttack(Direction::East),
        Intent::MoveOrAttack(Direction::South),
    ];
    script.extend(std::iter::repeat(Intent::MoveOrAttack(Direction::East)).take(12));
    script
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    monsters: Vec<(u32, Point, u32)>,
    player: Option<(Point, u32)>,
    turn: u64,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.events.len().hash(&mut hasher);
        self.monsters.hash(&mut hasher);
        self.player.hash(&mut hasher);
        self.turn.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(seed: u64) -> ReplayOutcome {
    let (mut world, mut events) = LevelLayout::parse(ARENA, PlayerProfile::default())
        .expect("valid layout")
        .into_world();
    let mut controller = TurnController::new(Config::new(seed));
    events.extend(controller.begin_level(&mut world));

    for intent in scripted_intents() {
        events.extend(controller.resolve(&mut world, intent).into_events());
    }

    ReplayOutcome {
        events,
        monsters: query::monster_view(&world)
            .iter()
            .map(|monster| {
                (
                    monster.id.get(),
                    monster.position,
                    monster.health.to_bits(),
                )
            })
            .collect(),
        player: query::player(&world).map(|player| (player.position, player.health.to_bits())),
        turn: query::turn(&world),
    }
}

#[test]
fn scripted_session_replays_identically() {
    let first = replay(42);
    let second = replay(42);

    assert_eq!(first, second, "turn replay diverged");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.turn > 0);
}
