#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision making for monsters.
//!
//! Every decision inspects the world through [`imla_world::query`] and emits
//! exactly one action command (`MonsterAttack`, `StepMonster` or
//! `MonsterWait`), optionally preceded by `SetMonsterPath`. The world owns the
//! resulting state transitions between idle, pursuing and engaged.

use imla_core::{Behavior, Command, DamageType, MonsterId, Point};
use imla_system_combat::roll_damage;
use imla_system_pathfinding::find_path;
use imla_system_visibility::are_points_in_los;
use imla_world::{query, World};
use rand::Rng;

/// Pure system that chooses the next action of a monster.
#[derive(Debug, Default)]
pub struct MonsterAi {
    route: Vec<Point>,
}

impl MonsterAi {
    /// Creates a new monster AI system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits the commands for one action of `monster`.
    ///
    /// Nothing is emitted when the monster no longer exists.
    pub fn handle<R>(
        &mut self,
        world: &World,
        monster: MonsterId,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: Rng + ?Sized,
    {
        let Some(snapshot) = query::monster(world, monster) else {
            return;
        };

        let target = match query::player_position(world) {
            Some(position) if query::is_player_alive(world) => position,
            _ => {
                out.push(Command::MonsterWait { monster });
                return;
            }
        };

        let map = query::tile_map(world);
        let position = snapshot.position;
        let distance = position.chebyshev_distance(target);
        let sees_target = || are_points_in_los(map, position, target);

        let in_reach = match snapshot.behavior {
            Behavior::Melee => distance <= 1,
            Behavior::Ranged { reach } => distance <= reach && sees_target(),
        };
        if in_reach {
            out.push(Command::MonsterAttack {
                monster,
                damage: roll_damage(rng, snapshot.attack_power, DamageType::Physical),
            });
            return;
        }

        if distance <= snapshot.sight_range && sees_target() {
            if self.plan_route(world, position, target, monster) {
                out.push(Command::SetMonsterPath {
                    monster,
                    path: self.route.clone(),
                });
                out.push(Command::StepMonster { monster });
            } else {
                out.push(Command::MonsterWait { monster });
            }
            return;
        }

        if snapshot.next_step.is_some() {
            out.push(Command::StepMonster { monster });
        } else {
            out.push(Command::MonsterWait { monster });
        }
    }

    /// Plans a route that ends on `target`, returning whether any step remains.
    fn plan_route(
        &mut self,
        world: &World,
        from: Point,
        target: Point,
        monster: MonsterId,
    ) -> bool {
        self.route.clear();
        match find_path(query::tile_map(world), from, target) {
            Ok(path) => {
                self.route.extend(path);
                !self.route.is_empty()
            }
            Err(error) => {
                tracing::warn!(monster = monster.get(), %error, "monster cannot reach the player");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imla_core::PlayerProfile;
    use imla_world::LevelLayout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn world_from(text: &str) -> World {
        LevelLayout::parse(text, PlayerProfile::default())
            .expect("valid layout")
            .into_world()
            .0
    }

    fn first_monster(world: &World) -> MonsterId {
        query::monster_view(world)
            .iter()
            .next()
            .map(|monster| monster.id)
            .expect("monster present")
    }

    fn decide(world: &World) -> Vec<Command> {
        let mut ai = MonsterAi::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut out = Vec::new();
        ai.handle(world, first_monster(world), &mut rng, &mut out);
        out
    }

    #[test]
    fn adjacent_orc_attacks_with_rolled_damage() {
        let world = world_from("#####\n#@o.#\n#####");

        let commands = decide(&world);

        let [Command::MonsterAttack { damage, .. }] = commands.as_slice() else {
            panic!("expected a single attack, got {commands:?}");
        };
        assert!((1..=3).contains(&damage.amount()));
        assert_eq!(damage.kind(), DamageType::Physical);
    }

    #[test]
    fn orc_that_sees_the_player_walks_towards_it() {
        let world = world_from("#######\n#@...o#\n#######");
        let orc = first_monster(&world);

        let commands = decide(&world);

        assert_eq!(
            commands,
            vec![
                Command::SetMonsterPath {
                    monster: orc,
                    path: vec![
                        Point::new(4, 1),
                        Point::new(3, 1),
                        Point::new(2, 1),
                        Point::new(1, 1),
                    ],
                },
                Command::StepMonster { monster: orc },
            ]
        );
    }

    #[test]
    fn orc_without_sight_of_the_player_waits() {
        let world = world_from("#######\n#@#..o#\n#######");
        let orc = first_monster(&world);

        assert_eq!(decide(&world), vec![Command::MonsterWait { monster: orc }]);
    }

    #[test]
    fn orc_keeps_following_a_stored_route_after_losing_sight() {
        let mut world = world_from("#######\n#@#..o#\n#######");
        let orc = first_monster(&world);
        let mut events = Vec::new();
        imla_world::apply(
            &mut world,
            Command::SetMonsterPath {
                monster: orc,
                path: vec![Point::new(4, 1), Point::new(3, 1)],
            },
            &mut events,
        );

        assert_eq!(decide(&world), vec![Command::StepMonster { monster: orc }]);
    }

    #[test]
    fn archer_shoots_from_within_reach() {
        let world = world_from("#######\n#@..g.#\n#######");

        assert!(matches!(
            decide(&world).as_slice(),
            [Command::MonsterAttack { .. }]
        ));
    }

    #[test]
    fn archer_out_of_reach_approaches() {
        let world = world_from("##########\n#@......g#\n##########");

        assert!(matches!(
            decide(&world).as_slice(),
            [Command::SetMonsterPath { .. }, Command::StepMonster { .. }]
        ));
    }
}
