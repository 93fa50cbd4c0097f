#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that resolves one player intent into a full game turn.
//!
//! A consuming intent runs the player's action, refreshes visibility, ticks the
//! world, lets every live monster spend its action points in collection order,
//! applies floor effects and finally compacts dead monsters before the closing
//! visibility refresh.

use imla_core::{Command, DamageType, Direction, Event, Intent, MonsterId, BASE_SPEED};
use imla_system_combat::roll_damage;
use imla_system_monster_ai::MonsterAi;
use imla_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Configuration parameters for the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding every damage roll.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed used for the controller's random number generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Result of resolving one intent.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    consumed: bool,
    events: Vec<Event>,
    player_alive: bool,
}

impl TurnOutcome {
    /// Whether the intent advanced the game by one turn.
    #[must_use]
    pub const fn consumed(&self) -> bool {
        self.consumed
    }

    /// Events produced while resolving the turn, in order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Whether the player survived the turn.
    #[must_use]
    pub const fn player_alive(&self) -> bool {
        self.player_alive
    }

    /// Consumes the outcome, yielding the produced events.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

/// Orchestrates player actions and the monster pass.
#[derive(Debug)]
pub struct TurnController {
    rng: ChaCha8Rng,
    ai: MonsterAi,
    commands: Vec<Command>,
}

impl TurnController {
    /// Creates a controller using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            ai: MonsterAi::new(),
            commands: Vec::new(),
        }
    }

    /// Prepares a freshly loaded level by computing the initial field of view.
    pub fn begin_level(&mut self, world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(world, Command::RefreshVisibility, &mut events);
        events
    }

    /// Resolves a single intent.
    ///
    /// Intents that do not consume the turn, and any intent issued once the
    /// player is dead, leave the world untouched.
    pub fn resolve(&mut self, world: &mut World, intent: Intent) -> TurnOutcome {
        if !intent.consumes_turn() || !query::is_player_alive(world) {
            return TurnOutcome {
                consumed: false,
                events: Vec::new(),
                player_alive: query::is_player_alive(world),
            };
        }

        let mut events = Vec::new();
        if let Intent::MoveOrAttack(direction) = intent {
            self.resolve_player_action(world, direction, &mut events);
        }

        world::apply(world, Command::RefreshVisibility, &mut events);
        world::apply(world, Command::Tick, &mut events);
        self.monster_pass(world, &mut events);
        world::apply(world, Command::TickEffects, &mut events);
        world::apply(world, Command::RemoveDead, &mut events);
        world::apply(world, Command::RefreshVisibility, &mut events);

        let player_alive = query::is_player_alive(world);
        tracing::debug!(
            turn = query::turn(world),
            events = events.len(),
            player_alive,
            "turn resolved"
        );

        TurnOutcome {
            consumed: true,
            events,
            player_alive,
        }
    }

    fn resolve_player_action(
        &mut self,
        world: &mut World,
        direction: Direction,
        events: &mut Vec<Event>,
    ) {
        let Some(player) = query::player(world) else {
            return;
        };
        let target = player.position.offset(direction);

        let command = if let Some(monster) = query::monster_at(world, target) {
            Command::PlayerAttack {
                monster,
                damage: roll_damage(&mut self.rng, player.attack_power, DamageType::Physical),
            }
        } else if query::interactable_at(world, target).is_some() {
            Command::Interact { at: target }
        } else {
            Command::MovePlayer { direction }
        };
        world::apply(world, command, events);
    }

    fn monster_pass(&mut self, world: &mut World, events: &mut Vec<Event>) {
        let roster: Vec<MonsterId> = query::monster_view(world)
            .iter()
            .map(|monster| monster.id)
            .collect();

        for monster in roster {
            while let Some(before) = query::monster(world, monster).map(|m| m.action_points) {
                if !query::is_player_alive(world) {
                    return;
                }
                if before < BASE_SPEED {
                    break;
                }

                self.commands.clear();
                self.ai.handle(world, monster, &mut self.rng, &mut self.commands);
                for command in self.commands.drain(..) {
                    world::apply(world, command, events);
                }

                let spent = query::monster(world, monster)
                    .map_or(true, |snapshot| snapshot.action_points < before);
                if !spent {
                    tracing::warn!(monster = monster.get(), "monster decision did not act");
                    break;
                }
            }
        }
    }
}
