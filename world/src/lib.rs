#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for Imla.
//!
//! The [`World`] owns the tile map and every actor standing on it. It is only
//! mutated through [`apply`], which answers each [`Command`] with [`Event`]s;
//! systems read it through the [`query`] module.

mod actors;
mod layout;

use imla_core::{
    AiState, Command, Damage, DamageSource, EffectKind, Event, InteractionKind, ItemDrop,
    MonsterId, MonsterProfile, PlayerProfile, Point, Rejection, BASE_SPEED,
};
use imla_grid::TileMap;
use imla_system_combat::mitigate;
use imla_system_visibility::refresh_visibility;

use crate::actors::{Monster, Player};
pub use crate::{
    actors::{FloorEffect, FloorItem, Interactable, VisualEffect},
    layout::{LayoutError, LevelLayout},
};

/// Represents the authoritative state of one level.
#[derive(Debug)]
pub struct World {
    map: TileMap,
    player: Option<Player>,
    monsters: Vec<Monster>,
    next_monster_id: u32,
    floor_items: Vec<FloorItem>,
    floor_effects: Vec<FloorEffect>,
    interactables: Vec<Interactable>,
    visual_effects: Vec<VisualEffect>,
    turn: u64,
}

impl World {
    /// Creates an empty level over the provided tile map.
    #[must_use]
    pub fn new(map: TileMap) -> Self {
        Self {
            map,
            player: None,
            monsters: Vec::new(),
            next_monster_id: 0,
            floor_items: Vec::new(),
            floor_effects: Vec::new(),
            interactables: Vec::new(),
            visual_effects: Vec::new(),
            turn: 0,
        }
    }

    fn live_monster_index(&self, monster: MonsterId) -> Option<usize> {
        self.monsters
            .iter()
            .position(|candidate| candidate.alive && candidate.id == monster)
    }

    fn live_monster_at(&self, point: Point) -> Option<usize> {
        self.monsters
            .iter()
            .position(|monster| monster.alive && monster.position == point)
    }

    fn player_at(&self, point: Point) -> bool {
        self.player
            .as_ref()
            .is_some_and(|player| player.position == point)
    }

    fn interactable_at(&self, point: Point) -> Option<usize> {
        self.interactables
            .iter()
            .position(|interactable| interactable.at == point)
    }

    /// Whether an actor may step onto the point right now.
    fn is_free(&self, point: Point) -> bool {
        self.map.is_walkable(point)
            && !self.player_at(point)
            && self.live_monster_at(point).is_none()
            && self.interactable_at(point).is_none()
    }

    fn spawn_player(&mut self, at: Point, profile: PlayerProfile, out_events: &mut Vec<Event>) {
        if self.player.is_some() {
            out_events.push(rejected(Rejection::PlayerAlreadyPresent));
            return;
        }
        if !self.is_free(at) {
            out_events.push(rejected(Rejection::PointUnavailable { at }));
            return;
        }

        self.player = Some(Player::spawn(at, profile));
        out_events.push(Event::PlayerSpawned { at });
    }

    fn spawn_monster(&mut self, at: Point, profile: MonsterProfile, out_events: &mut Vec<Event>) {
        if !self.is_free(at) {
            out_events.push(rejected(Rejection::PointUnavailable { at }));
            return;
        }

        let monster = MonsterId::new(self.next_monster_id);
        self.next_monster_id = self.next_monster_id.saturating_add(1);
        self.monsters.push(Monster::spawn(monster, at, profile));
        tracing::debug!(monster = monster.get(), ?at, "monster spawned");
        out_events.push(Event::MonsterSpawned { monster, at });
    }

    fn drop_item(&mut self, at: Point, drop: ItemDrop, out_events: &mut Vec<Event>) {
        self.floor_items.push(FloorItem { at, drop });
        out_events.push(Event::ItemDropped { at, drop });
    }

    fn move_player(&mut self, direction: imla_core::Direction, out_events: &mut Vec<Event>) {
        let Some(from) = self.player.as_ref().map(|player| player.position) else {
            out_events.push(rejected(Rejection::PlayerMissing));
            return;
        };

        let to = from.offset(direction);
        if !self.is_free(to) {
            out_events.push(Event::PlayerBlocked { target: to });
            return;
        }

        if let Some(player) = self.player.as_mut() {
            player.position = to;
        }
        out_events.push(Event::PlayerMoved { from, to });
    }

    /// Applies damage to a live monster, handling death, drops and experience.
    fn damage_monster(
        &mut self,
        index: usize,
        damage: Damage,
        award_experience: bool,
        out_events: &mut Vec<Event>,
    ) {
        let Some(monster) = self.monsters.get_mut(index) else {
            return;
        };

        let amount = mitigate(damage, &monster.armor);
        monster.health -= amount;
        let (id, at, remaining) = (monster.id, monster.position, monster.health);
        self.visual_effects.push(VisualEffect::hit(at));
        out_events.push(Event::MonsterDamaged {
            monster: id,
            amount,
            remaining,
        });

        if remaining > 0.0 {
            return;
        }

        monster.alive = false;
        monster.path.clear();
        let drop = monster.drop;
        let reward = monster.xp_reward;
        tracing::debug!(monster = id.get(), ?at, "monster died");
        out_events.push(Event::MonsterDied { monster: id, at });

        if let Some(drop) = drop {
            self.drop_item(at, drop, out_events);
        }

        if award_experience {
            if let Some(player) = self.player.as_mut() {
                let levels = player.gain_experience(reward);
                out_events.push(Event::ExperienceGained {
                    amount: reward,
                    total: player.xp,
                });
                for level in levels {
                    out_events.push(Event::PlayerLeveledUp { level });
                }
            }
        }
    }

    fn damage_player(&mut self, damage: Damage, source: DamageSource, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            out_events.push(rejected(Rejection::PlayerMissing));
            return;
        };
        if !player.is_alive() {
            return;
        }

        let amount = mitigate(damage, &player.armor);
        player.health -= amount;
        let (at, remaining) = (player.position, player.health);
        self.visual_effects.push(VisualEffect::hit(at));
        out_events.push(Event::PlayerDamaged {
            source,
            amount,
            remaining,
        });

        if remaining <= 0.0 {
            tracing::debug!(?at, "player died");
            out_events.push(Event::PlayerDied { at });
        }
    }

    fn interact(&mut self, at: Point, out_events: &mut Vec<Event>) {
        let Some(index) = self.interactable_at(at) else {
            out_events.push(rejected(Rejection::NothingToInteract { at }));
            return;
        };

        let interactable = self.interactables.remove(index);
        out_events.push(Event::InteractableUsed {
            at,
            kind: interactable.kind,
        });
        match interactable.kind {
            InteractionKind::Chest { drop } => self.drop_item(at, drop, out_events),
        }
    }

    /// Resolves the monster and spends one decision step of its action points.
    fn begin_monster_action(
        &mut self,
        monster: MonsterId,
        out_events: &mut Vec<Event>,
    ) -> Option<usize> {
        let Some(index) = self.live_monster_index(monster) else {
            out_events.push(rejected(Rejection::MonsterMissing { monster }));
            return None;
        };

        let entry = &mut self.monsters[index];
        if entry.action_points < BASE_SPEED {
            out_events.push(rejected(Rejection::InsufficientActionPoints { monster }));
            return None;
        }
        entry.action_points -= BASE_SPEED;
        Some(index)
    }

    fn set_monster_state(&mut self, index: usize, state: AiState, out_events: &mut Vec<Event>) {
        let Some(monster) = self.monsters.get_mut(index) else {
            return;
        };
        if monster.state != state {
            out_events.push(Event::MonsterStateChanged {
                monster: monster.id,
                from: monster.state,
                to: state,
            });
            monster.state = state;
        }
    }

    fn step_monster(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let (id, from, next) = {
            let monster = &mut self.monsters[index];
            (monster.id, monster.position, monster.path.pop_front())
        };

        let Some(to) = next else {
            self.set_monster_state(index, AiState::Idle, out_events);
            out_events.push(Event::MonsterIdled { monster: id });
            return;
        };

        if from.chebyshev_distance(to) != 1 || !self.is_free(to) {
            self.monsters[index].path.clear();
            tracing::debug!(monster = id.get(), ?to, "monster step blocked");
            out_events.push(Event::MonsterBlocked {
                monster: id,
                target: to,
            });
            self.set_monster_state(index, AiState::Idle, out_events);
            return;
        }

        self.monsters[index].position = to;
        out_events.push(Event::MonsterMoved {
            monster: id,
            from,
            to,
        });
        self.set_monster_state(index, AiState::Pursuing, out_events);
    }

    fn tick_effects(&mut self, out_events: &mut Vec<Event>) {
        let effects = self.floor_effects.clone();
        for effect in &effects {
            let damage = Damage::new(effect.attack_power, effect.kind.damage_type());

            if self
                .player
                .as_ref()
                .is_some_and(|player| player.position == effect.at && player.is_alive())
            {
                self.damage_player(damage, DamageSource::Effect(effect.kind), out_events);
            }

            if let Some(index) = self.live_monster_at(effect.at) {
                self.damage_monster(index, damage, false, out_events);
            }
        }

        let mut expired: Vec<(Point, EffectKind)> = Vec::new();
        self.floor_effects.retain_mut(|effect| {
            effect.ticks_remaining = effect.ticks_remaining.saturating_sub(1);
            if effect.ticks_remaining == 0 {
                expired.push((effect.at, effect.kind));
                false
            } else {
                true
            }
        });
        for (at, kind) in expired {
            out_events.push(Event::EffectExpired { at, kind });
        }
    }
}

fn rejected(reason: Rejection) -> Event {
    tracing::debug!(?reason, "command rejected");
    Event::CommandRejected { reason }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnPlayer { at, profile } => world.spawn_player(at, profile, out_events),
        Command::SpawnMonster { at, profile } => world.spawn_monster(at, profile, out_events),
        Command::PlaceFloorItem { at, drop } => {
            if world.map.tile(at).is_none() {
                out_events.push(rejected(Rejection::PointUnavailable { at }));
                return;
            }
            world.drop_item(at, drop, out_events);
        }
        Command::PlaceFloorEffect {
            at,
            kind,
            attack_power,
            ticks,
        } => {
            if world.map.tile(at).is_none() {
                out_events.push(rejected(Rejection::PointUnavailable { at }));
                return;
            }
            if ticks == 0 {
                out_events.push(rejected(Rejection::EffectWithoutDuration { at }));
                return;
            }
            world.floor_effects.push(FloorEffect {
                at,
                kind,
                attack_power,
                ticks_remaining: ticks,
            });
            out_events.push(Event::EffectPlaced { at, kind });
        }
        Command::PlaceInteractable { at, kind } => {
            if !world.is_free(at) {
                out_events.push(rejected(Rejection::PointUnavailable { at }));
                return;
            }
            world.interactables.push(Interactable { at, kind });
            out_events.push(Event::InteractablePlaced { at });
        }
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
        Command::PlayerAttack { monster, damage } => {
            if world.player.is_none() {
                out_events.push(rejected(Rejection::PlayerMissing));
                return;
            }
            match world.live_monster_index(monster) {
                Some(index) => world.damage_monster(index, damage, true, out_events),
                None => out_events.push(rejected(Rejection::MonsterMissing { monster })),
            }
        }
        Command::Interact { at } => world.interact(at, out_events),
        Command::RefreshVisibility => {
            let Some((origin, sight_range)) = world
                .player
                .as_ref()
                .map(|player| (player.position, player.sight_range))
            else {
                out_events.push(rejected(Rejection::PlayerMissing));
                return;
            };
            let visible_tiles = refresh_visibility(&mut world.map, origin, sight_range);
            out_events.push(Event::VisibilityRefreshed {
                origin,
                visible_tiles,
            });
        }
        Command::Tick => {
            world.turn = world.turn.saturating_add(1);
            world.visual_effects.clear();
            if let Some(player) = world.player.as_mut().filter(|player| player.is_alive()) {
                player.action_points = player.speed;
            }
            for monster in world.monsters.iter_mut().filter(|monster| monster.alive) {
                monster.action_points = monster.action_points.saturating_add(monster.speed);
            }
            out_events.push(Event::TurnAdvanced { turn: world.turn });
        }
        Command::SetMonsterPath { monster, path } => {
            let Some(index) = world.live_monster_index(monster) else {
                out_events.push(rejected(Rejection::MonsterMissing { monster }));
                return;
            };
            let position = world.monsters[index].position;
            if let Some(first) = path.first().copied() {
                if position.chebyshev_distance(first) != 1 {
                    out_events.push(rejected(Rejection::PointUnavailable { at: first }));
                    return;
                }
            }
            let pursuing = !path.is_empty();
            world.monsters[index].path = path.into();
            if pursuing {
                world.set_monster_state(index, AiState::Pursuing, out_events);
            }
        }
        Command::StepMonster { monster } => {
            if let Some(index) = world.begin_monster_action(monster, out_events) {
                world.step_monster(index, out_events);
            }
        }
        Command::MonsterAttack { monster, damage } => {
            if world.player.is_none() {
                out_events.push(rejected(Rejection::PlayerMissing));
                return;
            }
            if let Some(index) = world.begin_monster_action(monster, out_events) {
                world.set_monster_state(index, AiState::Engaged, out_events);
                world.damage_player(damage, DamageSource::Monster(monster), out_events);
            }
        }
        Command::MonsterWait { monster } => {
            if let Some(index) = world.begin_monster_action(monster, out_events) {
                world.set_monster_state(index, AiState::Idle, out_events);
                out_events.push(Event::MonsterIdled { monster });
            }
        }
        Command::TickEffects => world.tick_effects(out_events),
        Command::RemoveDead => world.monsters.retain(|monster| monster.alive),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use imla_core::{
        AiState, ArmorTable, Behavior, Color, InteractionKind, MonsterId, Point,
    };
    use imla_grid::TileMap;

    use super::{FloorEffect, FloorItem, Interactable, Monster, VisualEffect, World};

    /// Provides read-only access to the level's tiles.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.map
    }

    /// Number of turns that have elapsed.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }

    /// Captures the player's state, if a player has been spawned.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world.player.as_ref().map(|player| PlayerSnapshot {
            name: player.name.clone(),
            position: player.position,
            glyph: player.glyph,
            color: player.color,
            health: player.health,
            health_max: player.health_max,
            armor: player.armor,
            attack_power: player.attack_power,
            sight_range: player.sight_range,
            speed: player.speed,
            action_points: player.action_points,
            level: player.level,
            xp: player.xp,
            next_level_xp: player.next_level_xp,
            is_visible: is_tile_visible(world, player.position),
        })
    }

    /// Tile the player stands on.
    #[must_use]
    pub fn player_position(world: &World) -> Option<Point> {
        world.player.as_ref().map(|player| player.position)
    }

    /// Whether a player exists and still has health left.
    #[must_use]
    pub fn is_player_alive(world: &World) -> bool {
        world.player.as_ref().is_some_and(|player| player.is_alive())
    }

    /// Captures every live monster in collection order.
    #[must_use]
    pub fn monster_view(world: &World) -> MonsterView {
        MonsterView {
            snapshots: world
                .monsters
                .iter()
                .filter(|monster| monster.alive)
                .map(|monster| snapshot(world, monster))
                .collect(),
        }
    }

    /// Captures a single live monster.
    #[must_use]
    pub fn monster(world: &World, monster: MonsterId) -> Option<MonsterSnapshot> {
        world
            .live_monster_index(monster)
            .map(|index| snapshot(world, &world.monsters[index]))
    }

    /// Identifier of the live monster standing on the point, if any.
    #[must_use]
    pub fn monster_at(world: &World, point: Point) -> Option<MonsterId> {
        world
            .live_monster_at(point)
            .map(|index| world.monsters[index].id)
    }

    /// Interaction offered by the object on the point, if any.
    #[must_use]
    pub fn interactable_at(world: &World, point: Point) -> Option<InteractionKind> {
        world
            .interactable_at(point)
            .map(|index| world.interactables[index].kind)
    }

    /// Whether an actor could step onto the point right now.
    #[must_use]
    pub fn is_free(world: &World, point: Point) -> bool {
        world.is_free(point)
    }

    /// Items lying on the floor.
    #[must_use]
    pub fn floor_items(world: &World) -> &[FloorItem] {
        &world.floor_items
    }

    /// Active floor effects.
    #[must_use]
    pub fn floor_effects(world: &World) -> &[FloorEffect] {
        &world.floor_effects
    }

    /// Objects waiting to be interacted with.
    #[must_use]
    pub fn interactables(world: &World) -> &[Interactable] {
        &world.interactables
    }

    /// Markers produced since the last tick.
    #[must_use]
    pub fn visual_effects(world: &World) -> &[VisualEffect] {
        &world.visual_effects
    }

    fn is_tile_visible(world: &World, point: Point) -> bool {
        world.map.tile(point).is_some_and(|tile| tile.is_visible())
    }

    fn snapshot(world: &World, monster: &Monster) -> MonsterSnapshot {
        MonsterSnapshot {
            id: monster.id,
            name: monster.name.clone(),
            position: monster.position,
            glyph: monster.glyph,
            color: monster.color,
            health: monster.health,
            health_max: monster.health_max,
            armor: monster.armor,
            attack_power: monster.attack_power,
            sight_range: monster.sight_range,
            speed: monster.speed,
            action_points: monster.action_points,
            behavior: monster.behavior,
            state: monster.state,
            next_step: monster.next_step(),
            remaining_steps: monster.path.len(),
            is_visible: is_tile_visible(world, monster.position),
        }
    }

    /// Read-only snapshot describing all live monsters.
    #[derive(Clone, Debug)]
    pub struct MonsterView {
        snapshots: Vec<MonsterSnapshot>,
    }

    impl MonsterView {
        /// Iterator over the captured snapshots in collection order.
        pub fn iter(&self) -> impl Iterator<Item = &MonsterSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<MonsterSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of the player's state.
    #[derive(Clone, Debug, PartialEq)]
    pub struct PlayerSnapshot {
        /// Display name.
        pub name: String,
        /// Tile the player stands on.
        pub position: Point,
        /// Glyph drawn for the player.
        pub glyph: char,
        /// Color of the glyph.
        pub color: Color,
        /// Current health; zero or below means dead.
        pub health: f32,
        /// Maximum health.
        pub health_max: f32,
        /// Armor per damage type.
        pub armor: ArmorTable,
        /// Centre of the damage roll.
        pub attack_power: u32,
        /// Radius of the visibility sweep.
        pub sight_range: u32,
        /// Action points granted per turn.
        pub speed: u32,
        /// Action points available this turn.
        pub action_points: u32,
        /// Experience level, starting at one.
        pub level: u32,
        /// Total experience accumulated.
        pub xp: u32,
        /// Experience required for the next level.
        pub next_level_xp: u32,
        /// Whether the player's tile is currently visible.
        pub is_visible: bool,
    }

    /// Immutable representation of a single monster's state.
    #[derive(Clone, Debug, PartialEq)]
    pub struct MonsterSnapshot {
        /// Unique identifier assigned to the monster.
        pub id: MonsterId,
        /// Display name.
        pub name: String,
        /// Tile the monster stands on.
        pub position: Point,
        /// Glyph drawn for the monster.
        pub glyph: char,
        /// Color of the glyph.
        pub color: Color,
        /// Current health.
        pub health: f32,
        /// Maximum health.
        pub health_max: f32,
        /// Armor per damage type.
        pub armor: ArmorTable,
        /// Centre of the damage roll.
        pub attack_power: u32,
        /// Chebyshev radius within which the player is noticed.
        pub sight_range: u32,
        /// Action points gained per turn.
        pub speed: u32,
        /// Action points currently banked.
        pub action_points: u32,
        /// Decision strategy.
        pub behavior: Behavior,
        /// Current decision state.
        pub state: AiState,
        /// Head of the stored route, if any.
        pub next_step: Option<Point>,
        /// Number of steps left on the stored route.
        pub remaining_steps: usize,
        /// Whether the monster's tile is currently visible.
        pub is_visible: bool,
    }
}
