#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Imla roguelike engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative level state, and pure systems. The turn controller submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point and answers with [`Event`] values.
//! Systems read immutable snapshots of the level and respond exclusively with
//! new command batches.

use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Action points an actor must hold before it may perform one decision step.
pub const BASE_SPEED: u32 = 12;

/// Commands that express all permissible level mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places the player into the level.
    SpawnPlayer {
        /// Tile the player starts on.
        at: Point,
        /// Statistics and appearance assigned to the player.
        profile: PlayerProfile,
    },
    /// Places a monster into the level.
    SpawnMonster {
        /// Tile the monster starts on.
        at: Point,
        /// Statistics, behavior and appearance assigned to the monster.
        profile: MonsterProfile,
    },
    /// Drops an item onto the floor.
    PlaceFloorItem {
        /// Tile receiving the item.
        at: Point,
        /// Item kind and stack size.
        drop: ItemDrop,
    },
    /// Places a lingering effect such as fire onto the floor.
    PlaceFloorEffect {
        /// Tile covered by the effect.
        at: Point,
        /// Behavior executed every turn.
        kind: EffectKind,
        /// Raw damage dealt to every actor standing on the tile.
        attack_power: u32,
        /// Number of turns the effect remains active.
        ticks: u32,
    },
    /// Places an object that reacts when the player bumps into it.
    PlaceInteractable {
        /// Tile occupied by the object.
        at: Point,
        /// Reaction executed on interaction.
        kind: InteractionKind,
    },
    /// Requests that the player step one tile in the provided direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Resolves a player attack against a monster.
    PlayerAttack {
        /// Monster receiving the blow.
        monster: MonsterId,
        /// Raw damage before armor mitigation.
        damage: Damage,
    },
    /// Triggers the interactable standing on the provided tile.
    Interact {
        /// Tile holding the interactable.
        at: Point,
    },
    /// Recomputes line of sight and visibility from the player's position.
    RefreshVisibility,
    /// Advances the turn counter, refills the player's action points and grants
    /// every monster its speed in action points.
    Tick,
    /// Stores a freshly planned route on a monster, replacing any previous one.
    SetMonsterPath {
        /// Monster receiving the route.
        monster: MonsterId,
        /// Ordered steps excluding the monster's current tile.
        path: Vec<Point>,
    },
    /// Consumes one decision step by moving the monster along its stored route.
    StepMonster {
        /// Monster attempting to move.
        monster: MonsterId,
    },
    /// Consumes one decision step by attacking the player.
    MonsterAttack {
        /// Monster performing the attack.
        monster: MonsterId,
        /// Raw damage before armor mitigation.
        damage: Damage,
    },
    /// Consumes one decision step without acting.
    MonsterWait {
        /// Monster that stays idle.
        monster: MonsterId,
    },
    /// Runs every floor effect once and expires the exhausted ones.
    TickEffects,
    /// Compacts the monster collection by dropping monsters killed this turn.
    RemoveDead,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the player entered the level.
    PlayerSpawned {
        /// Tile the player occupies.
        at: Point,
    },
    /// Confirms that a monster entered the level.
    MonsterSpawned {
        /// Identifier assigned to the monster by the world.
        monster: MonsterId,
        /// Tile the monster occupies.
        at: Point,
    },
    /// Reports that an item now lies on the floor.
    ItemDropped {
        /// Tile holding the item.
        at: Point,
        /// Item kind and stack size.
        drop: ItemDrop,
    },
    /// Confirms that a floor effect was placed.
    EffectPlaced {
        /// Tile covered by the effect.
        at: Point,
        /// Kind of effect placed.
        kind: EffectKind,
    },
    /// Confirms that an interactable was placed.
    InteractablePlaced {
        /// Tile holding the interactable.
        at: Point,
    },
    /// Confirms that the player moved between two tiles.
    PlayerMoved {
        /// Tile the player occupied before moving.
        from: Point,
        /// Tile the player occupies after moving.
        to: Point,
    },
    /// Reports that the player bumped into something that prevents movement.
    PlayerBlocked {
        /// Tile the player attempted to enter.
        target: Point,
    },
    /// Reports damage dealt to a monster after mitigation.
    MonsterDamaged {
        /// Monster that took the damage.
        monster: MonsterId,
        /// Net damage after armor.
        amount: f32,
        /// Health left after the hit.
        remaining: f32,
    },
    /// Reports that a monster's health reached zero.
    MonsterDied {
        /// Monster that died.
        monster: MonsterId,
        /// Tile the monster died on.
        at: Point,
    },
    /// Reports damage dealt to the player after mitigation.
    PlayerDamaged {
        /// Origin of the damage.
        source: DamageSource,
        /// Net damage after armor.
        amount: f32,
        /// Health left after the hit.
        remaining: f32,
    },
    /// Reports that the player's health reached zero.
    PlayerDied {
        /// Tile the player died on.
        at: Point,
    },
    /// Reports experience awarded to the player.
    ExperienceGained {
        /// Experience awarded by the kill.
        amount: u32,
        /// Total experience accumulated.
        total: u32,
    },
    /// Reports that the player reached a new experience level.
    PlayerLeveledUp {
        /// Level reached.
        level: u32,
    },
    /// Confirms that a monster moved between two tiles.
    MonsterMoved {
        /// Monster that moved.
        monster: MonsterId,
        /// Tile the monster occupied before moving.
        from: Point,
        /// Tile the monster occupies after moving.
        to: Point,
    },
    /// Reports that a monster could not follow its stored route.
    MonsterBlocked {
        /// Monster whose step failed.
        monster: MonsterId,
        /// Step that could not be taken.
        target: Point,
    },
    /// Reports that a monster spent a decision step idling.
    MonsterIdled {
        /// Monster that idled.
        monster: MonsterId,
    },
    /// Reports a transition of a monster's behavior state.
    MonsterStateChanged {
        /// Monster whose state changed.
        monster: MonsterId,
        /// State held before the transition.
        from: AiState,
        /// State held after the transition.
        to: AiState,
    },
    /// Indicates that the turn counter advanced.
    TurnAdvanced {
        /// Turn number after the advance.
        turn: u64,
    },
    /// Reports that visibility was recomputed.
    VisibilityRefreshed {
        /// Origin of the sweep.
        origin: Point,
        /// Number of tiles currently visible.
        visible_tiles: usize,
    },
    /// Reports that a floor effect ran out of ticks.
    EffectExpired {
        /// Tile the effect covered.
        at: Point,
        /// Kind of effect that expired.
        kind: EffectKind,
    },
    /// Reports that an interactable was used and consumed.
    InteractableUsed {
        /// Tile the interactable occupied.
        at: Point,
        /// Reaction that was executed.
        kind: InteractionKind,
    },
    /// Reports that a command could not be applied.
    CommandRejected {
        /// Specific reason the command failed.
        reason: Rejection,
    },
}

/// Reasons the world may refuse a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// The command requires a player but none has been spawned.
    PlayerMissing,
    /// A player already exists in the level.
    PlayerAlreadyPresent,
    /// No live monster carries the provided identifier.
    MonsterMissing {
        /// Identifier that failed to resolve.
        monster: MonsterId,
    },
    /// The monster lacks the action points required to act.
    InsufficientActionPoints {
        /// Monster that attempted to act.
        monster: MonsterId,
    },
    /// The tile is outside the level, absent, blocking or occupied.
    PointUnavailable {
        /// Tile that was requested.
        at: Point,
    },
    /// There is nothing to interact with on the tile.
    NothingToInteract {
        /// Tile that was requested.
        at: Point,
    },
    /// A floor effect must last at least one tick.
    EffectWithoutDuration {
        /// Tile that was requested.
        at: Point,
    },
}

/// Origin of damage applied to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageSource {
    /// A monster's attack.
    Monster(MonsterId),
    /// A floor effect the player stood in.
    Effect(EffectKind),
}

/// Integer coordinate of a tile within the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point from column and row coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the point.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the point.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighboring point one step away in the provided direction.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Computes the Manhattan distance between two points.
    #[must_use]
    pub fn manhattan_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Computes the Chebyshev (king-move) distance between two points.
    #[must_use]
    pub fn chebyshev_distance(self, other: Point) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Reports whether the two points differ along both axes.
    #[must_use]
    pub const fn is_diagonal_to(self, other: Point) -> bool {
        self.x != other.x && self.y != other.y
    }
}

impl Add<(i32, i32)> for Point {
    type Output = Point;

    fn add(self, (dx, dy): (i32, i32)) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// King-move directions available to actors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing rows.
    North,
    /// Movement toward decreasing rows and increasing columns.
    NorthEast,
    /// Movement toward increasing columns.
    East,
    /// Movement toward increasing rows and columns.
    SouthEast,
    /// Movement toward increasing rows.
    South,
    /// Movement toward increasing rows and decreasing columns.
    SouthWest,
    /// Movement toward decreasing columns.
    West,
    /// Movement toward decreasing rows and columns.
    NorthWest,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Column and row offsets of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// Resolves the direction of a single king move between two points.
    #[must_use]
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        let delta = (to.x() - from.x(), to.y() - from.y());
        Self::ALL
            .into_iter()
            .find(|direction| direction.delta() == delta)
    }
}

/// Unique identifier assigned to a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new monster identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Opaque RGB color attached to glyphs and tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Pure black.
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    /// Remembered floor.
    pub const DARK_GREY: Color = Color::from_rgb(50, 50, 50);
    /// Lit floor and remembered wall.
    pub const MID_GREY: Color = Color::from_rgb(96, 96, 96);
    /// Lit wall.
    pub const LIGHT_GREY: Color = Color::from_rgb(192, 192, 192);
    /// Pure white.
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);
    /// Rubble and other rough ground.
    pub const TAN: Color = Color::from_rgb(210, 180, 140);
    /// Remembered rough ground.
    pub const SIENNA: Color = Color::from_rgb(160, 82, 45);
    /// Orcs.
    pub const GREEN: Color = Color::from_rgb(19, 161, 14);
    /// Goblins.
    pub const OLIVE: Color = Color::from_rgb(128, 128, 0);
    /// Gold coins and chests.
    pub const GOLD: Color = Color::from_rgb(255, 215, 0);
    /// Fire.
    pub const ORANGE_RED: Color = Color::from_rgb(255, 69, 0);
    /// Hit markers.
    pub const CRIMSON: Color = Color::from_rgb(197, 15, 31);
    /// Weapons lying on the floor.
    pub const SLATE: Color = Color::from_rgb(112, 128, 144);

    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Categories of damage; each is mitigated by its own armor value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Weapons and claws.
    Physical,
    /// Burning.
    Fire,
    /// Shocks.
    Lightning,
    /// Freezing.
    Cold,
    /// Acid and rot.
    Corrosive,
}

impl DamageType {
    /// Every damage type in table order.
    pub const ALL: [DamageType; 5] = [
        DamageType::Physical,
        DamageType::Fire,
        DamageType::Lightning,
        DamageType::Cold,
        DamageType::Corrosive,
    ];

    const fn slot(self) -> usize {
        match self {
            DamageType::Physical => 0,
            DamageType::Fire => 1,
            DamageType::Lightning => 2,
            DamageType::Cold => 3,
            DamageType::Corrosive => 4,
        }
    }
}

/// Armor rating per damage type. Negative values mark vulnerabilities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArmorTable {
    values: [i32; 5],
}

impl ArmorTable {
    /// Creates a table with zero armor against every damage type.
    #[must_use]
    pub const fn none() -> Self {
        Self { values: [0; 5] }
    }

    /// Returns a copy of the table with the armor for `kind` replaced.
    #[must_use]
    pub fn with(mut self, kind: DamageType, value: i32) -> Self {
        self.values[kind.slot()] = value;
        self
    }

    /// Armor rating against the provided damage type.
    #[must_use]
    pub const fn get(&self, kind: DamageType) -> i32 {
        self.values[kind.slot()]
    }
}

/// Raw damage produced by an attack or effect, before mitigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Damage {
    amount: u32,
    kind: DamageType,
}

impl Damage {
    /// Creates a new damage descriptor.
    #[must_use]
    pub const fn new(amount: u32, kind: DamageType) -> Self {
        Self { amount, kind }
    }

    /// Raw damage amount.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Damage type selecting which armor value applies.
    #[must_use]
    pub const fn kind(&self) -> DamageType {
        self.kind
    }
}

/// Kinds of items that may lie on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Coins.
    Gold,
    /// A short blade.
    Dagger,
    /// A long blade.
    Sword,
}

impl ItemKind {
    /// Glyph used to draw the item.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            ItemKind::Gold => '$',
            ItemKind::Dagger | ItemKind::Sword => '/',
        }
    }

    /// Color used to draw the item.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            ItemKind::Gold => Color::GOLD,
            ItemKind::Dagger | ItemKind::Sword => Color::SLATE,
        }
    }
}

/// Item kind paired with a stack size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemDrop {
    /// Kind of item dropped.
    pub kind: ItemKind,
    /// Number of items in the stack.
    pub amount: u32,
}

impl ItemDrop {
    /// Creates a new item drop.
    #[must_use]
    pub const fn new(kind: ItemKind, amount: u32) -> Self {
        Self { kind, amount }
    }
}

/// Closed set of monster decision strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Closes the distance and attacks adjacent targets.
    Melee,
    /// Attacks from a distance whenever the target is within reach and sight.
    Ranged {
        /// Maximum Chebyshev distance of an attack.
        reach: u32,
    },
}

/// Observable state of a monster's decision loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AiState {
    /// No route held and no target sensed.
    #[default]
    Idle,
    /// Following a route toward the target's current or last known tile.
    Pursuing,
    /// Attacking the target.
    Engaged,
}

/// Per-turn behavior of a floor effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Deals fire damage to every actor standing on the tile.
    Burn,
}

impl EffectKind {
    /// Damage type dealt by the effect.
    #[must_use]
    pub const fn damage_type(self) -> DamageType {
        match self {
            EffectKind::Burn => DamageType::Fire,
        }
    }
}

/// Reaction of an interactable when the player bumps into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Opens and spills its contents onto the floor.
    Chest {
        /// Item spilled when opened.
        drop: ItemDrop,
    },
}

/// Discrete player intent produced by an input mapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Step in a direction, attacking or interacting with whatever stands there.
    MoveOrAttack(Direction),
    /// Pass the turn.
    Wait,
    /// Confirm the active prompt.
    Confirm,
    /// Dismiss the active prompt.
    Cancel,
    /// Open the in-game menu.
    OpenMenu,
}

impl Intent {
    /// Reports whether resolving the intent lets monsters act.
    #[must_use]
    pub const fn consumes_turn(self) -> bool {
        matches!(self, Intent::MoveOrAttack(_) | Intent::Wait)
    }
}

/// Statistics and appearance used to spawn the player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerProfile {
    /// Display name.
    pub name: String,
    /// Glyph drawn for the player.
    pub glyph: char,
    /// Color of the glyph.
    pub color: Color,
    /// Maximum and starting health.
    pub health_max: f32,
    /// Armor per damage type.
    pub armor: ArmorTable,
    /// Centre of the damage roll.
    pub attack_power: u32,
    /// Radius of the visibility sweep.
    pub sight_range: u32,
    /// Action points granted per turn.
    pub speed: u32,
    /// Experience required to reach level two.
    pub next_level_xp: u32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: String::from("Player"),
            glyph: '@',
            color: Color::WHITE,
            health_max: 20.0,
            armor: ArmorTable::none().with(DamageType::Physical, 2),
            attack_power: 3,
            sight_range: 8,
            speed: BASE_SPEED,
            next_level_xp: 10,
        }
    }
}

/// Statistics, behavior and appearance used to spawn a monster.
#[derive(Clone, Debug, PartialEq)]
pub struct MonsterProfile {
    /// Display name.
    pub name: String,
    /// Glyph drawn for the monster.
    pub glyph: char,
    /// Color of the glyph.
    pub color: Color,
    /// Maximum and starting health.
    pub health_max: f32,
    /// Armor per damage type.
    pub armor: ArmorTable,
    /// Centre of the damage roll.
    pub attack_power: u32,
    /// Chebyshev radius within which the monster notices the player.
    pub sight_range: u32,
    /// Action points gained per turn.
    pub speed: u32,
    /// Decision strategy.
    pub behavior: Behavior,
    /// Item dropped on death.
    pub drop: Option<ItemDrop>,
    /// Experience awarded to the player on kill.
    pub xp_reward: u32,
}

impl MonsterProfile {
    /// Sturdy melee brute.
    #[must_use]
    pub fn orc() -> Self {
        Self {
            name: String::from("Orc"),
            glyph: 'o',
            color: Color::GREEN,
            health_max: 5.0,
            armor: ArmorTable::none(),
            attack_power: 2,
            sight_range: 8,
            speed: BASE_SPEED,
            behavior: Behavior::Melee,
            drop: Some(ItemDrop::new(ItemKind::Gold, 10)),
            xp_reward: 5,
        }
    }

    /// Fragile archer that keeps its distance.
    #[must_use]
    pub fn goblin_archer() -> Self {
        Self {
            name: String::from("Goblin archer"),
            glyph: 'g',
            color: Color::OLIVE,
            health_max: 3.0,
            armor: ArmorTable::none().with(DamageType::Fire, -5),
            attack_power: 1,
            sight_range: 8,
            speed: BASE_SPEED,
            behavior: Behavior::Ranged { reach: 4 },
            drop: Some(ItemDrop::new(ItemKind::Dagger, 1)),
            xp_reward: 4,
        }
    }

    /// Returns the profile with its speed replaced.
    #[must_use]
    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }
}
