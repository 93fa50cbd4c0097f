//! Records for everything that lives on top of the tile map.

use std::collections::VecDeque;

use imla_core::{
    AiState, ArmorTable, Behavior, Color, EffectKind, InteractionKind, ItemDrop, MonsterId,
    MonsterProfile, PlayerProfile, Point,
};

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) name: String,
    pub(crate) glyph: char,
    pub(crate) color: Color,
    pub(crate) position: Point,
    pub(crate) health_max: f32,
    pub(crate) health: f32,
    pub(crate) armor: ArmorTable,
    pub(crate) attack_power: u32,
    pub(crate) sight_range: u32,
    pub(crate) speed: u32,
    pub(crate) action_points: u32,
    pub(crate) level: u32,
    pub(crate) xp: u32,
    pub(crate) next_level_xp: u32,
}

impl Player {
    pub(crate) fn spawn(position: Point, profile: PlayerProfile) -> Self {
        Self {
            name: profile.name,
            glyph: profile.glyph,
            color: profile.color,
            position,
            health_max: profile.health_max,
            health: profile.health_max,
            armor: profile.armor,
            attack_power: profile.attack_power,
            sight_range: profile.sight_range,
            speed: profile.speed,
            action_points: 0,
            level: 1,
            xp: 0,
            next_level_xp: profile.next_level_xp,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Adds experience and returns every level reached on the way.
    pub(crate) fn gain_experience(&mut self, amount: u32) -> Vec<u32> {
        self.xp = self.xp.saturating_add(amount);

        let mut reached = Vec::new();
        while self.next_level_xp > 0 && self.next_level_xp < u32::MAX && self.xp >= self.next_level_xp
        {
            self.level += 1;
            self.next_level_xp = self.next_level_xp.saturating_mul(2);
            reached.push(self.level);
        }
        reached
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Monster {
    pub(crate) id: MonsterId,
    pub(crate) name: String,
    pub(crate) glyph: char,
    pub(crate) color: Color,
    pub(crate) position: Point,
    pub(crate) health_max: f32,
    pub(crate) health: f32,
    pub(crate) armor: ArmorTable,
    pub(crate) attack_power: u32,
    pub(crate) sight_range: u32,
    pub(crate) speed: u32,
    pub(crate) action_points: u32,
    pub(crate) behavior: Behavior,
    pub(crate) drop: Option<ItemDrop>,
    pub(crate) xp_reward: u32,
    pub(crate) path: VecDeque<Point>,
    pub(crate) state: AiState,
    pub(crate) alive: bool,
}

impl Monster {
    pub(crate) fn spawn(id: MonsterId, position: Point, profile: MonsterProfile) -> Self {
        Self {
            id,
            name: profile.name,
            glyph: profile.glyph,
            color: profile.color,
            position,
            health_max: profile.health_max,
            health: profile.health_max,
            armor: profile.armor,
            attack_power: profile.attack_power,
            sight_range: profile.sight_range,
            speed: profile.speed,
            action_points: 0,
            behavior: profile.behavior,
            drop: profile.drop,
            xp_reward: profile.xp_reward,
            path: VecDeque::new(),
            state: AiState::Idle,
            alive: true,
        }
    }

    pub(crate) fn next_step(&self) -> Option<Point> {
        self.path.front().copied()
    }
}

/// Item lying on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorItem {
    /// Tile holding the item.
    pub at: Point,
    /// Item kind and stack size.
    pub drop: ItemDrop,
}

/// Lingering effect applied to whoever stands on its tile each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloorEffect {
    /// Tile covered by the effect.
    pub at: Point,
    /// Behavior executed every turn.
    pub kind: EffectKind,
    /// Raw damage dealt per turn.
    pub attack_power: u32,
    /// Turns left before the effect expires.
    pub ticks_remaining: u32,
}

impl FloorEffect {
    /// Glyph used to draw the effect.
    #[must_use]
    pub const fn glyph(&self) -> char {
        match self.kind {
            EffectKind::Burn => '^',
        }
    }

    /// Color used to draw the effect.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self.kind {
            EffectKind::Burn => Color::ORANGE_RED,
        }
    }
}

/// Object that reacts when the player bumps into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interactable {
    /// Tile occupied by the object.
    pub at: Point,
    /// Reaction executed on interaction.
    pub kind: InteractionKind,
}

impl Interactable {
    /// Glyph used to draw the object.
    #[must_use]
    pub const fn glyph(&self) -> char {
        match self.kind {
            InteractionKind::Chest { .. } => '=',
        }
    }

    /// Color used to draw the object.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self.kind {
            InteractionKind::Chest { .. } => Color::GOLD,
        }
    }
}

/// Short-lived marker drawn for a single turn, such as a hit flash.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualEffect {
    /// Tile the marker is drawn on.
    pub at: Point,
    /// Glyph of the marker.
    pub glyph: char,
    /// Color of the marker.
    pub color: Color,
}

impl VisualEffect {
    pub(crate) const fn hit(at: Point) -> Self {
        Self {
            at,
            glyph: '*',
            color: Color::CRIMSON,
        }
    }
}
