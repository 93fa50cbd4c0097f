#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Armor mitigation and damage rolls.
//!
//! Mitigation follows `raw * (1 - k*armor / (1 + k*|armor|))` with
//! [`ARMOR_SCALING`] as `k`. Positive armor approaches but never reaches full
//! immunity; negative armor amplifies damage.

use imla_core::{ArmorTable, Damage, DamageType};
use rand::Rng;

/// Scaling constant `k` of the mitigation curve.
pub const ARMOR_SCALING: f32 = 0.06;

/// Fraction of raw damage that passes through `armor`.
#[must_use]
pub fn damage_multiplier(armor: i32) -> f32 {
    let scaled = ARMOR_SCALING * armor as f32;
    1.0 - scaled / (1.0 + scaled.abs())
}

/// Net damage after applying a single armor value.
#[must_use]
pub fn damage_after_mitigation(raw: f32, armor: i32) -> f32 {
    raw * damage_multiplier(armor)
}

/// Net damage after reading the armor matching the damage's type.
#[must_use]
pub fn mitigate(damage: Damage, armor: &ArmorTable) -> f32 {
    damage_after_mitigation(damage.amount() as f32, armor.get(damage.kind()))
}

/// Rolls raw damage uniformly from `attack_power - 1 ..= attack_power + 1`,
/// never below zero.
pub fn roll_damage<R>(rng: &mut R, attack_power: u32, kind: DamageType) -> Damage
where
    R: Rng + ?Sized,
{
    let low = attack_power.saturating_sub(1);
    let high = attack_power.saturating_add(1);
    Damage::new(rng.gen_range(low..=high), kind)
}
