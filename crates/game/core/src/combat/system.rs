//! Attack resolution: the sole mutating path for combat.
//!
//! Everything here is a free function over entity state so the orchestrator
//! can borrow attacker and target mutably without fighting a system struct
//! for access. All randomness comes from the caller's [`GameRng`].

use crate::config::GameConfig;
use crate::grid::Grid;
use crate::rng::GameRng;
use crate::state::{AttackType, EntityState};

use super::result::AttackResult;

/// Inclusive damage envelope before the per-roll jitter is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min: u32,
    pub max: u32,
}

/// Base power the attacker brings to this attack type.
fn base_power(attacker: &EntityState, kind: AttackType) -> u32 {
    match kind {
        AttackType::Melee => attacker.stats.melee_power,
        AttackType::Ranged => attacker.stats.ranged_power,
        AttackType::Special => attacker.stats.special_power,
    }
}

/// Maximum Euclidean distance at which this attack type connects.
pub fn attack_range(attacker: &EntityState, kind: AttackType) -> f64 {
    match kind {
        AttackType::Melee => GameConfig::MELEE_RANGE,
        AttackType::Ranged => f64::from(attacker.stats.ranged_range),
        AttackType::Special => f64::from(attacker.stats.special_range),
    }
}

pub fn is_in_range(attacker: &EntityState, kind: AttackType, distance: f64) -> bool {
    distance <= attack_range(attacker, kind)
}

/// Hit chance in percent, clamped to the configured band.
///
/// Base by type: melee 85, ranged `75 - 5 * distance`, special uses the
/// attacker's special accuracy. Attacker accuracy adds, target evasion
/// subtracts.
pub fn calculate_hit_chance(
    attacker: &EntityState,
    target: &EntityState,
    kind: AttackType,
    distance: f64,
) -> f64 {
    let base = match kind {
        AttackType::Melee => 85.0,
        AttackType::Ranged => 75.0 - distance * 5.0,
        AttackType::Special => f64::from(attacker.stats.special_accuracy),
    };
    let chance = base + f64::from(attacker.stats.accuracy) - f64::from(target.stats.evasion);
    chance.clamp(GameConfig::HIT_CHANCE_MIN, GameConfig::HIT_CHANCE_MAX)
}

/// Armor multiplier after the reduction cap.
fn armor_multiplier(target: &EntityState) -> f64 {
    let reduction = target.stats.armor.min(GameConfig::ARMOR_CAP);
    f64::from(100 - reduction) / 100.0
}

/// Damage envelope for a hit: base power through armor, with the jitter
/// bounds applied at each end. Both ends floor at 1.
pub fn potential_damage(
    attacker: &EntityState,
    target: &EntityState,
    kind: AttackType,
) -> DamageRange {
    let scaled = f64::from(base_power(attacker, kind)) * armor_multiplier(target);
    DamageRange {
        min: ((scaled * 0.9).floor() as u32).max(1),
        max: ((scaled * 1.1).floor() as u32).max(1),
    }
}

fn roll_damage(
    rng: &mut GameRng,
    attacker: &EntityState,
    target: &EntityState,
    kind: AttackType,
) -> u32 {
    let scaled = f64::from(base_power(attacker, kind)) * armor_multiplier(target);
    let jittered = scaled * rng.jitter(0.9, 1.1);
    (jittered.floor() as u32).max(1)
}

/// Resolves one attack. On a precondition failure nothing is mutated and no
/// action point is spent; once the roll happens, exactly one action point is
/// deducted whether it hits or misses.
pub fn resolve_attack(
    rng: &mut GameRng,
    attacker: &mut EntityState,
    target: &mut EntityState,
    kind: AttackType,
    grid: &Grid,
) -> AttackResult {
    if attacker.action.is_exhausted() {
        return AttackResult::failure("Not enough action points");
    }

    let distance = attacker.position.distance(target.position);
    if !is_in_range(attacker, kind, distance) {
        return AttackResult::failure("Target out of range");
    }

    if kind == AttackType::Ranged && grid.is_line_blocked(attacker.position, target.position) {
        return AttackResult::failure("Line of sight blocked");
    }

    let hit_chance = calculate_hit_chance(attacker, target, kind, distance);
    let hit = rng.percent() <= hit_chance;

    let mut damage = 0;
    if hit {
        damage = roll_damage(rng, attacker, target, kind);
        target.take_damage(damage);
    }

    attacker.action.spend_point();

    tracing::debug!(
        attacker = %attacker.id,
        target = %target.id,
        kind = %kind,
        hit,
        damage,
        "attack resolved"
    );

    AttackResult {
        success: true,
        hit,
        damage,
        hit_chance,
        message: if hit {
            format!("Hit for {damage} damage")
        } else {
            "Missed".to_owned()
        },
        target_defeated: target.is_defeated,
    }
}
