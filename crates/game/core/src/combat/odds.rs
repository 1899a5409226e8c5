//! Non-mutating combat preview: full outcome odds for the targeting UI.
//!
//! Splits the single hit roll into exclusive critical/regular/graze bands
//! and folds the damage envelopes into an expected-damage and kill-chance
//! figure. Reuses the range and hit-chance logic from attack resolution, so
//! the previewed hit chance always matches what a real roll would use.

use crate::state::{AttackType, EntityState};

use super::system::{self, DamageRange};

const CRITICAL_DAMAGE_MULTIPLIER: f64 = 1.5;
const GRAZE_DAMAGE_MULTIPLIER: f64 = 0.5;

/// Additive components behind the previewed hit chance, pre-clamp.
///
/// `cover_mod` is always zero for now; terrain cover is not modelled.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitModifiers {
    pub base_chance: f64,
    pub accuracy_mod: f64,
    pub evasion_mod: f64,
    pub distance_mod: f64,
    pub cover_mod: f64,
}

/// Pure derived preview of one prospective attack. Never mutates state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOdds {
    /// Overall chance to land any kind of hit, in percent.
    pub hit_chance: f64,
    pub critical_chance: f64,
    pub graze_chance: f64,
    pub miss_chance: f64,
    /// Lowest possible damage across all bands (a minimal graze).
    pub min_damage: u32,
    /// Highest possible damage across all bands (a maximal critical).
    pub max_damage: u32,
    /// Probability-weighted expected damage, misses included.
    pub avg_damage: f64,
    /// Chance this single attack defeats the target, in percent.
    pub kill_chance: f64,
    pub modifiers: HitModifiers,
}

/// Computes preview odds, or `None` when the attack type is out of range so
/// the UI can suppress the tooltip entirely.
pub fn calculate_combat_odds(
    attacker: &EntityState,
    target: &EntityState,
    kind: AttackType,
) -> Option<CombatOdds> {
    let distance = attacker.position.distance(target.position);
    if !system::is_in_range(attacker, kind, distance) {
        return None;
    }

    let hit_chance = system::calculate_hit_chance(attacker, target, kind, distance);
    let base = system::potential_damage(attacker, target, kind);

    let critical_chance = critical_chance(attacker);
    let graze_chance = graze_chance(target, hit_chance);
    let regular_chance = (hit_chance - critical_chance - graze_chance).max(0.0);
    let miss_chance = 100.0 - hit_chance;

    let critical = scale_band(base, CRITICAL_DAMAGE_MULTIPLIER);
    let graze = scale_band(base, GRAZE_DAMAGE_MULTIPLIER);

    let avg_damage = (critical_chance * band_average(critical)
        + regular_chance * band_average(base)
        + graze_chance * band_average(graze))
        / 100.0;

    let kill_chance = kill_chance(
        target,
        [
            (critical_chance, critical),
            (regular_chance, base),
            (graze_chance, graze),
        ],
    );

    Some(CombatOdds {
        hit_chance,
        critical_chance,
        graze_chance,
        miss_chance,
        min_damage: graze.min,
        max_damage: critical.max,
        avg_damage,
        kill_chance,
        modifiers: hit_modifiers(attacker, target, kind, distance),
    })
}

/// `clamp(0, 30, 10 + accuracy / 5)`.
fn critical_chance(attacker: &EntityState) -> f64 {
    (10.0 + f64::from(attacker.stats.accuracy) / 5.0).clamp(0.0, 30.0)
}

/// `clamp(0, 40, 15 + evasion / 3 + max(0, (70 - hitChance) / 3))`.
///
/// Low hit chances push more of the hit band into grazes.
fn graze_chance(target: &EntityState, hit_chance: f64) -> f64 {
    let hit_factor = ((70.0 - hit_chance) / 3.0).max(0.0);
    (15.0 + f64::from(target.stats.evasion) / 3.0 + hit_factor).clamp(0.0, 40.0)
}

fn scale_band(base: DamageRange, multiplier: f64) -> DamageRange {
    DamageRange {
        min: (f64::from(base.min) * multiplier).round() as u32,
        max: (f64::from(base.max) * multiplier).round() as u32,
    }
}

fn band_average(band: DamageRange) -> f64 {
    f64::from(band.min + band.max) / 2.0
}

/// Sums per-band kill probability. A band whose minimum already exceeds the
/// target's health kills with the whole band's probability; a band that only
/// reaches past health at its maximum contributes a linearly interpolated
/// fraction.
fn kill_chance(target: &EntityState, bands: [(f64, DamageRange); 3]) -> f64 {
    let health = f64::from(target.health.current);

    // Any connecting hit kills when even a minimal graze is enough.
    let graze_min = f64::from(bands[2].1.min);
    if health <= graze_min {
        return bands.iter().map(|(chance, _)| chance).sum::<f64>().min(100.0);
    }

    let mut total = 0.0;
    for (chance, band) in bands {
        let min = f64::from(band.min);
        let max = f64::from(band.max);
        if min >= health {
            total += chance;
        } else if max > health {
            total += chance * (max - health) / (max - min);
        }
    }
    total.min(100.0)
}

/// The pre-clamp breakdown shown in the tooltip. Special attacks display a
/// flat base of 70 here even though resolution uses the attacker's special
/// accuracy.
fn hit_modifiers(
    attacker: &EntityState,
    target: &EntityState,
    kind: AttackType,
    distance: f64,
) -> HitModifiers {
    let (base_chance, distance_mod) = match kind {
        AttackType::Melee => (85.0, 0.0),
        AttackType::Ranged => (75.0, -(distance * 5.0)),
        AttackType::Special => (70.0, 0.0),
    };
    HitModifiers {
        base_chance,
        accuracy_mod: f64::from(attacker.stats.accuracy),
        evasion_mod: -f64::from(target.stats.evasion),
        distance_mod,
        cover_mod: 0.0,
    }
}
