//! Combat: randomized attack resolution plus the pure preview calculator.

mod odds;
mod result;
mod system;

pub use odds::{calculate_combat_odds, CombatOdds, HitModifiers};
pub use result::AttackResult;
pub use system::{
    attack_range, calculate_hit_chance, is_in_range, potential_damage, resolve_attack,
    DamageRange,
};
