//! Turn-scaled enemy spawn weights.
//!
//! The base distribution is Zombie 40 / Skeleton 30 / Spider 20 / Creeper 10.
//! Each difficulty tier (one per ten turns, capped at ten) moves weight from
//! the slow bruisers toward spiders and creepers, keeping the total at 100.

use game_core::{Archetype, SpawnTable};

/// Tiers stop scaling past this point.
const MAX_TIER: u32 = 10;

/// Difficulty tier in effect at the given turn.
fn tier(turn: u32) -> u32 {
    (turn / 10).min(MAX_TIER)
}

/// Spawn weights for a wave at the given turn.
pub fn spawn_table(turn: u32) -> SpawnTable {
    let t = tier(turn);
    SpawnTable::new()
        .with(Archetype::Zombie, 40 - 2 * t)
        .with(Archetype::Skeleton, 30 - t)
        .with(Archetype::Spider, 20 + 2 * t)
        .with(Archetype::Creeper, 10 + t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_always_sum_to_one_hundred() {
        for turn in (0..=200).step_by(10) {
            assert_eq!(spawn_table(turn).total_weight(), 100, "turn {turn}");
        }
    }

    #[test]
    fn base_distribution_at_early_turns() {
        let table = spawn_table(5);
        assert_eq!(
            table.entries(),
            &[
                (Archetype::Zombie, 40),
                (Archetype::Skeleton, 30),
                (Archetype::Spider, 20),
                (Archetype::Creeper, 10),
            ]
        );
    }

    #[test]
    fn late_game_shifts_toward_stronger_types() {
        let late = spawn_table(150);
        assert_eq!(
            late.entries(),
            &[
                (Archetype::Zombie, 20),
                (Archetype::Skeleton, 20),
                (Archetype::Spider, 40),
                (Archetype::Creeper, 20),
            ]
        );
        // Scaling is capped, not unbounded.
        assert_eq!(spawn_table(150), spawn_table(10_000));
    }
}
