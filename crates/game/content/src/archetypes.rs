//! Stat presets for the fixed archetype set.

use game_core::{Archetype, CombatStats, EntityTemplate};

/// Preset lookup. Total over the archetype enum.
pub fn template(archetype: Archetype) -> EntityTemplate {
    match archetype {
        Archetype::Hero => EntityTemplate {
            archetype,
            max_health: 100,
            max_action_points: 3,
            sight_range: 10,
            stats: CombatStats {
                accuracy: 10,
                evasion: 5,
                armor: 2,
                melee_power: 10,
                ranged_power: 8,
                ranged_range: 3,
                special_power: 0,
                special_range: 0,
                special_accuracy: 0,
            },
            can_gather_resources: true,
        },
        Archetype::Zombie => EntityTemplate {
            archetype,
            max_health: 120,
            max_action_points: 2,
            sight_range: 6,
            stats: CombatStats {
                accuracy: 8,
                evasion: 3,
                armor: 3,
                melee_power: 12,
                ranged_power: 0,
                ranged_range: 0,
                special_power: 0,
                special_range: 0,
                special_accuracy: 0,
            },
            can_gather_resources: false,
        },
        Archetype::Skeleton => EntityTemplate {
            archetype,
            max_health: 80,
            max_action_points: 2,
            sight_range: 8,
            stats: CombatStats {
                accuracy: 12,
                evasion: 6,
                armor: 1,
                melee_power: 6,
                ranged_power: 10,
                ranged_range: 4,
                special_power: 0,
                special_range: 0,
                special_accuracy: 0,
            },
            can_gather_resources: false,
        },
        Archetype::Spider => EntityTemplate {
            archetype,
            max_health: 60,
            max_action_points: 3,
            sight_range: 7,
            stats: CombatStats {
                accuracy: 10,
                evasion: 10,
                armor: 1,
                melee_power: 8,
                ranged_power: 0,
                ranged_range: 0,
                // Poison bite: weak but reliable at point-blank range.
                special_power: 5,
                special_range: 1,
                special_accuracy: 15,
            },
            can_gather_resources: false,
        },
        Archetype::Creeper => EntityTemplate {
            archetype,
            max_health: 40,
            max_action_points: 2,
            sight_range: 6,
            stats: CombatStats {
                accuracy: 8,
                evasion: 4,
                armor: 0,
                melee_power: 0,
                ranged_power: 0,
                ranged_range: 0,
                // The explosion: huge, short-ranged, nearly always connects.
                special_power: 25,
                special_range: 2,
                special_accuracy: 100,
            },
            can_gather_resources: false,
        },
    }
}
