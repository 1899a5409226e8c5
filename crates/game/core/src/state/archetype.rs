//! Archetype tags and the data-driven stat presets behind them.
//!
//! Entities are a single struct tagged with an [`Archetype`]; everything that
//! used to vary per unit kind lives in an [`EntityTemplate`] provided by the
//! content layer. AI behavior dispatches on the tag in the orchestrator.

use super::common::{ActionMeter, EntityId, Faction, Position, ResourceMeter};
use super::entity::EntityState;

/// Fixed set of unit kinds.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Archetype {
    Hero,
    Zombie,
    Skeleton,
    Spider,
    Creeper,
}

/// Combat-relevant stats carried by every entity.
///
/// A power of 0 means the entity lacks that attack mode entirely; ranges are
/// compared against Euclidean tile distance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub accuracy: i32,
    pub evasion: i32,
    pub armor: u32,
    pub melee_power: u32,
    pub ranged_power: u32,
    pub ranged_range: u32,
    pub special_power: u32,
    pub special_range: u32,
    pub special_accuracy: i32,
}

/// Per-archetype preset defining every [`EntityState`] field except
/// identity, faction, and placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityTemplate {
    pub archetype: Archetype,
    pub max_health: u32,
    pub max_action_points: u32,
    pub sight_range: u32,
    pub stats: CombatStats,
    pub can_gather_resources: bool,
}

impl EntityTemplate {
    /// Spawns a live entity from this template at the given position.
    ///
    /// Health and action meters start at their maximums.
    pub fn to_entity(&self, id: EntityId, faction: Faction, position: Position) -> EntityState {
        EntityState {
            id,
            archetype: self.archetype,
            faction,
            position,
            health: ResourceMeter::at_max(self.max_health),
            action: ActionMeter::from_points(self.max_action_points),
            sight_range: self.sight_range,
            stats: self.stats,
            is_defeated: false,
            is_dead: false,
            death_turn: None,
            can_gather_resources: self.can_gather_resources,
        }
    }
}
