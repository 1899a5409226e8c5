//! Core data model: identifiers, positions, meters, and the entity struct.
//!
//! These types are owned by the systems that mutate them (registry, grid,
//! orchestrator); everything here is plain data with invariant-preserving
//! helpers.
pub mod archetype;
pub mod common;
pub mod entity;

pub use archetype::{Archetype, CombatStats, EntityTemplate};
pub use common::{ActionMeter, AttackType, EntityId, Faction, MoveCost, Position, ResourceMeter};
pub use entity::EntityState;
