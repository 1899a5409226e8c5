//! Deterministic turn-based grid-combat simulation core.
//!
//! `game-core` owns the canonical rules: terrain, entities, movement,
//! combat, fog of war, the resource ledger, and the turn/AI orchestrator.
//! All state mutation flows through [`game::Game`]; a presentation layer
//! only reads between calls and forwards intents into the public entry
//! points re-exported here. Stat presets and spawn weights come from a
//! [`content::ContentOracle`] implementation, typically `game-content`.
pub mod combat;
pub mod config;
pub mod content;
pub mod error;
pub mod event;
pub mod fog;
pub mod game;
pub mod grid;
pub mod manager;
pub mod movement;
pub mod resources;
pub mod rng;
pub mod state;

pub use combat::{
    calculate_combat_odds, resolve_attack, AttackResult, CombatOdds, DamageRange, HitModifiers,
};
pub use config::GameConfig;
pub use content::{ContentOracle, SpawnTable};
pub use error::{AiError, InitializationError};
pub use event::{EventLog, EventSink, GameEvent};
pub use fog::{FogOfWar, VisibilityState};
pub use game::{DayPhase, Game, TurnPhase};
pub use grid::{Grid, ResourceDeposit, TerrainKind, Tile};
pub use manager::EntityManager;
pub use movement::{Movement, ReachableTile};
pub use resources::{ResourceKind, ResourceManager, HARVEST_AMOUNT};
pub use rng::GameRng;
pub use state::{
    ActionMeter, Archetype, AttackType, CombatStats, EntityId, EntityState, EntityTemplate,
    Faction, MoveCost, Position, ResourceMeter,
};
