//! Data-driven content for the simulation core: archetype stat presets and
//! turn-scaled spawn weights.
//!
//! Content lives outside `game-core` so balance changes never touch rules
//! code. [`StandardContent`] is the default oracle a session is built with.

pub mod archetypes;
pub mod spawn;

use game_core::{Archetype, ContentOracle, EntityTemplate, SpawnTable};

pub use archetypes::template;
pub use spawn::spawn_table;

/// The stock balance tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardContent;

impl ContentOracle for StandardContent {
    fn template(&self, archetype: Archetype) -> EntityTemplate {
        archetypes::template(archetype)
    }

    fn spawn_table(&self, turn: u32) -> SpawnTable {
        spawn::spawn_table(turn)
    }
}
