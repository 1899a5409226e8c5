//! Content seam: the oracle the orchestrator queries for stat presets and
//! spawn weighting. Implementations live outside the core so balance data
//! can change without touching simulation logic.

use arrayvec::ArrayVec;

use crate::rng::GameRng;
use crate::state::{Archetype, EntityTemplate};

/// Provider of archetype stat presets and turn-scaled spawn weights.
pub trait ContentOracle {
    /// Stat preset for an archetype. Total over the fixed archetype set, so
    /// this cannot fail.
    fn template(&self, archetype: Archetype) -> EntityTemplate;

    /// Enemy spawn weights in effect at the given turn.
    fn spawn_table(&self, turn: u32) -> SpawnTable;
}

/// Weighted archetype distribution for one wave.
///
/// Weights are relative, not required to sum to any particular total.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnTable {
    entries: ArrayVec<(Archetype, u32), 8>,
}

impl SpawnTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an archetype with the given weight. Zero-weight entries are kept
    /// but never picked.
    pub fn with(mut self, archetype: Archetype, weight: u32) -> Self {
        self.entries.push((archetype, weight));
        self
    }

    pub fn entries(&self) -> &[(Archetype, u32)] {
        &self.entries
    }

    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|(_, weight)| weight).sum()
    }

    /// Weighted random draw. `None` when the table is empty or all weights
    /// are zero.
    pub fn pick(&self, rng: &mut GameRng) -> Option<Archetype> {
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        let mut roll = rng.range_u32(0, total - 1);
        for &(archetype, weight) in &self.entries {
            if roll < weight {
                return Some(archetype);
            }
            roll -= weight;
        }
        None
    }
}
