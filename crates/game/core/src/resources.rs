//! Economy ledger fed by tile resource extraction.

use strum::EnumCount;

use crate::grid::Grid;
use crate::state::{EntityState, Position};

/// Harvestable resource classes.
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
    strum::EnumCount,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    Wood,
    Stone,
    Iron,
    Food,
}

/// Units extracted per harvest action.
pub const HARVEST_AMOUNT: u32 = 1;

/// Simple per-kind stockpile ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceManager {
    amounts: [u32; ResourceKind::COUNT],
}

impl ResourceManager {
    /// Starts with the basic stockpile a new settlement gets.
    pub fn new() -> Self {
        let mut ledger = Self {
            amounts: [0; ResourceKind::COUNT],
        };
        ledger.add(ResourceKind::Wood, 20);
        ledger.add(ResourceKind::Stone, 10);
        ledger.add(ResourceKind::Iron, 5);
        ledger.add(ResourceKind::Food, 15);
        ledger
    }

    pub fn amount(&self, kind: ResourceKind) -> u32 {
        self.amounts[kind as usize]
    }

    pub fn add(&mut self, kind: ResourceKind, amount: u32) {
        self.amounts[kind as usize] += amount;
    }

    /// Deducts if the stockpile covers the amount; returns whether it did.
    /// An insufficient balance is left untouched.
    pub fn consume(&mut self, kind: ResourceKind, amount: u32) -> bool {
        let current = self.amounts[kind as usize];
        if current >= amount {
            self.amounts[kind as usize] = current - amount;
            return true;
        }
        false
    }

    /// Extracts one unit from the tile at `position` into the ledger.
    ///
    /// Requires the entity to have the gather capability and an action point;
    /// a successful harvest costs exactly one point.
    pub fn harvest_resource(
        &mut self,
        entity: &mut EntityState,
        grid: &mut Grid,
        position: Position,
    ) -> bool {
        if !entity.can_gather_resources || entity.action.is_exhausted() {
            return false;
        }

        let Some(tile) = grid.tile_mut(position) else {
            return false;
        };
        let Some(kind) = tile.resource_kind() else {
            return false;
        };

        let extracted = tile.extract_resource(HARVEST_AMOUNT);
        if extracted == 0 {
            return false;
        }

        self.add(kind, extracted);
        entity.action.spend_point();
        true
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_stockpile() {
        let ledger = ResourceManager::new();
        assert_eq!(ledger.amount(ResourceKind::Wood), 20);
        assert_eq!(ledger.amount(ResourceKind::Stone), 10);
        assert_eq!(ledger.amount(ResourceKind::Iron), 5);
        assert_eq!(ledger.amount(ResourceKind::Food), 15);
    }

    #[test]
    fn consume_fails_without_touching_balance() {
        let mut ledger = ResourceManager::new();
        assert!(!ledger.consume(ResourceKind::Iron, 6));
        assert_eq!(ledger.amount(ResourceKind::Iron), 5);

        assert!(ledger.consume(ResourceKind::Iron, 5));
        assert_eq!(ledger.amount(ResourceKind::Iron), 0);
    }
}
