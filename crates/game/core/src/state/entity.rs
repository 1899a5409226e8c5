use super::archetype::{Archetype, CombatStats};
use super::common::{ActionMeter, EntityId, Faction, Position, ResourceMeter};

/// A stat-bearing combat unit.
///
/// # Invariants
///
/// - `health.current == 0` if and only if `is_defeated`
/// - `is_dead` implies `is_defeated`
/// - `death_turn` is set exactly once, on the turn `is_dead` latches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityState {
    pub id: EntityId,
    pub archetype: Archetype,
    pub faction: Faction,
    pub position: Position,
    pub health: ResourceMeter,
    pub action: ActionMeter,
    pub sight_range: u32,
    pub stats: CombatStats,
    pub is_defeated: bool,
    pub is_dead: bool,
    pub death_turn: Option<u32>,
    pub can_gather_resources: bool,
}

impl EntityState {
    /// Applies damage, clamping health at zero and latching the defeat flag.
    pub fn take_damage(&mut self, amount: u32) {
        self.health.current = self.health.current.saturating_sub(amount);
        if self.health.current == 0 {
            self.is_defeated = true;
        }
    }

    /// Latches death at the given turn. Idempotent, and only effective once
    /// health has reached zero.
    pub fn mark_dead(&mut self, turn: u32) {
        if self.health.current == 0 && !self.is_dead {
            self.is_dead = true;
            self.death_turn = Some(turn);
        }
    }

    pub fn reset_action_points(&mut self) {
        self.action.reset();
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health.current > 0
    }
}
