use crate::state::EntityId;

/// Errors surfaced while constructing a game or grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitializationError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// Faults raised inside an enemy's AI decision procedure.
///
/// These never propagate past the per-enemy boundary: the orchestrator logs
/// the fault and drains the enemy's action points so the turn always
/// terminates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AiError {
    #[error("enemy {0} vanished mid-processing")]
    ActorMissing(EntityId),

    #[error("target {0} vanished mid-processing")]
    TargetMissing(EntityId),
}
