/// Value result of one attack resolution. Carries no persisted identity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    /// Whether the attack was legal and resolved. `false` means a precondition
    /// failed (no action points, out of range, blocked line) and nothing was
    /// mutated.
    pub success: bool,
    /// Whether the roll landed. Meaningless when `success` is `false`.
    pub hit: bool,
    /// Damage dealt; zero on a miss or failure.
    pub damage: u32,
    /// Final clamped hit chance the roll was made against.
    pub hit_chance: f64,
    /// Human-readable outcome for the message log.
    pub message: String,
    /// Whether the target's health reached zero during this attack.
    pub target_defeated: bool,
}

impl AttackResult {
    /// Precondition failure: nothing happened, no action point was spent.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            hit: false,
            damage: 0,
            hit_chance: 0.0,
            message: message.into(),
            target_defeated: false,
        }
    }
}
