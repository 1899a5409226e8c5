/// Game configuration constants and tunable parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
}

impl GameConfig {
    // ===== turn cycle =====
    /// Day/night phase toggles every this many turns.
    pub const DAY_NIGHT_PERIOD: u32 = 10;
    /// Wave size floor added on top of the turn-scaled part.
    pub const BASE_WAVE_SIZE: u32 = 2;
    /// Hard cap on enemies spawned in a single wave.
    pub const MAX_WAVE_SIZE: u32 = 5;

    // ===== AI =====
    /// Upper bound on AI actions per enemy per turn, expressed as a multiple
    /// of the enemy's maximum action points. Exceeding the cap is a defined
    /// terminal condition: the enemy's turn simply ends.
    pub const AI_ACTION_BUDGET_FACTOR: u32 = 2;

    // ===== combat =====
    /// Melee reach in Euclidean tiles; permits diagonal adjacency.
    pub const MELEE_RANGE: f64 = 1.5;
    /// Attack hit chance is clamped to this band.
    pub const HIT_CHANCE_MIN: f64 = 5.0;
    pub const HIT_CHANCE_MAX: f64 = 95.0;
    /// Armor caps out at this much damage reduction (percent).
    pub const ARMOR_CAP: u32 = 75;

    // ===== fog of war =====
    /// Square radius made visible by the one-time initial reveal.
    pub const INITIAL_REVEAL_RADIUS: u32 = 15;
    /// Square radius marked explored by the one-time initial reveal.
    pub const INITIAL_EXPLORED_RADIUS: u32 = 20;

    // ===== terrain generation =====
    /// Water seeds are rejected inside this box around the map centre.
    pub const WATER_SAFE_RADIUS: i32 = 10;

    // ===== defaults =====
    pub const DEFAULT_WIDTH: u32 = 30;
    pub const DEFAULT_HEIGHT: u32 = 20;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Maximum AI loop iterations for an enemy with the given AP maximum.
    pub fn ai_action_cap(max_action_points: u32) -> u32 {
        max_action_points * Self::AI_ACTION_BUDGET_FACTOR
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}
