use std::fmt;

/// Unique identifier for any entity tracked in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position offset by the given deltas.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance, used for attack ranges and sight radii.
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(other.x - self.x);
        let dy = f64::from(other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Manhattan distance, used as the pathfinding heuristic.
    pub fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Chebyshev distance; 1 means the positions touch (diagonals included).
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Ownership group determining turn control and targeting eligibility.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Faction {
    #[default]
    Player,
    Enemy,
    Neutral,
}

/// Delivery mode of a single attack.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttackType {
    /// Adjacent tiles only, diagonals included.
    Melee,
    /// Distance-limited and blocked by opaque terrain.
    Ranged,
    /// Archetype-specific (explosive, poison); range and accuracy come from stats.
    Special,
}

/// Integer resource meter (health) tracked per entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// Meter filled to its maximum.
    pub fn at_max(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// Movement cost expressed in half-point units so cardinal (1.0) and
/// diagonal (1.5) steps are exact integers. Keeping costs integral lets the
/// frontier searches order nodes without floating-point comparisons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveCost(u32);

impl MoveCost {
    pub const ZERO: Self = Self(0);
    /// One full action point: a cardinal step.
    pub const CARDINAL: Self = Self(2);
    /// One and a half action points: a diagonal step.
    pub const DIAGONAL: Self = Self(3);

    pub const fn from_units(units: u32) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u32 {
        self.0
    }

    /// Cost in action points (1.0 cardinal, 1.5 diagonal).
    pub fn points(self) -> f32 {
        self.0 as f32 / 2.0
    }
}

impl std::ops::Add for MoveCost {
    type Output = MoveCost;
    fn add(self, rhs: MoveCost) -> MoveCost {
        MoveCost(self.0 + rhs.0)
    }
}

/// Per-turn action budget in the same half-point units as [`MoveCost`].
///
/// Attacks and harvesting cost one full point; moves cost the step's
/// [`MoveCost`]. `0 <= current <= maximum` holds at all times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionMeter {
    current: u32,
    maximum: u32,
}

impl ActionMeter {
    /// Half-point units per displayed action point.
    pub const UNITS_PER_POINT: u32 = 2;

    /// Full meter for an entity with the given maximum in whole points.
    pub fn from_points(max_points: u32) -> Self {
        let maximum = max_points * Self::UNITS_PER_POINT;
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn current_units(&self) -> u32 {
        self.current
    }

    pub fn maximum_units(&self) -> u32 {
        self.maximum
    }

    /// Remaining budget in displayed action points.
    pub fn points(&self) -> f32 {
        self.current as f32 / Self::UNITS_PER_POINT as f32
    }

    pub fn max_points(&self) -> u32 {
        self.maximum / Self::UNITS_PER_POINT
    }

    pub fn is_exhausted(&self) -> bool {
        self.current == 0
    }

    pub fn can_afford(&self, cost: MoveCost) -> bool {
        cost.units() <= self.current
    }

    /// Deducts a movement cost, saturating at zero.
    pub fn spend(&mut self, cost: MoveCost) {
        self.current = self.current.saturating_sub(cost.units());
    }

    /// Deducts exactly one action point (attack or harvest cost).
    pub fn spend_point(&mut self) {
        self.current = self.current.saturating_sub(Self::UNITS_PER_POINT);
    }

    pub fn reset(&mut self) {
        self.current = self.maximum;
    }

    pub fn drain(&mut self) {
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_cost_points_match_step_kind() {
        assert_eq!(MoveCost::CARDINAL.points(), 1.0);
        assert_eq!(MoveCost::DIAGONAL.points(), 1.5);
        assert_eq!((MoveCost::DIAGONAL + MoveCost::DIAGONAL).points(), 3.0);
    }

    #[test]
    fn action_meter_stays_within_bounds() {
        let mut meter = ActionMeter::from_points(3);
        assert_eq!(meter.points(), 3.0);

        meter.spend(MoveCost::DIAGONAL);
        assert_eq!(meter.points(), 1.5);

        meter.spend_point();
        assert_eq!(meter.points(), 0.5);

        // Saturates rather than underflowing.
        meter.spend(MoveCost::DIAGONAL);
        assert!(meter.is_exhausted());

        meter.reset();
        assert_eq!(meter.current_units(), meter.maximum_units());
    }

    #[test]
    fn euclidean_distance_permits_diagonal_adjacency() {
        let a = Position::new(4, 4);
        let b = Position::new(5, 5);
        assert!(a.distance(b) <= 1.5);
        assert!(a.distance(Position::new(6, 5)) > 1.5);
    }
}
