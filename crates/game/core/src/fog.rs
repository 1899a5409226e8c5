//! Per-tile visibility state machine.
//!
//! Three states with one-way discovery: tiles never return to unexplored.
//! Visibility is recomputed each player-turn start by demoting everything
//! visible to explored and re-revealing around every player entity. Reveals
//! apply no line-of-sight occlusion, so sight radii pass through opaque
//! terrain even though ranged attacks do not.

use crate::config::GameConfig;
use crate::error::InitializationError;
use crate::state::Position;

/// Discovery state of a single tile.
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
pub enum VisibilityState {
    #[default]
    Unexplored,
    /// Seen before; terrain is remembered but entities are hidden.
    Explored,
    /// Currently in sight of a player entity.
    Visible,
}

/// Fog layer sized to the grid, stored row-major. Out-of-bounds queries
/// report [`VisibilityState::Unexplored`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FogOfWar {
    width: u32,
    height: u32,
    states: Vec<VisibilityState>,
}

impl FogOfWar {
    pub fn new(width: u32, height: u32) -> Result<Self, InitializationError> {
        if width == 0 || height == 0 {
            return Err(InitializationError::ZeroDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            states: vec![VisibilityState::Unexplored; (width * height) as usize],
        })
    }

    fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> usize {
        (position.y as u32 * self.width + position.x as u32) as usize
    }

    /// Demotes every visible tile to explored. Called once per player-turn
    /// boundary before re-revealing.
    pub fn reset(&mut self) {
        for state in &mut self.states {
            if *state == VisibilityState::Visible {
                *state = VisibilityState::Explored;
            }
        }
    }

    /// Marks visible every in-bounds tile within Euclidean `radius` of
    /// `center` (circular reveal).
    pub fn reveal_area(&mut self, center: Position, radius: u32) {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let position = center.offset(dx, dy);
                if self.contains(position) && center.distance(position) <= f64::from(radius) {
                    let idx = self.index(position);
                    self.states[idx] = VisibilityState::Visible;
                }
            }
        }
    }

    /// Marks visible every in-bounds tile in the square of the given radius.
    pub fn reveal_square_area(&mut self, center: Position, radius: u32) {
        let r = radius as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let position = center.offset(dx, dy);
                if self.contains(position) {
                    let idx = self.index(position);
                    self.states[idx] = VisibilityState::Visible;
                }
            }
        }
    }

    /// One-time oversized reveal at game start: a visible square plus a
    /// larger explored halo, so the opening view is playable.
    pub fn reveal_initial_area(&mut self, center: Position) {
        self.reveal_square_area(center, GameConfig::INITIAL_REVEAL_RADIUS);

        let r = GameConfig::INITIAL_EXPLORED_RADIUS as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                let position = center.offset(dx, dy);
                if self.contains(position) {
                    let idx = self.index(position);
                    if self.states[idx] == VisibilityState::Unexplored {
                        self.states[idx] = VisibilityState::Explored;
                    }
                }
            }
        }
        tracing::debug!(%center, "initial area revealed");
    }

    pub fn visibility(&self, position: Position) -> VisibilityState {
        if !self.contains(position) {
            return VisibilityState::Unexplored;
        }
        self.states[self.index(position)]
    }

    pub fn is_visible(&self, position: Position) -> bool {
        self.visibility(position) == VisibilityState::Visible
    }

    pub fn is_explored(&self, position: Position) -> bool {
        matches!(
            self.visibility(position),
            VisibilityState::Explored | VisibilityState::Visible
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_never_reverts_to_unexplored() {
        let mut fog = FogOfWar::new(40, 40).unwrap();
        let center = Position::new(20, 20);

        fog.reveal_area(center, 3);
        assert!(fog.is_visible(center));

        fog.reset();
        assert_eq!(fog.visibility(center), VisibilityState::Explored);
        assert!(fog.is_explored(center));
        assert!(!fog.is_visible(center));

        fog.reset();
        assert_eq!(fog.visibility(center), VisibilityState::Explored);
    }

    #[test]
    fn circular_reveal_respects_euclidean_radius() {
        let mut fog = FogOfWar::new(40, 40).unwrap();
        let center = Position::new(20, 20);
        fog.reveal_area(center, 5);

        // On-axis edge of the circle.
        assert!(fog.is_visible(Position::new(25, 20)));
        // Corner of the bounding square lies outside the circle.
        assert!(!fog.is_visible(Position::new(25, 25)));
        assert_eq!(
            fog.visibility(Position::new(25, 25)),
            VisibilityState::Unexplored
        );
        // (3, 4, 5) triangle lands exactly on the rim.
        assert!(fog.is_visible(Position::new(23, 24)));
    }

    #[test]
    fn initial_reveal_layers_visible_inside_explored() {
        let mut fog = FogOfWar::new(50, 50).unwrap();
        let center = Position::new(25, 25);
        fog.reveal_initial_area(center);

        assert!(fog.is_visible(center));
        assert!(fog.is_visible(Position::new(
            center.x + GameConfig::INITIAL_REVEAL_RADIUS as i32,
            center.y + GameConfig::INITIAL_REVEAL_RADIUS as i32,
        )));
        // Between the two radii: explored but not visible.
        let halo = Position::new(center.x + 18, center.y);
        assert_eq!(fog.visibility(halo), VisibilityState::Explored);
        // Beyond the explored halo: untouched.
        assert_eq!(
            fog.visibility(Position::new(center.x + 21, center.y + 21)),
            VisibilityState::Unexplored
        );
    }

    #[test]
    fn out_of_bounds_reads_as_unexplored() {
        let fog = FogOfWar::new(10, 10).unwrap();
        assert_eq!(
            fog.visibility(Position::new(-1, 4)),
            VisibilityState::Unexplored
        );
        assert!(!fog.is_visible(Position::new(10, 0)));
        assert!(!fog.is_explored(Position::new(0, 10)));
    }

    #[test]
    fn reveals_clip_at_the_border() {
        let mut fog = FogOfWar::new(10, 10).unwrap();
        fog.reveal_square_area(Position::new(0, 0), 3);
        assert!(fog.is_visible(Position::new(3, 3)));
        assert!(!fog.is_visible(Position::new(4, 4)));
    }
}
