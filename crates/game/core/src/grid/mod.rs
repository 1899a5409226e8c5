//! Terrain cell model, map storage, and spatial/passability queries.
//!
//! The grid is generated once at game start and owned by the orchestrator for
//! the game's lifetime. All queries on out-of-bounds positions return a
//! neutral/false result rather than failing.
mod generator;
pub mod tile;

pub use tile::{ResourceDeposit, TerrainKind, Tile};

use crate::error::InitializationError;
use crate::rng::GameRng;
use crate::state::{EntityState, Position};

/// Rectangular tile map, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Creates a grid of default (grass) tiles.
    pub fn new(width: u32, height: u32) -> Result<Self, InitializationError> {
        if width == 0 || height == 0 {
            return Err(InitializationError::ZeroDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            tiles: vec![Tile::default(); (width * height) as usize],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    fn index(&self, position: Position) -> usize {
        (position.y as u32 * self.width + position.x as u32) as usize
    }

    pub fn tile(&self, position: Position) -> Option<&Tile> {
        if !self.contains(position) {
            return None;
        }
        let idx = self.index(position);
        self.tiles.get(idx)
    }

    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        if !self.contains(position) {
            return None;
        }
        let idx = self.index(position);
        self.tiles.get_mut(idx)
    }

    /// Runs the one-time procedural generation passes: base terrain, water
    /// bodies, forest clusters, scattered resources, and spawn points.
    pub fn generate_terrain(&mut self, rng: &mut GameRng) {
        generator::generate(self, rng);
    }

    /// Map centre; the player's hero starts here.
    pub fn starting_position(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// All tiles flagged as enemy spawn points, in row-major order.
    pub fn spawn_points(&self) -> Vec<Position> {
        let mut points = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let position = Position::new(x, y);
                if self.tile(position).is_some_and(|t| t.is_spawn_point) {
                    points.push(position);
                }
            }
        }
        points
    }

    /// Whether `entity` may step onto `position`: in bounds, the entity has
    /// action points left, and the destination terrain is passable.
    pub fn is_valid_move(&self, entity: &EntityState, position: Position) -> bool {
        if entity.action.is_exhausted() {
            return false;
        }
        self.tile(position).is_some_and(Tile::is_passable)
    }

    /// Whether a structure could be placed at `position`.
    pub fn can_build_at(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_buildable)
    }

    /// Bresenham line rasterization between two positions, returning the
    /// ordered positions from just past `from` up to and including `to`
    /// (start exclusive, target inclusive).
    ///
    /// A ranged attack is blocked when any returned tile is non-transparent,
    /// so a target standing on opaque terrain cannot be shot.
    pub fn line_of_sight(&self, from: Position, to: Position) -> Vec<Position> {
        let mut line = Vec::new();

        let dx = (to.x - from.x).abs();
        let dy = -(to.y - from.y).abs();
        let sx = if from.x < to.x { 1 } else { -1 };
        let sy = if from.y < to.y { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = from.x;
        let mut y = from.y;

        loop {
            let current = Position::new(x, y);
            if current != from && self.contains(current) {
                line.push(current);
            }
            if current == to {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                if x == to.x {
                    break;
                }
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                if y == to.y {
                    break;
                }
                err += dx;
                y += sy;
            }
        }

        line
    }

    /// Whether any tile along the line (target included, start excluded)
    /// blocks sight.
    pub fn is_line_blocked(&self, from: Position, to: Position) -> bool {
        self.line_of_sight(from, to)
            .iter()
            .any(|&position| self.tile(position).is_some_and(|t| !t.is_transparent()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{
        ActionMeter, Archetype, CombatStats, EntityId, Faction, ResourceMeter,
    };

    fn walker(position: Position) -> EntityState {
        EntityState {
            id: EntityId(1),
            archetype: Archetype::Hero,
            faction: Faction::Player,
            position,
            health: ResourceMeter::at_max(100),
            action: ActionMeter::from_points(3),
            sight_range: 10,
            stats: CombatStats::default(),
            is_defeated: false,
            is_dead: false,
            death_turn: None,
            can_gather_resources: true,
        }
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            Grid::new(0, 5),
            Err(InitializationError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn out_of_bounds_queries_are_neutral() {
        let grid = Grid::new(8, 8).unwrap();
        let outside = Position::new(-1, 3);
        assert!(grid.tile(outside).is_none());
        assert!(!grid.can_build_at(outside));
        assert!(!grid.is_valid_move(&walker(Position::ORIGIN), outside));
    }

    #[test]
    fn water_and_exhausted_ap_block_movement() {
        let mut grid = Grid::new(8, 8).unwrap();
        let pond = Position::new(3, 3);
        grid.tile_mut(pond).unwrap().terrain = TerrainKind::Water;

        let mut entity = walker(Position::new(2, 3));
        assert!(!grid.is_valid_move(&entity, pond));
        assert!(grid.is_valid_move(&entity, Position::new(2, 4)));

        entity.action.drain();
        assert!(!grid.is_valid_move(&entity, Position::new(2, 4)));
    }

    #[test]
    fn line_of_sight_skips_the_start_and_keeps_the_target() {
        let grid = Grid::new(10, 10).unwrap();
        let from = Position::new(1, 1);
        let to = Position::new(5, 1);
        let line = grid.line_of_sight(from, to);
        assert_eq!(
            line,
            vec![
                Position::new(2, 1),
                Position::new(3, 1),
                Position::new(4, 1),
                Position::new(5, 1)
            ]
        );
    }

    #[test]
    fn stone_blocks_the_line() {
        let mut grid = Grid::new(10, 10).unwrap();
        let from = Position::new(1, 1);
        let to = Position::new(5, 5);
        assert!(!grid.is_line_blocked(from, to));

        grid.tile_mut(Position::new(3, 3)).unwrap().terrain = TerrainKind::Stone;
        assert!(grid.is_line_blocked(from, to));

        // The target tile counts; the start tile does not.
        grid.tile_mut(Position::new(3, 3)).unwrap().terrain = TerrainKind::Grass;
        grid.tile_mut(to).unwrap().terrain = TerrainKind::Stone;
        assert!(grid.is_line_blocked(from, to));

        grid.tile_mut(to).unwrap().terrain = TerrainKind::Grass;
        grid.tile_mut(from).unwrap().terrain = TerrainKind::Stone;
        assert!(!grid.is_line_blocked(from, to));
    }
}
