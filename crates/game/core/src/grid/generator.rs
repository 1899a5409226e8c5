//! Procedural terrain generation.
//!
//! Five passes over a fresh grass grid: random dirt/stone sprinkle, water
//! bodies grown from seeds, forest clusters (wood deposits) grown on grass,
//! scattered stone/iron/food deposits, and edge spawn points. Growth loops
//! carry attempt ceilings; running out of attempts keeps whatever coverage
//! was reached.

use crate::config::GameConfig;
use crate::resources::ResourceKind;
use crate::rng::GameRng;
use crate::state::Position;

use super::tile::{TerrainKind, Tile};
use super::Grid;

/// 8-directional expansion used by water growth.
const EXPAND_8: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// 4-directional expansion used by forest growth.
const EXPAND_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Attempts allowed when hunting for a suitable seed tile.
const SEED_ATTEMPTS: u32 = 100;

pub(super) fn generate(grid: &mut Grid, rng: &mut GameRng) {
    base_terrain(grid, rng);
    water_bodies(grid, rng);
    forest_clusters(grid, rng);
    scatter_resources(grid, rng);
    place_spawn_points(grid);
    tracing::debug!("terrain generation complete");
}

fn random_position(grid: &Grid, rng: &mut GameRng) -> Position {
    Position::new(
        rng.index(grid.width() as usize) as i32,
        rng.index(grid.height() as usize) as i32,
    )
}

/// Reset to grass, then convert ~15% of tiles to dirt and ~10% to stone
/// with a single uniform draw per tile.
fn base_terrain(grid: &mut Grid, rng: &mut GameRng) {
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            let roll = rng.unit();
            let terrain = if roll < 0.15 {
                TerrainKind::Dirt
            } else if roll < 0.25 {
                TerrainKind::Stone
            } else {
                TerrainKind::Grass
            };
            if let Some(tile) = grid.tile_mut(Position::new(x, y)) {
                *tile = Tile::new(terrain);
            }
        }
    }
}

/// Grow 3-5 water seeds via random 8-directional expansion until 20-40% of
/// the map is water or the attempt budget runs out. Seeds avoid a safe box
/// around the map centre so the player never starts in a lake.
fn water_bodies(grid: &mut Grid, rng: &mut GameRng) {
    let total_tiles = grid.width() * grid.height();
    let coverage = 0.2 + rng.unit() * 0.2;
    let target = (f64::from(total_tiles) * coverage) as u32;

    let centre = grid.starting_position();
    let seed_count = rng.range_u32(3, 5);
    let mut seeds: Vec<Position> = Vec::new();

    for _ in 0..seed_count {
        let mut position = random_position(grid, rng);
        for _ in 0..SEED_ATTEMPTS {
            let inside_safe_box = (position.x - centre.x).abs() < GameConfig::WATER_SAFE_RADIUS
                && (position.y - centre.y).abs() < GameConfig::WATER_SAFE_RADIUS;
            if !inside_safe_box {
                break;
            }
            position = random_position(grid, rng);
        }
        if let Some(tile) = grid.tile_mut(position) {
            tile.terrain = TerrainKind::Water;
            seeds.push(position);
        }
    }

    let mut water_tiles = seeds.len() as u32;
    let max_attempts = total_tiles * 10;
    let mut attempts = 0;

    while water_tiles < target && attempts < max_attempts && !seeds.is_empty() {
        attempts += 1;

        let seed = seeds[rng.index(seeds.len())];
        let (dx, dy) = EXPAND_8[rng.index(EXPAND_8.len())];
        let next = seed.offset(dx, dy);

        if let Some(tile) = grid.tile_mut(next) {
            if tile.terrain != TerrainKind::Water {
                tile.terrain = TerrainKind::Water;
                seeds.push(next);
                water_tiles += 1;
            }
        }
    }

    tracing::debug!(
        water_tiles,
        coverage = f64::from(water_tiles) / f64::from(total_tiles),
        "generated water bodies"
    );
}

/// Grow 5-8 forest seeds (wood deposits) via 4-directional expansion on
/// empty grass only, targeting 15-30% coverage.
fn forest_clusters(grid: &mut Grid, rng: &mut GameRng) {
    let total_tiles = grid.width() * grid.height();
    let coverage = 0.15 + rng.unit() * 0.15;
    let target = (f64::from(total_tiles) * coverage) as u32;

    let seed_count = rng.range_u32(5, 8);
    let mut seeds: Vec<Position> = Vec::new();

    for _ in 0..seed_count {
        let mut position = random_position(grid, rng);
        for _ in 0..SEED_ATTEMPTS {
            if grid
                .tile(position)
                .is_some_and(|t| t.terrain == TerrainKind::Grass)
            {
                break;
            }
            position = random_position(grid, rng);
        }
        let amount = initial_resource_amount(ResourceKind::Wood, rng);
        if let Some(tile) = grid.tile_mut(position) {
            tile.set_resource(ResourceKind::Wood, amount);
            seeds.push(position);
        }
    }

    let mut forest_tiles = seeds.len() as u32;
    let max_attempts = total_tiles * 10;
    let mut attempts = 0;

    while forest_tiles < target && attempts < max_attempts && !seeds.is_empty() {
        attempts += 1;

        let seed = seeds[rng.index(seeds.len())];
        let (dx, dy) = EXPAND_4[rng.index(EXPAND_4.len())];
        let next = seed.offset(dx, dy);
        let amount = initial_resource_amount(ResourceKind::Wood, rng);

        if let Some(tile) = grid.tile_mut(next) {
            if tile.terrain == TerrainKind::Grass && tile.resource_kind().is_none() {
                tile.set_resource(ResourceKind::Wood, amount);
                seeds.push(next);
                forest_tiles += 1;
            }
        }
    }

    tracing::debug!(
        forest_tiles,
        coverage = f64::from(forest_tiles) / f64::from(total_tiles),
        "generated forest clusters"
    );
}

/// Scatter stone/iron/food deposits on ~5% of the remaining empty
/// grass/dirt tiles. Wood was already placed by the forest pass.
fn scatter_resources(grid: &mut Grid, rng: &mut GameRng) {
    const SCATTER_KINDS: [ResourceKind; 3] =
        [ResourceKind::Stone, ResourceKind::Iron, ResourceKind::Food];

    let deposit_count = (f64::from(grid.width() * grid.height()) * 0.05) as u32;

    for _ in 0..deposit_count {
        let position = random_position(grid, rng);
        let kind = SCATTER_KINDS[rng.index(SCATTER_KINDS.len())];
        let amount = initial_resource_amount(kind, rng);

        if let Some(tile) = grid.tile_mut(position) {
            let open_ground =
                matches!(tile.terrain, TerrainKind::Grass | TerrainKind::Dirt);
            if open_ground && tile.resource_kind().is_none() {
                tile.set_resource(kind, amount);
            }
        }
    }
}

fn initial_resource_amount(kind: ResourceKind, rng: &mut GameRng) -> u32 {
    match kind {
        ResourceKind::Wood => rng.range_u32(5, 9),
        ResourceKind::Stone => rng.range_u32(3, 6),
        ResourceKind::Iron => rng.range_u32(2, 4),
        ResourceKind::Food => rng.range_u32(3, 5),
    }
}

/// Exactly four spawn points, one at the midpoint of each grid edge.
fn place_spawn_points(grid: &mut Grid) {
    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let midpoints = [
        Position::new(width / 2, 0),
        Position::new(width - 1, height / 2),
        Position::new(width / 2, height - 1),
        Position::new(0, height / 2),
    ];
    for position in midpoints {
        if let Some(tile) = grid.tile_mut(position) {
            tile.is_spawn_point = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(seed: u64) -> Grid {
        let mut grid = Grid::new(30, 20).unwrap();
        let mut rng = GameRng::new(seed);
        grid.generate_terrain(&mut rng);
        grid
    }

    #[test]
    fn places_exactly_four_edge_spawn_points() {
        let grid = generated(7);
        let points = grid.spawn_points();
        assert_eq!(points.len(), 4);
        assert!(points.contains(&Position::new(15, 0)));
        assert!(points.contains(&Position::new(29, 10)));
        assert!(points.contains(&Position::new(15, 19)));
        assert!(points.contains(&Position::new(0, 10)));
    }

    #[test]
    fn water_coverage_lands_in_band() {
        let grid = generated(11);
        let total = (grid.width() * grid.height()) as f64;
        let water = (0..grid.height() as i32)
            .flat_map(|y| (0..grid.width() as i32).map(move |x| Position::new(x, y)))
            .filter(|&p| grid.tile(p).unwrap().terrain == TerrainKind::Water)
            .count() as f64;
        let coverage = water / total;
        assert!(coverage >= 0.1, "coverage {coverage} too low");
        assert!(coverage <= 0.45, "coverage {coverage} too high");
    }

    #[test]
    fn forests_only_grow_on_grass() {
        let grid = generated(13);
        for y in 0..grid.height() as i32 {
            for x in 0..grid.width() as i32 {
                let tile = grid.tile(Position::new(x, y)).unwrap();
                if tile.resource_kind() == Some(ResourceKind::Wood) {
                    assert_eq!(tile.terrain, TerrainKind::Grass);
                }
            }
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        assert_eq!(generated(99), generated(99));
        assert_ne!(generated(99), generated(100));
    }

    #[test]
    fn tiny_grids_terminate() {
        let mut grid = Grid::new(3, 3).unwrap();
        let mut rng = GameRng::new(1);
        grid.generate_terrain(&mut rng);
        assert_eq!(grid.spawn_points().len(), 4);
    }
}
