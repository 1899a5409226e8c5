//! Action-point-bounded reachability and pathfinding, scoped to the
//! currently selected entity.
//!
//! The reachable set is a cost-bounded uniform-cost search (Dijkstra over a
//! small non-negative-weight graph); paths within it come from A* with a
//! Manhattan heuristic. Both use 8-connected movement with cardinal cost 1.0
//! and diagonal cost 1.5, held as integral half-point units.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::Grid;
use crate::state::{ActionMeter, EntityId, EntityState, MoveCost, Position};

/// The eight move directions with their step costs.
const DIRECTIONS: [(i32, i32, MoveCost); 8] = [
    (0, -1, MoveCost::CARDINAL),
    (1, -1, MoveCost::DIAGONAL),
    (1, 0, MoveCost::CARDINAL),
    (1, 1, MoveCost::DIAGONAL),
    (0, 1, MoveCost::CARDINAL),
    (-1, 1, MoveCost::DIAGONAL),
    (-1, 0, MoveCost::CARDINAL),
    (-1, -1, MoveCost::DIAGONAL),
];

/// A tile the selected entity can reach, with its accumulated cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachableTile {
    pub position: Position,
    pub cost: MoveCost,
}

/// Movement system. Caches the reachable set and hover-preview path for the
/// selected entity; both are recomputed whenever selection or position/AP
/// change.
#[derive(Debug, Default)]
pub struct Movement {
    reachable: HashMap<Position, MoveCost>,
    current_path: Vec<Position>,
    selected: Option<EntityId>,
}

impl Movement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Sets the selected entity and refreshes the cached reachable set.
    /// Entities without action points get an empty cache.
    pub fn set_selected_entity(&mut self, grid: &Grid, entity: Option<&EntityState>) {
        self.reachable.clear();
        self.current_path.clear();
        self.selected = entity.map(|e| e.id);

        if let Some(entity) = entity {
            if !entity.action.is_exhausted() {
                self.calculate_reachable_tiles(grid, entity);
                tracing::trace!(
                    entity = %entity.id,
                    tiles = self.reachable.len(),
                    "reachable set refreshed"
                );
            }
        }
    }

    /// Cost-bounded search from the entity's position. The entity's own tile
    /// is always present at cost zero.
    pub fn calculate_reachable_tiles(&mut self, grid: &Grid, entity: &EntityState) {
        self.reachable.clear();

        let budget = MoveCost::from_units(entity.action.current_units());
        let start = entity.position;
        self.reachable.insert(start, MoveCost::ZERO);

        let mut visited: HashSet<Position> = HashSet::new();
        let mut frontier: BinaryHeap<Reverse<(MoveCost, Position)>> = BinaryHeap::new();
        frontier.push(Reverse((MoveCost::ZERO, start)));

        while let Some(Reverse((cost, position))) = frontier.pop() {
            if !visited.insert(position) {
                continue;
            }
            self.reachable.entry(position).or_insert(cost);

            for (dx, dy, step) in DIRECTIONS {
                let next = position.offset(dx, dy);
                if visited.contains(&next) || !grid.is_valid_move(entity, next) {
                    continue;
                }
                let next_cost = cost + step;
                if next_cost <= budget {
                    frontier.push(Reverse((next_cost, next)));
                }
            }
        }
    }

    pub fn is_reachable(&self, position: Position) -> bool {
        self.reachable.contains_key(&position)
    }

    /// Accumulated cost to a cached tile; `None` when the tile is not in the
    /// reachable set.
    pub fn movement_cost(&self, position: Position) -> Option<MoveCost> {
        self.reachable.get(&position).copied()
    }

    pub fn reachable_tiles(&self) -> Vec<ReachableTile> {
        self.reachable
            .iter()
            .map(|(&position, &cost)| ReachableTile { position, cost })
            .collect()
    }

    /// A* restricted to the cached reachable set. Returns the step sequence
    /// excluding `start`, or an empty path when `end` is not in the set.
    pub fn find_path(&self, start: Position, end: Position) -> Vec<Position> {
        if !self.is_reachable(end) {
            return Vec::new();
        }

        let heuristic =
            |position: Position| position.manhattan(end) * ActionMeter::UNITS_PER_POINT;

        // (f, g, position); Reverse turns the max-heap into a min-heap.
        let mut open: BinaryHeap<Reverse<(u32, u32, Position)>> = BinaryHeap::new();
        let mut came_from: HashMap<Position, Position> = HashMap::new();
        let mut best_g: HashMap<Position, u32> = HashMap::new();
        let mut closed: HashSet<Position> = HashSet::new();

        best_g.insert(start, 0);
        open.push(Reverse((heuristic(start), 0, start)));

        while let Some(Reverse((_, g, position))) = open.pop() {
            if position == end {
                let mut path = Vec::new();
                let mut current = position;
                while let Some(&previous) = came_from.get(&current) {
                    path.push(current);
                    current = previous;
                }
                path.reverse();
                return path;
            }
            if !closed.insert(position) {
                continue;
            }

            for (dx, dy, step) in DIRECTIONS {
                let neighbor = position.offset(dx, dy);
                if closed.contains(&neighbor) || !self.is_reachable(neighbor) {
                    continue;
                }
                let tentative = g + step.units();
                if best_g.get(&neighbor).is_none_or(|&known| tentative < known) {
                    best_g.insert(neighbor, tentative);
                    came_from.insert(neighbor, position);
                    open.push(Reverse((tentative + heuristic(neighbor), tentative, neighbor)));
                }
            }
        }

        Vec::new()
    }

    /// Hover-preview path for the rendering layer; computes and stores the
    /// path without mutating anything else.
    pub fn calculate_path(&mut self, entity: &EntityState, hovered: Position) {
        if self.is_reachable(hovered) {
            self.current_path = self.find_path(entity.position, hovered);
        } else {
            self.current_path.clear();
        }
    }

    pub fn current_path(&self) -> &[Position] {
        &self.current_path
    }

    /// Moves the entity to a reachable destination, deducting the
    /// precomputed cost. Recomputes the reachable set from the new position
    /// while action points remain, otherwise clears it.
    pub fn move_entity_along_path(
        &mut self,
        grid: &Grid,
        entity: &mut EntityState,
        end: Position,
    ) -> bool {
        let Some(cost) = self.movement_cost(end) else {
            return false;
        };
        entity.position = end;
        entity.action.spend(cost);

        if entity.action.is_exhausted() {
            self.reachable.clear();
        } else {
            self.calculate_reachable_tiles(grid, entity);
        }
        self.current_path.clear();
        true
    }
}
