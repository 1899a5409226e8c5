//! Entity registry: the single source of truth for live entities.

use crate::state::{Archetype, EntityId, EntityState, Faction, Position};

/// Registry and spatial/faction query surface over live entities.
///
/// Iteration-order guarantees matter here: positional lookups return the
/// earliest-inserted match, and nearest-entity ties break toward the
/// earliest-inserted entity.
#[derive(Debug, Default)]
pub struct EntityManager {
    entities: Vec<EntityState>,
    next_id: u32,
}

impl EntityManager {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocates a new unique id. Ids are never reused.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn add(&mut self, entity: EntityState) {
        self.entities.push(entity);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<EntityState> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityState> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityState> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Simultaneous mutable access to two distinct entities, used by attack
    /// resolution to mutate attacker and target in one call.
    pub fn get_pair_mut(
        &mut self,
        a: EntityId,
        b: EntityId,
    ) -> Option<(&mut EntityState, &mut EntityState)> {
        if a == b {
            return None;
        }
        let ia = self.entities.iter().position(|e| e.id == a)?;
        let ib = self.entities.iter().position(|e| e.id == b)?;
        if ia < ib {
            let (left, right) = self.entities.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.entities.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// First entity occupying the tile, by insertion order. Multiple
    /// occupancy is normally prevented by movement validation.
    pub fn entity_at(&self, position: Position) -> Option<&EntityState> {
        self.entities.iter().find(|e| e.position == position)
    }

    pub fn entities_at(&self, position: Position) -> Vec<&EntityState> {
        self.entities
            .iter()
            .filter(|e| e.position == position)
            .collect()
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.entity_at(position).is_some()
    }

    pub fn by_faction(&self, faction: Faction) -> impl Iterator<Item = &EntityState> {
        self.entities.iter().filter(move |e| e.faction == faction)
    }

    pub fn by_archetype(&self, archetype: Archetype) -> impl Iterator<Item = &EntityState> {
        self.entities
            .iter()
            .filter(move |e| e.archetype == archetype)
    }

    /// Faction member minimizing Euclidean distance to `position`.
    ///
    /// Strict `<` comparison, so on exact ties the earliest-inserted entity
    /// wins.
    pub fn nearest(&self, position: Position, faction: Faction) -> Option<&EntityState> {
        let mut best: Option<(&EntityState, f64)> = None;
        for entity in self.by_faction(faction) {
            let distance = position.distance(entity.position);
            match best {
                Some((_, shortest)) if distance >= shortest => {}
                _ => best = Some((entity, distance)),
            }
        }
        best.map(|(entity, _)| entity)
    }

    /// All entities within `range` (Euclidean, inclusive) of `position`.
    pub fn in_range(&self, position: Position, range: f64) -> Vec<&EntityState> {
        self.entities
            .iter()
            .filter(|e| position.distance(e.position) <= range)
            .collect()
    }

    /// Bulk action-point reset, called once per player-turn start.
    pub fn reset_action_points_for_faction(&mut self, faction: Faction) {
        for entity in self.entities.iter_mut().filter(|e| e.faction == faction) {
            entity.reset_action_points();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityState> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Defensive id snapshot for enemy-turn processing: AI actions mutate the
    /// registry (movement, death), so iteration happens over this copy rather
    /// than the live list.
    pub fn snapshot_ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }
}
