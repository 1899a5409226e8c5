use crate::resources::ResourceKind;

/// Canonical terrain classes for map tiles.
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
pub enum TerrainKind {
    #[default]
    Grass,
    Dirt,
    Stone,
    Water,
}

impl TerrainKind {
    /// Water is impassable to all entities in the current design.
    pub fn is_passable(self) -> bool {
        !matches!(self, TerrainKind::Water)
    }

    /// Stone blocks line of sight; everything else is see-through.
    pub fn is_transparent(self) -> bool {
        !matches!(self, TerrainKind::Stone)
    }
}

/// Harvestable deposit sitting on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceDeposit {
    pub kind: ResourceKind,
    pub amount: u32,
}

/// A single grid cell. Owned exclusively by [`Grid`](super::Grid).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub terrain: TerrainKind,
    resource: Option<ResourceDeposit>,
    pub is_spawn_point: bool,
}

impl Tile {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            resource: None,
            is_spawn_point: false,
        }
    }

    pub fn is_passable(&self) -> bool {
        self.terrain.is_passable()
    }

    pub fn is_transparent(&self) -> bool {
        self.terrain.is_transparent()
    }

    /// Buildable means dry land with no deposit in the way.
    pub fn is_buildable(&self) -> bool {
        self.terrain != TerrainKind::Water && self.resource.is_none()
    }

    pub fn has_resource(&self) -> bool {
        self.resource.is_some_and(|deposit| deposit.amount > 0)
    }

    pub fn resource(&self) -> Option<ResourceDeposit> {
        self.resource
    }

    pub fn resource_kind(&self) -> Option<ResourceKind> {
        self.resource.map(|deposit| deposit.kind)
    }

    pub fn set_resource(&mut self, kind: ResourceKind, amount: u32) {
        self.resource = Some(ResourceDeposit { kind, amount });
    }

    /// Extracts up to `amount` units, clearing the deposit when it empties.
    /// Returns what was actually extracted.
    pub fn extract_resource(&mut self, amount: u32) -> u32 {
        let Some(deposit) = self.resource.as_mut() else {
            return 0;
        };
        if deposit.amount == 0 {
            self.resource = None;
            return 0;
        }

        let extracted = amount.min(deposit.amount);
        deposit.amount -= extracted;
        if deposit.amount == 0 {
            self.resource = None;
        }
        extracted
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(TerrainKind::Grass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_depletes_then_clears_the_deposit() {
        let mut tile = Tile::new(TerrainKind::Grass);
        tile.set_resource(ResourceKind::Wood, 5);

        assert_eq!(tile.extract_resource(2), 2);
        assert_eq!(tile.resource_kind(), Some(ResourceKind::Wood));
        assert_eq!(tile.extract_resource(2), 2);
        assert_eq!(tile.resource().map(|d| d.amount), Some(1));

        // Last unit empties the tile and nulls the kind.
        assert_eq!(tile.extract_resource(2), 1);
        assert_eq!(tile.resource_kind(), None);
        assert_eq!(tile.extract_resource(2), 0);
    }

    #[test]
    fn transparency_and_passability_follow_terrain() {
        assert!(Tile::new(TerrainKind::Grass).is_transparent());
        assert!(!Tile::new(TerrainKind::Stone).is_transparent());
        assert!(Tile::new(TerrainKind::Stone).is_passable());
        assert!(!Tile::new(TerrainKind::Water).is_passable());
    }

    #[test]
    fn deposits_block_building() {
        let mut tile = Tile::new(TerrainKind::Dirt);
        assert!(tile.is_buildable());
        tile.set_resource(ResourceKind::Iron, 3);
        assert!(!tile.is_buildable());
        assert!(!Tile::new(TerrainKind::Water).is_buildable());
    }
}
