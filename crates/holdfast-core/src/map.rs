use holdfast_protocol::{BuildingId, Position, Side, Terrain, UnitId};

/// One grid cell. Occupancy is stored as arena ids; the engine keeps both
/// sides of the tile/entity relationship in step.
#[derive(Clone, Debug)]
pub struct Tile {
    pub terrain: Terrain,
    /// Ownership tag stamped when a building claims the tile.
    pub owner: Option<Side>,
    pub unit: Option<UnitId>,
    pub building: Option<BuildingId>,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            owner: None,
            unit: None,
            building: None,
        }
    }

    /// Accessible terrain holding neither a unit nor a building.
    pub fn free_for_unit(&self) -> bool {
        self.terrain.accessible() && self.unit.is_none() && self.building.is_none()
    }
}

/// Fixed-size tile grid, row-major. Out-of-bounds lookups yield `None`;
/// every caller treats that as an automatic rejection.
#[derive(Clone, Debug)]
pub struct GameMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl GameMap {
    pub fn new(width: u32, height: u32, default_terrain: Terrain) -> Self {
        let tiles = vec![Tile::new(default_terrain); (width as usize) * (height as usize)];
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Build a map from a row-major terrain array. Returns `None` when the
    /// array does not cover the grid exactly.
    pub fn from_terrain(width: u32, height: u32, terrain: Vec<Terrain>) -> Option<Self> {
        if terrain.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles: terrain.into_iter().map(Tile::new).collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }
        Some((pos.y as usize) * (self.width as usize) + (pos.x as usize))
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index_of(pos).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index_of(pos).map(move |i| &mut self.tiles[i])
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index_of(pos).is_some()
    }

    /// All positions in row-major order, the scan order used by the
    /// opponent's placement and target searches.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    pub fn terrain_row_major(&self) -> Vec<Terrain> {
        self.tiles.iter().map(|t| t.terrain).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_lookup_is_none() {
        let map = GameMap::new(4, 3, Terrain::Grass);
        assert!(map.get(Position::new(0, 0)).is_some());
        assert!(map.get(Position::new(3, 2)).is_some());
        assert!(map.get(Position::new(4, 0)).is_none());
        assert!(map.get(Position::new(0, 3)).is_none());
        assert!(map.get(Position::new(-1, 1)).is_none());
    }

    #[test]
    fn index_of_is_row_major() {
        let map = GameMap::new(5, 4, Terrain::Grass);
        assert_eq!(map.index_of(Position::new(0, 0)), Some(0));
        assert_eq!(map.index_of(Position::new(4, 0)), Some(4));
        assert_eq!(map.index_of(Position::new(0, 1)), Some(5));
        assert_eq!(map.index_of(Position::new(4, 3)), Some(19));
    }

    #[test]
    fn from_terrain_rejects_wrong_length() {
        assert!(GameMap::from_terrain(3, 3, vec![Terrain::Grass; 8]).is_none());
        assert!(GameMap::from_terrain(3, 3, vec![Terrain::Grass; 9]).is_some());
    }

    #[test]
    fn positions_scan_row_major() {
        let map = GameMap::new(3, 2, Terrain::Grass);
        let scan: Vec<_> = map.positions().collect();
        assert_eq!(scan[0], Position::new(0, 0));
        assert_eq!(scan[1], Position::new(1, 0));
        assert_eq!(scan[3], Position::new(0, 1));
    }
}
