//! Initial-grid generation. The simulation only cares that it receives a
//! grid; the roll distribution here is the external collaborator behind the
//! "produce an initial grid" contract.

use holdfast_protocol::{Position, Terrain};

use crate::map::GameMap;
use crate::rng::GameRng;

#[derive(Clone, Copy, Debug)]
pub struct MapGenConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for MapGenConfig {
    fn default() -> Self {
        // The fixed scenario board.
        Self {
            width: 16,
            height: 8,
        }
    }
}

/// Roll every tile independently: 65% grass, 15% forest, 12% water,
/// 8% mountain.
pub fn generate_map(config: &MapGenConfig, rng: &mut GameRng) -> GameMap {
    let mut map = GameMap::new(config.width, config.height, Terrain::Grass);
    for y in 0..config.height as i32 {
        for x in 0..config.width as i32 {
            if let Some(tile) = map.get_mut(Position::new(x, y)) {
                tile.terrain = roll_terrain(rng);
            }
        }
    }
    map
}

/// All-grass interior with a water border. Handy for tests and demos that
/// need predictable terrain.
pub fn generate_bordered_map(config: &MapGenConfig) -> GameMap {
    let mut map = GameMap::new(config.width, config.height, Terrain::Grass);
    let (w, h) = (config.width as i32, config.height as i32);
    for y in 0..h {
        for x in 0..w {
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                if let Some(tile) = map.get_mut(Position::new(x, y)) {
                    tile.terrain = Terrain::Water;
                }
            }
        }
    }
    map
}

fn roll_terrain(rng: &mut GameRng) -> Terrain {
    let roll = rng.gen_range_i32(0..100);
    if roll < 65 {
        Terrain::Grass
    } else if roll < 80 {
        Terrain::Forest
    } else if roll < 92 {
        Terrain::Water
    } else {
        Terrain::Mountain
    }
}

/// Clear the two starting corners to grass (4x4 each) so both sides always
/// have room for their castle and barracks.
pub fn clear_start_corners(map: &mut GameMap) {
    let (w, h) = (map.width() as i32, map.height() as i32);
    for y in 0..4.min(h) {
        for x in 0..4.min(w) {
            if let Some(tile) = map.get_mut(Position::new(x, y)) {
                tile.terrain = Terrain::Grass;
            }
        }
    }
    for y in (h - 4).max(0)..h {
        for x in (w - 4).max(0)..w {
            if let Some(tile) = map.get_mut(Position::new(x, y)) {
                tile.terrain = Terrain::Grass;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let config = MapGenConfig::default();
        let a = generate_map(&config, &mut GameRng::seed_from_u64(11));
        let b = generate_map(&config, &mut GameRng::seed_from_u64(11));
        assert_eq!(a.terrain_row_major(), b.terrain_row_major());
    }

    #[test]
    fn start_corners_are_forced_grass() {
        let config = MapGenConfig::default();
        let mut map = generate_map(&config, &mut GameRng::seed_from_u64(5));
        clear_start_corners(&mut map);

        let (w, h) = (map.width() as i32, map.height() as i32);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(map.get(Position::new(x, y)).unwrap().terrain, Terrain::Grass);
                let far = Position::new(w - 1 - x, h - 1 - y);
                assert_eq!(map.get(far).unwrap().terrain, Terrain::Grass);
            }
        }
    }

    #[test]
    fn bordered_map_has_water_ring() {
        let map = generate_bordered_map(&MapGenConfig {
            width: 6,
            height: 4,
        });
        assert_eq!(map.get(Position::new(0, 0)).unwrap().terrain, Terrain::Water);
        assert_eq!(map.get(Position::new(5, 3)).unwrap().terrain, Terrain::Water);
        assert_eq!(map.get(Position::new(2, 2)).unwrap().terrain, Terrain::Grass);
    }
}
