use serde::{Deserialize, Serialize};

/// Which of the two symmetric sides an entity belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Human,
    Opponent,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Human, Side::Opponent];

    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Human => Side::Opponent,
            Side::Opponent => Side::Human,
        }
    }

    /// Single-letter flag used in the save format.
    pub fn token(self) -> &'static str {
        match self {
            Side::Human => "H",
            Side::Opponent => "E",
        }
    }

    pub fn from_token(token: &str) -> Option<Side> {
        match token {
            "H" => Some(Side::Human),
            "E" => Some(Side::Opponent),
            _ => None,
        }
    }
}

/// Tile terrain. Only grass is walkable; the other kinds exist as harvest
/// targets and obstacles until collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Grass,
    Water,
    Mountain,
    Forest,
}

impl Terrain {
    pub const ALL: [Terrain; 4] = [
        Terrain::Grass,
        Terrain::Water,
        Terrain::Mountain,
        Terrain::Forest,
    ];

    #[inline]
    pub fn accessible(self) -> bool {
        matches!(self, Terrain::Grass)
    }

    /// What harvesting this terrain grants, if anything.
    pub fn harvest_yield(self) -> Option<Resource> {
        match self {
            Terrain::Forest => Some(Resource::Wood),
            Terrain::Mountain => Some(Resource::Stone),
            Terrain::Water => Some(Resource::Food),
            Terrain::Grass => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Terrain::Grass => "GRASS",
            Terrain::Water => "WATER",
            Terrain::Mountain => "MOUNTAIN",
            Terrain::Forest => "FOREST",
        }
    }

    pub fn from_token(token: &str) -> Option<Terrain> {
        match token {
            "GRASS" => Some(Terrain::Grass),
            "WATER" => Some(Terrain::Water),
            "MOUNTAIN" => Some(Terrain::Mountain),
            "FOREST" => Some(Terrain::Forest),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Gold,
    Wood,
    Stone,
    Food,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Gold,
        Resource::Wood,
        Resource::Stone,
        Resource::Food,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Soldier,
    Archer,
    Cavalry,
}

impl UnitKind {
    pub const ALL: [UnitKind; 3] = [UnitKind::Soldier, UnitKind::Archer, UnitKind::Cavalry];

    pub fn token(self) -> &'static str {
        match self {
            UnitKind::Soldier => "SOLDIER",
            UnitKind::Archer => "ARCHER",
            UnitKind::Cavalry => "CAVALRY",
        }
    }

    pub fn from_token(token: &str) -> Option<UnitKind> {
        match token {
            "SOLDIER" => Some(UnitKind::Soldier),
            "ARCHER" => Some(UnitKind::Archer),
            "CAVALRY" => Some(UnitKind::Cavalry),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Castle,
    Barracks,
    Farm,
    Mine,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 4] = [
        BuildingKind::Castle,
        BuildingKind::Barracks,
        BuildingKind::Farm,
        BuildingKind::Mine,
    ];

    pub fn token(self) -> &'static str {
        match self {
            BuildingKind::Castle => "CASTLE",
            BuildingKind::Barracks => "BARRACKS",
            BuildingKind::Farm => "FARM",
            BuildingKind::Mine => "MINE",
        }
    }

    pub fn from_token(token: &str) -> Option<BuildingKind> {
        match token {
            "CASTLE" => Some(BuildingKind::Castle),
            "BARRACKS" => Some(BuildingKind::Barracks),
            "FARM" => Some(BuildingKind::Farm),
            "MINE" => Some(BuildingKind::Mine),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for terrain in Terrain::ALL {
            assert_eq!(Terrain::from_token(terrain.token()), Some(terrain));
        }
        for kind in UnitKind::ALL {
            assert_eq!(UnitKind::from_token(kind.token()), Some(kind));
        }
        for kind in BuildingKind::ALL {
            assert_eq!(BuildingKind::from_token(kind.token()), Some(kind));
        }
        for side in Side::BOTH {
            assert_eq!(Side::from_token(side.token()), Some(side));
        }
    }

    #[test]
    fn only_grass_is_accessible() {
        assert!(Terrain::Grass.accessible());
        assert!(!Terrain::Water.accessible());
        assert!(!Terrain::Mountain.accessible());
        assert!(!Terrain::Forest.accessible());
    }

    #[test]
    fn harvest_yield_maps_terrain_to_resource() {
        assert_eq!(Terrain::Forest.harvest_yield(), Some(Resource::Wood));
        assert_eq!(Terrain::Mountain.harvest_yield(), Some(Resource::Stone));
        assert_eq!(Terrain::Water.harvest_yield(), Some(Resource::Food));
        assert_eq!(Terrain::Grass.harvest_yield(), None);
    }
}
