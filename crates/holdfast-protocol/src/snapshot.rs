use serde::{Deserialize, Serialize};

use crate::{BuildingKind, Resource, Side, Terrain, UnitKind};

/// Complete persistable match state. This is the unit of save/load and the
/// input to the wire codec.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub turn: u32,
    pub human_turn: bool,
    pub human_resources: ResourceAmounts,
    pub opponent_resources: ResourceAmounts,
    /// Terrain for every tile, row-major.
    pub terrain: Vec<Terrain>,
    pub buildings: Vec<BuildingRecord>,
    pub units: Vec<UnitRecord>,
}

impl Snapshot {
    pub fn resources(&self, side: Side) -> &ResourceAmounts {
        match side {
            Side::Human => &self.human_resources,
            Side::Opponent => &self.opponent_resources,
        }
    }
}

/// One side's stock amounts at snapshot time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAmounts {
    pub gold: i32,
    pub wood: i32,
    pub stone: i32,
    pub food: i32,
}

impl ResourceAmounts {
    pub fn get(&self, resource: Resource) -> i32 {
        match resource {
            Resource::Gold => self.gold,
            Resource::Wood => self.wood,
            Resource::Stone => self.stone,
            Resource::Food => self.food,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub side: Side,
    pub kind: BuildingKind,
    /// Top-left corner of the 2x2 footprint.
    pub x: i32,
    pub y: i32,
    pub hits: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub side: Side,
    pub kind: UnitKind,
    pub x: i32,
    pub y: i32,
    pub hits: i32,
}
