use holdfast_protocol::{Position, Side, UnitKind};

use crate::economy::Cost;

/// Fixed per-kind combat profile. Kinds are data, not subtypes.
#[derive(Clone, Copy, Debug)]
pub struct UnitStats {
    pub hits: i32,
    /// Attack reach in Manhattan distance.
    pub range: i32,
    pub power: i32,
    /// Tiles the unit may cover in one turn.
    pub moves: i32,
    /// Harvest reach in Manhattan distance.
    pub collect_reach: i32,
    pub cost: Cost,
}

const SOLDIER: UnitStats = UnitStats {
    hits: 3,
    range: 1,
    power: 10,
    moves: 1,
    collect_reach: 1,
    cost: Cost {
        food: 20,
        gold: 15,
        ..Cost::FREE
    },
};

const ARCHER: UnitStats = UnitStats {
    hits: 3,
    range: 2,
    power: 15,
    moves: 1,
    collect_reach: 2,
    cost: Cost {
        food: 18,
        gold: 20,
        wood: 10,
        ..Cost::FREE
    },
};

const CAVALRY: UnitStats = UnitStats {
    hits: 2,
    range: 1,
    power: 20,
    moves: 2,
    collect_reach: 1,
    cost: Cost {
        food: 25,
        gold: 30,
        ..Cost::FREE
    },
};

pub fn unit_stats(kind: UnitKind) -> &'static UnitStats {
    match kind {
        UnitKind::Soldier => &SOLDIER,
        UnitKind::Archer => &ARCHER,
        UnitKind::Cavalry => &CAVALRY,
    }
}

#[derive(Clone, Debug)]
pub struct Unit {
    pub kind: UnitKind,
    pub owner: Side,
    /// Absent until the unit is placed on a tile.
    pub position: Option<Position>,
    pub hits: i32,
}

impl Unit {
    pub fn new(kind: UnitKind, owner: Side) -> Self {
        Self {
            kind,
            owner,
            position: None,
            hits: unit_stats(kind).hits,
        }
    }

    pub fn stats(&self) -> &'static UnitStats {
        unit_stats(self.kind)
    }

    /// Subtract damage, flooring remaining hits at zero.
    pub fn take_damage(&mut self, damage: i32) {
        self.hits = (self.hits - damage).max(0);
    }

    pub fn is_dead(&self) -> bool {
        self.hits <= 0
    }
}
