use holdfast_protocol::{BuildingId, BuildingKind, Side, UnitId};

use crate::building::BuildQueue;
use crate::economy::Stockpile;
use crate::engine::GameState;

/// One of the two symmetric sides. Unit and building ids are kept in
/// insertion order; the opponent always operates its first-listed unit.
#[derive(Clone, Debug)]
pub struct Player {
    pub name: String,
    pub side: Side,
    pub stock: Stockpile,
    pub units: Vec<UnitId>,
    pub buildings: Vec<BuildingId>,
    pub build_queue: BuildQueue,
}

impl Player {
    pub fn new(name: impl Into<String>, side: Side, stock: Stockpile) -> Self {
        Self {
            name: name.into(),
            side,
            stock,
            units: Vec::new(),
            buildings: Vec::new(),
            build_queue: BuildQueue::default(),
        }
    }

    pub fn building_count(&self, state: &GameState, kind: BuildingKind) -> usize {
        self.buildings
            .iter()
            .filter(|id| {
                state
                    .buildings
                    .get(**id)
                    .is_some_and(|b| b.kind == kind)
            })
            .count()
    }
}
