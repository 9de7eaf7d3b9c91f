use serde::{Deserialize, Serialize};

use crate::{BuildingId, BuildingKind, Position, Resource, Side, UnitId, UnitKind};

/// Everything the simulation reports back to presentation. Events are
/// emitted in the order the underlying mutations happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // Turn flow
    TurnStarted { turn: u32, side: Side },
    TurnEnded { turn: u32, side: Side },
    MatchEnded { winner: Side },

    // Unit events
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    UnitTrained {
        unit: UnitId,
        kind: UnitKind,
        side: Side,
        at: Position,
    },
    UnitDamaged {
        unit: UnitId,
        damage: i32,
        remaining: i32,
    },
    UnitKilled { unit: UnitId, at: Position },

    // Building events
    BuildingPlaced {
        building: BuildingId,
        kind: BuildingKind,
        side: Side,
        top_left: Position,
    },
    BuildingDamaged {
        building: BuildingId,
        damage: i32,
        remaining: i32,
    },
    BuildingDestroyed {
        building: BuildingId,
        kind: BuildingKind,
        top_left: Position,
    },

    // Economy events
    Harvested {
        side: Side,
        resource: Resource,
        amount: i32,
        at: Position,
    },
    IncomeGranted {
        side: Side,
        resource: Resource,
        amount: i32,
    },
}
