use serde::{Deserialize, Serialize};

use crate::{BuildingKind, Position, UnitKind};

/// One turn-consuming action. The engine accepts exactly one successfully
/// applied command per side per turn; a rejected command leaves the turn
/// untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Move the unit on `from` to `to`, within its per-turn allowance.
    Move { from: Position, to: Position },
    /// Attack the enemy unit or building on `target` with the unit on `from`.
    Attack { from: Position, target: Position },
    /// Harvest the resource terrain on `target` with the unit on `from`.
    Collect { from: Position, target: Position },
    /// Train a unit at the side's barracks spawn tile.
    Train { kind: UnitKind },
    /// Place a 2x2 building with the given top-left corner.
    PlaceBuilding {
        kind: BuildingKind,
        top_left: Position,
    },
}
