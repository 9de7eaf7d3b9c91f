use holdfast_protocol::{Position, UnitKind};

use crate::unit::Unit;

/// Damage dealt by a cavalry charge. Large enough to destroy anything on
/// the board in one hit, units and buildings alike.
pub const CHARGE_DAMAGE: i32 = 9999;

/// True iff the target lies within the unit's attack reach (Manhattan).
pub fn in_range(attacker: &Unit, target: Position) -> bool {
    match attacker.position {
        Some(from) => from.distance(target) <= attacker.stats().range,
        None => false,
    }
}

/// Damage one swing deals. Cavalry always charges for a lethal hit; every
/// other kind deals its power, never less than 1.
pub fn attack_damage(attacker: &Unit) -> i32 {
    if attacker.kind == UnitKind::Cavalry {
        CHARGE_DAMAGE
    } else {
        attacker.stats().power.max(1)
    }
}
