//! Scripted opponent. One action per invocation, picked by a fixed priority
//! chain: build, then train, then a single unit's action. Decisions are
//! pure; the engine commits whatever comes back.

use std::collections::{HashMap, HashSet, VecDeque};

use holdfast_protocol::{BuildingKind, Command, Position, Side, Terrain, UnitKind};
use tracing::trace;

use crate::building::{building_stats, footprint};
use crate::engine::GameState;
use crate::rng::GameRng;
use crate::unit::Unit;

const SCORE_UNIT: i32 = 500;
const SCORE_BUILDING: i32 = 1000;
const SCORE_CASTLE_BONUS: i32 = 10_000;

fn harvest_bonus(terrain: Terrain) -> i32 {
    match terrain {
        Terrain::Mountain => 30,
        Terrain::Forest => 20,
        Terrain::Water => 10,
        Terrain::Grass => 0,
    }
}

/// Pick the side's single action for this turn, or `None` to pass. Every
/// returned command has already passed the legality queries.
pub fn decide(state: &GameState, rng: &mut GameRng, side: Side) -> Option<Command> {
    decide_build(state, side)
        .or_else(|| decide_train(state, rng, side))
        .or_else(|| decide_unit_action(state, side))
}

/// One farm, then one mine, then up to two barracks. The spot is found
/// before affordability is checked, so a boardful of clutter never costs
/// anything.
fn decide_build(state: &GameState, side: Side) -> Option<Command> {
    let kind = if state.building_count(side, BuildingKind::Farm) == 0 {
        BuildingKind::Farm
    } else if state.building_count(side, BuildingKind::Mine) == 0 {
        BuildingKind::Mine
    } else if state.building_count(side, BuildingKind::Barracks) < 2 {
        BuildingKind::Barracks
    } else {
        return None;
    };

    let top_left = state
        .map
        .positions()
        .find(|pos| state.can_place_building(*pos).is_ok())?;
    if !state.player(side).stock.can_afford(&building_stats(kind).cost) {
        return None;
    }
    trace!(?kind, ?top_left, "opponent builds");
    Some(Command::PlaceBuilding { kind, top_left })
}

/// Uniform random pick among the three kinds. The roll is consumed even
/// when the pick turns out unaffordable and the chain falls through.
fn decide_train(state: &GameState, rng: &mut GameRng, side: Side) -> Option<Command> {
    state.barracks_spawn(side)?;
    let kind = match rng.gen_range_i32(0..3) {
        0 => UnitKind::Soldier,
        1 => UnitKind::Archer,
        _ => UnitKind::Cavalry,
    };
    if !state
        .player(side)
        .stock
        .can_afford(&crate::unit::unit_stats(kind).cost)
    {
        return None;
    }
    trace!(?kind, "opponent trains");
    Some(Command::Train { kind })
}

/// Operate the side's first-listed unit only: harvest the best tile in
/// reach, else hit the best target in range, else step toward the enemy
/// castle.
fn decide_unit_action(state: &GameState, side: Side) -> Option<Command> {
    let unit_id = *state.player(side).units.first()?;
    let unit = state.units.get(unit_id)?;
    let from = unit.position?;

    if let Some(target) = best_harvest(state, unit, from) {
        return Some(Command::Collect { from, target });
    }
    if let Some(target) = best_target(state, side, from) {
        return Some(Command::Attack { from, target });
    }

    let to = step_toward_castle(state, unit, from, side.other())?;
    state.can_move(side, from, to).ok()?;
    Some(Command::Move { from, to })
}

/// Best harvestable tile in reach: terrain bonus minus distance, row-major
/// first-found wins ties.
fn best_harvest(state: &GameState, unit: &Unit, from: Position) -> Option<Position> {
    let mut best: Option<(i32, Position)> = None;
    for pos in state.map.positions() {
        if state.can_collect(from, pos).is_err() {
            continue;
        }
        let terrain = state.map.get(pos)?.terrain;
        let score = harvest_bonus(terrain) - from.distance(pos);
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, pos));
        }
    }
    best.map(|(_, pos)| pos)
}

/// Best target in range: buildings over units, castles above all, nearer
/// over farther, row-major first-found wins ties.
fn best_target(state: &GameState, side: Side, from: Position) -> Option<Position> {
    let mut best: Option<(i32, Position)> = None;
    for pos in state.map.positions() {
        if state.can_attack(side, from, pos).is_err() {
            continue;
        }
        let tile = state.map.get(pos)?;
        let base = match tile.building.and_then(|id| state.buildings.get(id)) {
            Some(building) if building.kind == BuildingKind::Castle => {
                SCORE_BUILDING + SCORE_CASTLE_BONUS
            }
            Some(_) => SCORE_BUILDING,
            None => SCORE_UNIT,
        };
        let score = base - from.distance(pos);
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, pos));
        }
    }
    best.map(|(_, pos)| pos)
}

/// All on-board approach tiles around the enemy castle: the 4-neighborhood
/// of each footprint cell, deduplicated.
fn castle_goals(state: &GameState, enemy: Side) -> Vec<Position> {
    let Some(top_left) = state.building_top_left(enemy, BuildingKind::Castle) else {
        return Vec::new();
    };
    let mut goals = Vec::new();
    for cell in footprint(top_left) {
        for neighbor in cell.neighbors() {
            if state.map.contains(neighbor) && !goals.contains(&neighbor) {
                goals.push(neighbor);
            }
        }
    }
    goals
}

/// One step (two for cavalry) along a shortest path toward the enemy
/// castle's surroundings.
fn step_toward_castle(
    state: &GameState,
    unit: &Unit,
    from: Position,
    enemy: Side,
) -> Option<Position> {
    let goals = castle_goals(state, enemy);
    let first = bfs_first_step(state, from, &goals)?;
    if unit.stats().moves < 2 {
        return Some(first);
    }
    // Second pass from the first step's tile. The mover still occupies
    // `from`, so the search cannot backtrack through it; guard anyway.
    match bfs_first_step(state, first, &goals) {
        Some(second) if second != from => Some(second),
        _ => Some(first),
    }
}

/// Breadth-first search over free tiles from `start`. Returns the first
/// step of the shortest path to the nearest goal tile, or toward the
/// visited tile closest to any goal when no goal is reachable.
fn bfs_first_step(state: &GameState, start: Position, goals: &[Position]) -> Option<Position> {
    if goals.is_empty() {
        return None;
    }
    let goal_distance =
        |pos: Position| goals.iter().map(|g| pos.distance(*g)).min().unwrap_or(i32::MAX);

    let mut visited: HashSet<Position> = HashSet::from([start]);
    let mut parent: HashMap<Position, Position> = HashMap::new();
    let mut queue: VecDeque<Position> = VecDeque::from([start]);
    let mut best_approach = (goal_distance(start), start);
    let mut reached = None;

    while let Some(pos) = queue.pop_front() {
        if pos != start && goals.contains(&pos) {
            reached = Some(pos);
            break;
        }
        for next in pos.neighbors() {
            if visited.contains(&next) || !state.free_for_unit(next) {
                continue;
            }
            visited.insert(next);
            parent.insert(next, pos);
            let d = goal_distance(next);
            if d < best_approach.0 {
                best_approach = (d, next);
            }
            queue.push_back(next);
        }
    }

    let target = reached.unwrap_or(best_approach.1);
    if target == start {
        return None;
    }
    let mut step = target;
    while parent.get(&step) != Some(&start) {
        step = *parent.get(&step)?;
    }
    Some(step)
}

#[cfg(test)]
mod tests {
    use holdfast_protocol::Resource;

    use super::*;
    use crate::economy::Stockpile;
    use crate::engine::{initial_stock, Engine};
    use crate::map::GameMap;

    fn bare_engine() -> Engine {
        Engine::from_parts(
            GameMap::new(16, 8, Terrain::Grass),
            initial_stock(),
            initial_stock(),
            GameRng::seed_from_u64(7),
        )
    }

    /// Both castles and barracks down, one farm and one mine already owned
    /// by the opponent so the build step is exhausted past the barracks cap.
    fn built_out_engine() -> Engine {
        let mut engine = bare_engine();
        engine.place_building_at(BuildingKind::Castle, Side::Human, Position::new(14, 6));
        engine.place_building_at(BuildingKind::Castle, Side::Opponent, Position::new(0, 0));
        engine.place_building_at(BuildingKind::Barracks, Side::Opponent, Position::new(2, 0));
        engine.place_building_at(BuildingKind::Barracks, Side::Opponent, Position::new(4, 0));
        engine.place_building_at(BuildingKind::Farm, Side::Opponent, Position::new(6, 0));
        engine.place_building_at(BuildingKind::Mine, Side::Opponent, Position::new(8, 0));
        engine
    }

    #[test]
    fn builds_a_farm_first_when_affordable() {
        let mut engine = bare_engine();
        engine.place_building_at(BuildingKind::Castle, Side::Opponent, Position::new(0, 0));
        // Farm costs 80 wood; starting stock has 10. Top it up.
        let mut rng = GameRng::seed_from_u64(1);
        assert_eq!(decide(engine.state(), &mut rng, Side::Opponent), None);

        let map = GameMap::new(16, 8, Terrain::Grass);
        let rich = Stockpile::from_amounts(holdfast_protocol::ResourceAmounts {
            gold: 200,
            wood: 200,
            stone: 200,
            food: 200,
        });
        let mut engine = Engine::from_parts(
            map,
            initial_stock(),
            rich,
            GameRng::seed_from_u64(7),
        );
        engine.place_building_at(BuildingKind::Castle, Side::Opponent, Position::new(0, 0));
        let command = decide(engine.state(), &mut rng, Side::Opponent);
        // Row-major scan: the first free footprint starts right of the castle.
        assert_eq!(
            command,
            Some(Command::PlaceBuilding {
                kind: BuildingKind::Farm,
                top_left: Position::new(2, 0),
            })
        );
    }

    #[test]
    fn unaffordable_build_falls_through_to_training() {
        let mut engine = bare_engine();
        engine.place_building_at(BuildingKind::Castle, Side::Opponent, Position::new(0, 0));
        engine.place_building_at(BuildingKind::Barracks, Side::Opponent, Position::new(2, 0));
        // Farm is unaffordable (10 wood), every unit kind is affordable.
        let mut rng = GameRng::seed_from_u64(5);
        let command = decide(engine.state(), &mut rng, Side::Opponent);
        assert!(matches!(command, Some(Command::Train { .. })));
    }

    #[test]
    fn prefers_harvest_over_march() {
        let mut engine = built_out_engine();
        let from = Position::new(8, 4);
        engine.spawn_unit_at(UnitKind::Soldier, Side::Opponent, from).unwrap();
        engine
            .state_mut_for_tests()
            .map
            .get_mut(Position::new(8, 5))
            .unwrap()
            .terrain = Terrain::Mountain;
        // Training must not fire first: drain the stock below any unit cost.
        drain_stock(&mut engine, Side::Opponent);

        let mut rng = GameRng::seed_from_u64(2);
        assert_eq!(
            decide(engine.state(), &mut rng, Side::Opponent),
            Some(Command::Collect {
                from,
                target: Position::new(8, 5),
            })
        );
    }

    #[test]
    fn mountain_outranks_nearer_water() {
        let mut engine = built_out_engine();
        let from = Position::new(8, 4);
        engine.spawn_unit_at(UnitKind::Archer, Side::Opponent, from).unwrap();
        engine
            .state_mut_for_tests()
            .map
            .get_mut(Position::new(8, 5))
            .unwrap()
            .terrain = Terrain::Water;
        engine
            .state_mut_for_tests()
            .map
            .get_mut(Position::new(8, 6))
            .unwrap()
            .terrain = Terrain::Mountain;
        drain_stock(&mut engine, Side::Opponent);

        // Water scores 10 - 1 = 9, mountain 30 - 2 = 28.
        let mut rng = GameRng::seed_from_u64(2);
        assert_eq!(
            decide(engine.state(), &mut rng, Side::Opponent),
            Some(Command::Collect {
                from,
                target: Position::new(8, 6),
            })
        );
    }

    #[test]
    fn castle_outranks_an_adjacent_unit() {
        let mut engine = built_out_engine();
        // Next to both an enemy unit and the human castle footprint.
        let from = Position::new(14, 5);
        engine.spawn_unit_at(UnitKind::Soldier, Side::Opponent, from).unwrap();
        engine.spawn_unit_at(UnitKind::Soldier, Side::Human, Position::new(13, 5)).unwrap();
        drain_stock(&mut engine, Side::Opponent);

        let mut rng = GameRng::seed_from_u64(2);
        assert_eq!(
            decide(engine.state(), &mut rng, Side::Opponent),
            Some(Command::Attack {
                from,
                target: Position::new(14, 6),
            })
        );
    }

    #[test]
    fn marches_toward_the_enemy_castle() {
        let mut engine = built_out_engine();
        let from = Position::new(10, 4);
        engine.spawn_unit_at(UnitKind::Soldier, Side::Opponent, from).unwrap();
        drain_stock(&mut engine, Side::Opponent);

        let mut rng = GameRng::seed_from_u64(2);
        let command = decide(engine.state(), &mut rng, Side::Opponent);
        let Some(Command::Move { from: f, to }) = command else {
            panic!("expected a move, got {command:?}");
        };
        assert_eq!(f, from);
        assert_eq!(from.distance(to), 1);
        // The human castle sits at (14, 6); the step must not walk away.
        let goal = Position::new(14, 6);
        assert!(to.distance(goal) < from.distance(goal));
    }

    #[test]
    fn corner_castle_goals_stay_on_the_board() {
        let mut engine = built_out_engine();
        // The human castle footprint touches the board corner, so half its
        // neighborhood falls outside the grid and must not enter the goal
        // set. The edge-hugging march below still finds the on-board goals.
        let from = Position::new(15, 3);
        engine.spawn_unit_at(UnitKind::Soldier, Side::Opponent, from).unwrap();
        drain_stock(&mut engine, Side::Opponent);

        let mut rng = GameRng::seed_from_u64(2);
        let command = decide(engine.state(), &mut rng, Side::Opponent);
        assert_eq!(
            command,
            Some(Command::Move {
                from,
                to: Position::new(15, 4),
            })
        );
    }

    #[test]
    fn cavalry_takes_two_steps() {
        let mut engine = built_out_engine();
        let from = Position::new(10, 4);
        engine.spawn_unit_at(UnitKind::Cavalry, Side::Opponent, from).unwrap();
        drain_stock(&mut engine, Side::Opponent);

        let mut rng = GameRng::seed_from_u64(2);
        let command = decide(engine.state(), &mut rng, Side::Opponent);
        let Some(Command::Move { to, .. }) = command else {
            panic!("expected a move, got {command:?}");
        };
        assert_eq!(from.distance(to), 2);
    }

    #[test]
    fn walled_in_unit_heads_for_the_best_approach() {
        let mut engine = built_out_engine();
        // Full-height water wall: the castle is unreachable, but tiles just
        // west of the wall are closer than the start.
        for y in 0..8 {
            engine
                .state_mut_for_tests()
                .map
                .get_mut(Position::new(12, y))
                .unwrap()
                .terrain = Terrain::Water;
        }
        let from = Position::new(10, 4);
        engine.spawn_unit_at(UnitKind::Soldier, Side::Opponent, from).unwrap();
        drain_stock(&mut engine, Side::Opponent);

        let mut rng = GameRng::seed_from_u64(2);
        let command = decide(engine.state(), &mut rng, Side::Opponent);
        assert!(matches!(command, Some(Command::Move { .. })));
    }

    #[test]
    fn no_units_and_nothing_to_do_passes() {
        let mut engine = built_out_engine();
        drain_stock(&mut engine, Side::Opponent);
        let mut rng = GameRng::seed_from_u64(2);
        assert_eq!(decide(engine.state(), &mut rng, Side::Opponent), None);
    }

    fn drain_stock(engine: &mut Engine, side: Side) {
        let amounts = engine.state().player(side).stock.amounts();
        let stock = engine.stock_mut_for_tests(side);
        for resource in Resource::ALL {
            stock.add(resource, -amounts.get(resource));
        }
    }
}
