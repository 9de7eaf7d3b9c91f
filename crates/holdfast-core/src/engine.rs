use holdfast_protocol::{
    BuildingId, BuildingKind, BuildingRecord, Command, Event, Position, Resource, ResourceAmounts,
    Side, Snapshot, Terrain, UnitId, UnitKind, UnitRecord,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ai;
use crate::building::{building_stats, footprint, Building};
use crate::combat::{attack_damage, in_range};
use crate::economy::Stockpile;
use crate::entities::EntityStore;
use crate::map::GameMap;
use crate::mapgen::{clear_start_corners, generate_map, MapGenConfig};
use crate::player::Player;
use crate::rng::GameRng;
use crate::turn::TurnState;
use crate::unit::{unit_stats, Unit};

/// Resources granted per harvested tile.
pub const HARVEST_AMOUNT: i32 = 30;
/// Food granted per farm and gold per mine each turn cycle.
pub const INCOME_PER_BUILDING: i32 = 10;

/// The endowment both sides start a fresh match with.
pub fn initial_stock() -> Stockpile {
    Stockpile::from_amounts(ResourceAmounts {
        gold: 65,
        wood: 10,
        stone: 0,
        food: 63,
    })
}

/// Why an action was rejected. The display string doubles as the
/// presentation notice.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("not your turn")]
    NotYourTurn,
    #[error("the match is already decided")]
    MatchOver,
    #[error("no tile there")]
    OutOfBounds,
    #[error("no unit on that tile")]
    NoUnit,
    #[error("that unit is not yours")]
    NotYourUnit,
    #[error("destination tile is not free")]
    DestinationBlocked,
    #[error("a move must cover at least one tile")]
    MustMove,
    #[error("destination is beyond the unit's movement")]
    TooFar,
    #[error("target is out of reach")]
    OutOfRange,
    #[error("no enemy unit or building there")]
    NoTarget,
    #[error("nothing to harvest there")]
    NothingToHarvest,
    #[error("harvest tile is occupied")]
    HarvestBlocked,
    #[error("needs an empty 2x2 grass area")]
    BadFootprint,
    #[error("no spawn space near the barracks")]
    NoSpawnSpace,
    #[error("not enough resources")]
    NotEnoughResources,
    #[error("snapshot grid does not match its dimensions")]
    MalformedSnapshot,
}

/// All mutable match state. Only [`Engine`] mutates it; everything here is
/// readable for legality queries and presentation.
#[derive(Clone, Debug)]
pub struct GameState {
    pub map: GameMap,
    pub units: EntityStore<Unit>,
    pub buildings: EntityStore<Building>,
    pub turn: TurnState,
    pub rng: GameRng,
    human: Player,
    opponent: Player,
    winner: Option<Side>,
}

impl GameState {
    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Human => &self.human,
            Side::Opponent => &self.opponent,
        }
    }

    fn player_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Human => &mut self.human,
            Side::Opponent => &mut self.opponent,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn unit_at(&self, pos: Position) -> Option<UnitId> {
        self.map.get(pos)?.unit
    }

    /// Accessible tile holding neither a unit nor a building.
    pub fn free_for_unit(&self, pos: Position) -> bool {
        self.map.get(pos).is_some_and(|t| t.free_for_unit())
    }

    pub fn building_count(&self, side: Side, kind: BuildingKind) -> usize {
        self.player(side).building_count(self, kind)
    }

    /// Top-left corner of the side's first placed building of `kind`.
    pub fn building_top_left(&self, side: Side, kind: BuildingKind) -> Option<Position> {
        self.player(side)
            .buildings
            .iter()
            .filter_map(|id| self.buildings.get(*id))
            .find(|b| b.kind == kind)
            .and_then(|b| b.top_left)
    }

    /// A side stands while it has a tile-registered castle. A castle without
    /// a position counts as absent.
    pub fn castle_standing(&self, side: Side) -> bool {
        self.building_top_left(side, BuildingKind::Castle).is_some()
    }

    /// Candidate spawn tile next to the side's barracks: the tile above the
    /// footprint for the human side, below it for the opponent, with a
    /// diagonal fallback one tile to the right.
    pub fn barracks_spawn(&self, side: Side) -> Option<Position> {
        let tl = self.building_top_left(side, BuildingKind::Barracks)?;
        let y = match side {
            Side::Human => tl.y - 1,
            Side::Opponent => tl.y + 2,
        };
        for candidate in [Position::new(tl.x, y), Position::new(tl.x + 1, y)] {
            if self.free_for_unit(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    pub fn can_move(&self, side: Side, from: Position, to: Position) -> Result<(), RuleError> {
        let source = self.map.get(from).ok_or(RuleError::OutOfBounds)?;
        let unit_id = source.unit.ok_or(RuleError::NoUnit)?;
        let unit = self.units.get(unit_id).ok_or(RuleError::NoUnit)?;
        if unit.owner != side {
            return Err(RuleError::NotYourUnit);
        }

        let dest = self.map.get(to).ok_or(RuleError::OutOfBounds)?;
        let distance = from.distance(to);
        if distance == 0 {
            return Err(RuleError::MustMove);
        }
        if distance > unit.stats().moves {
            return Err(RuleError::TooFar);
        }
        if !dest.free_for_unit() {
            return Err(RuleError::DestinationBlocked);
        }
        Ok(())
    }

    pub fn can_attack(&self, side: Side, from: Position, target: Position) -> Result<(), RuleError> {
        let source = self.map.get(from).ok_or(RuleError::OutOfBounds)?;
        let unit_id = source.unit.ok_or(RuleError::NoUnit)?;
        let attacker = self.units.get(unit_id).ok_or(RuleError::NoUnit)?;
        if attacker.owner != side {
            return Err(RuleError::NotYourUnit);
        }

        let tile = self.map.get(target).ok_or(RuleError::OutOfBounds)?;
        if !in_range(attacker, target) {
            return Err(RuleError::OutOfRange);
        }

        let enemy_unit = tile
            .unit
            .and_then(|id| self.units.get(id))
            .is_some_and(|u| u.owner != side);
        let enemy_building = tile
            .building
            .and_then(|id| self.buildings.get(id))
            .is_some_and(|b| b.owner != side);
        if enemy_unit || enemy_building {
            Ok(())
        } else {
            Err(RuleError::NoTarget)
        }
    }

    pub fn can_collect(&self, from: Position, target: Position) -> Result<(), RuleError> {
        let source = self.map.get(from).ok_or(RuleError::OutOfBounds)?;
        let unit_id = source.unit.ok_or(RuleError::NoUnit)?;
        let unit = self.units.get(unit_id).ok_or(RuleError::NoUnit)?;

        let tile = self.map.get(target).ok_or(RuleError::OutOfBounds)?;
        let distance = from.distance(target);
        if distance == 0 || distance > unit.stats().collect_reach {
            return Err(RuleError::OutOfRange);
        }
        if tile.terrain.harvest_yield().is_none() {
            return Err(RuleError::NothingToHarvest);
        }
        if tile.unit.is_some() || tile.building.is_some() {
            return Err(RuleError::HarvestBlocked);
        }
        Ok(())
    }

    /// All four footprint tiles must exist, be grass, and hold nothing.
    pub fn can_place_building(&self, top_left: Position) -> Result<(), RuleError> {
        for pos in footprint(top_left) {
            let tile = self.map.get(pos).ok_or(RuleError::BadFootprint)?;
            if tile.terrain != Terrain::Grass || tile.unit.is_some() || tile.building.is_some() {
                return Err(RuleError::BadFootprint);
            }
        }
        Ok(())
    }
}

/// The single authority over match state. Presentation submits one
/// [`Command`] per human turn through [`Engine::apply`]; the scripted
/// opponent's turn runs inside the same call.
#[derive(Clone, Debug)]
pub struct Engine {
    state: GameState,
}

impl Engine {
    /// Fresh match on the fixed 16x8 scenario board.
    pub fn new_match(seed: u64) -> Self {
        Self::new_match_with(&MapGenConfig::default(), seed)
    }

    pub fn new_match_with(config: &MapGenConfig, seed: u64) -> Self {
        let mut rng = GameRng::seed_from_u64(seed);
        let mut map = generate_map(config, &mut rng);
        clear_start_corners(&mut map);

        let mut engine = Self::from_parts(map, initial_stock(), initial_stock(), rng);

        let (w, h) = (
            engine.state.map.width() as i32,
            engine.state.map.height() as i32,
        );
        engine.place_building_at(BuildingKind::Castle, Side::Human, Position::new(w - 2, h - 2));
        engine.place_building_at(BuildingKind::Barracks, Side::Human, Position::new(w - 4, h - 2));
        engine.place_building_at(BuildingKind::Castle, Side::Opponent, Position::new(0, 0));
        engine.place_building_at(BuildingKind::Barracks, Side::Opponent, Position::new(2, 0));

        info!(seed, "match started");
        engine
    }

    /// Assemble an engine around an externally produced grid. This is the
    /// "initial grid" contract: callers may supply any map.
    pub fn from_parts(
        map: GameMap,
        human_stock: Stockpile,
        opponent_stock: Stockpile,
        rng: GameRng,
    ) -> Self {
        Self {
            state: GameState {
                map,
                units: EntityStore::default(),
                buildings: EntityStore::default(),
                turn: TurnState::default(),
                rng,
                human: Player::new("You", Side::Human, human_stock),
                opponent: Player::new("Enemy", Side::Opponent, opponent_stock),
                winner: None,
            },
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply one human action. On success the whole end-of-turn sequence
    /// runs (human income, opponent action, opponent income, win/lose
    /// check) and control returns to the human side. A rejected action
    /// mutates nothing and does not consume the turn.
    pub fn apply(&mut self, command: Command) -> Result<Vec<Event>, RuleError> {
        if self.state.winner.is_some() {
            return Err(RuleError::MatchOver);
        }
        if !self.state.turn.human_turn {
            return Err(RuleError::NotYourTurn);
        }

        let mut events = Vec::new();
        self.commit(Side::Human, &command, &mut events)?;
        debug!(?command, "human action applied");
        self.end_of_turn(&mut events);
        Ok(events)
    }

    fn end_of_turn(&mut self, events: &mut Vec<Event>) {
        // Attacks may already have decided the match.
        if self.state.winner.is_some() {
            return;
        }

        self.grant_income(Side::Human, events);
        let turn = self.state.turn.number;
        events.push(Event::TurnEnded {
            turn,
            side: Side::Human,
        });
        self.state.turn.advance();
        events.push(Event::TurnStarted {
            turn,
            side: Side::Opponent,
        });

        let mut rng = self.state.rng;
        let decision = ai::decide(&self.state, &mut rng, Side::Opponent);
        self.state.rng = rng;
        match decision {
            Some(command) => {
                debug!(?command, "opponent action");
                if let Err(err) = self.commit(Side::Opponent, &command, events) {
                    // decide() only proposes commands that pass the queries,
                    // so a rejection here is a bug worth surfacing.
                    warn!(%err, "opponent decision rejected");
                }
            }
            None => debug!("opponent passes"),
        }

        self.grant_income(Side::Opponent, events);
        self.check_defeat(events);
        events.push(Event::TurnEnded {
            turn,
            side: Side::Opponent,
        });
        self.state.turn.advance();
        if self.state.winner.is_none() {
            events.push(Event::TurnStarted {
                turn: self.state.turn.number,
                side: Side::Human,
            });
        }
    }

    pub(crate) fn commit(
        &mut self,
        side: Side,
        command: &Command,
        events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        match *command {
            Command::Move { from, to } => self.commit_move(side, from, to, events),
            Command::Attack { from, target } => self.commit_attack(side, from, target, events),
            Command::Collect { from, target } => self.commit_collect(side, from, target, events),
            Command::Train { kind } => self.commit_train(side, kind, events),
            Command::PlaceBuilding { kind, top_left } => {
                self.commit_place(side, kind, top_left, events)
            }
        }
    }

    fn commit_move(
        &mut self,
        side: Side,
        from: Position,
        to: Position,
        events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        self.state.can_move(side, from, to)?;
        let unit_id = self.state.unit_at(from).ok_or(RuleError::NoUnit)?;
        self.relocate_unit(unit_id, from, to);
        events.push(Event::UnitMoved {
            unit: unit_id,
            from,
            to,
        });
        Ok(())
    }

    fn commit_attack(
        &mut self,
        side: Side,
        from: Position,
        target: Position,
        events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        self.state.can_attack(side, from, target)?;
        let attacker_id = self.state.unit_at(from).ok_or(RuleError::NoUnit)?;
        let damage = {
            let attacker = self.state.units.get(attacker_id).ok_or(RuleError::NoUnit)?;
            attack_damage(attacker)
        };

        let tile = self.state.map.get(target).ok_or(RuleError::OutOfBounds)?;
        if let Some(defender_id) = tile.unit {
            let defender = self
                .state
                .units
                .get_mut(defender_id)
                .ok_or(RuleError::NoTarget)?;
            defender.take_damage(damage);
            let remaining = defender.hits;
            let dead = defender.is_dead();
            let owner = defender.owner;
            events.push(Event::UnitDamaged {
                unit: defender_id,
                damage,
                remaining,
            });
            if dead {
                self.state.units.remove(defender_id);
                self.state.player_mut(owner).units.retain(|id| *id != defender_id);
                if let Some(t) = self.state.map.get_mut(target) {
                    t.unit = None;
                }
                events.push(Event::UnitKilled {
                    unit: defender_id,
                    at: target,
                });
                // Capture by elimination: the attacker takes the tile.
                self.relocate_unit(attacker_id, from, target);
                events.push(Event::UnitMoved {
                    unit: attacker_id,
                    from,
                    to: target,
                });
            }
        } else if let Some(building_id) = tile.building {
            let building = self
                .state
                .buildings
                .get_mut(building_id)
                .ok_or(RuleError::NoTarget)?;
            building.take_damage(damage);
            let remaining = building.hits;
            let destroyed = building.is_destroyed();
            let owner = building.owner;
            let kind = building.kind;
            let top_left = building.top_left;
            events.push(Event::BuildingDamaged {
                building: building_id,
                damage,
                remaining,
            });
            if destroyed {
                self.state.buildings.remove(building_id);
                self.state
                    .player_mut(owner)
                    .buildings
                    .retain(|id| *id != building_id);
                if let Some(tl) = top_left {
                    for pos in footprint(tl) {
                        if let Some(t) = self.state.map.get_mut(pos) {
                            if t.building == Some(building_id) {
                                t.building = None;
                            }
                        }
                    }
                    events.push(Event::BuildingDestroyed {
                        building: building_id,
                        kind,
                        top_left: tl,
                    });
                }
                self.relocate_unit(attacker_id, from, target);
                events.push(Event::UnitMoved {
                    unit: attacker_id,
                    from,
                    to: target,
                });
            }
        } else {
            return Err(RuleError::NoTarget);
        }

        self.check_defeat(events);
        Ok(())
    }

    fn commit_collect(
        &mut self,
        side: Side,
        from: Position,
        target: Position,
        events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        self.state.can_collect(from, target)?;
        let unit_id = self.state.unit_at(from).ok_or(RuleError::NoUnit)?;
        let unit = self.state.units.get(unit_id).ok_or(RuleError::NoUnit)?;
        if unit.owner != side {
            return Err(RuleError::NotYourUnit);
        }

        let tile = self.state.map.get(target).ok_or(RuleError::OutOfBounds)?;
        let resource = tile
            .terrain
            .harvest_yield()
            .ok_or(RuleError::NothingToHarvest)?;

        self.state
            .player_mut(side)
            .stock
            .add(resource, HARVEST_AMOUNT);
        if let Some(t) = self.state.map.get_mut(target) {
            t.terrain = Terrain::Grass;
        }
        events.push(Event::Harvested {
            side,
            resource,
            amount: HARVEST_AMOUNT,
            at: target,
        });

        // The harvester steps onto the freshly cleared tile.
        self.relocate_unit(unit_id, from, target);
        events.push(Event::UnitMoved {
            unit: unit_id,
            from,
            to: target,
        });
        Ok(())
    }

    fn commit_train(
        &mut self,
        side: Side,
        kind: UnitKind,
        events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        let spawn = self
            .state
            .barracks_spawn(side)
            .ok_or(RuleError::NoSpawnSpace)?;
        // Spot first, then spend: a failed spawn must never cost anything.
        let cost = unit_stats(kind).cost;
        if !self.state.player_mut(side).stock.try_spend(&cost) {
            return Err(RuleError::NotEnoughResources);
        }
        let unit_id = self.spawn_unit(Unit::new(kind, side), spawn);
        events.push(Event::UnitTrained {
            unit: unit_id,
            kind,
            side,
            at: spawn,
        });
        Ok(())
    }

    fn commit_place(
        &mut self,
        side: Side,
        kind: BuildingKind,
        top_left: Position,
        events: &mut Vec<Event>,
    ) -> Result<(), RuleError> {
        self.state.can_place_building(top_left)?;
        let cost = building_stats(kind).cost;
        if !self.state.player_mut(side).stock.try_spend(&cost) {
            return Err(RuleError::NotEnoughResources);
        }

        // Construction goes through the queue; every current kind has zero
        // build time, so it completes within this commit.
        self.state
            .player_mut(side)
            .build_queue
            .enqueue(Building::new(kind, side));
        if let Some(done) = self.state.player_mut(side).build_queue.tick() {
            let building_id = self.register_building(done, top_left);
            events.push(Event::BuildingPlaced {
                building: building_id,
                kind,
                side,
                top_left,
            });
        }
        Ok(())
    }

    /// Per-turn grant: 10 food per farm, 10 gold per mine.
    pub(crate) fn grant_income(&mut self, side: Side, events: &mut Vec<Event>) {
        let farms = self.state.building_count(side, BuildingKind::Farm) as i32;
        let mines = self.state.building_count(side, BuildingKind::Mine) as i32;

        if farms > 0 {
            let amount = farms * INCOME_PER_BUILDING;
            self.state.player_mut(side).stock.add(Resource::Food, amount);
            events.push(Event::IncomeGranted {
                side,
                resource: Resource::Food,
                amount,
            });
        }
        if mines > 0 {
            let amount = mines * INCOME_PER_BUILDING;
            self.state.player_mut(side).stock.add(Resource::Gold, amount);
            events.push(Event::IncomeGranted {
                side,
                resource: Resource::Gold,
                amount,
            });
        }
    }

    fn check_defeat(&mut self, events: &mut Vec<Event>) {
        if self.state.winner.is_some() {
            return;
        }
        let winner = if !self.state.castle_standing(Side::Opponent) {
            Some(Side::Human)
        } else if !self.state.castle_standing(Side::Human) {
            Some(Side::Opponent)
        } else {
            None
        };
        if let Some(winner) = winner {
            self.state.winner = Some(winner);
            info!(?winner, "match decided");
            events.push(Event::MatchEnded { winner });
        }
    }

    /// Stamp a building onto the grid without placement checks. Scenario
    /// setup and snapshot restore trust their input, as the rule flow has
    /// already validated or previously produced it.
    pub fn place_building_at(
        &mut self,
        kind: BuildingKind,
        side: Side,
        top_left: Position,
    ) -> BuildingId {
        self.register_building(Building::new(kind, side), top_left)
    }

    fn register_building(&mut self, mut building: Building, top_left: Position) -> BuildingId {
        let side = building.owner;
        building.top_left = Some(top_left);
        let id = self.state.buildings.insert(building);
        self.state.player_mut(side).buildings.push(id);
        for pos in footprint(top_left) {
            if let Some(tile) = self.state.map.get_mut(pos) {
                tile.building = Some(id);
                tile.owner = Some(side);
            }
        }
        id
    }

    /// Put a fresh unit on a free tile. Returns `None` when the tile is not
    /// free for a unit.
    pub fn spawn_unit_at(&mut self, kind: UnitKind, side: Side, pos: Position) -> Option<UnitId> {
        if !self.state.free_for_unit(pos) {
            return None;
        }
        Some(self.spawn_unit(Unit::new(kind, side), pos))
    }

    fn spawn_unit(&mut self, mut unit: Unit, pos: Position) -> UnitId {
        let side = unit.owner;
        unit.position = Some(pos);
        let id = self.state.units.insert(unit);
        self.state.player_mut(side).units.push(id);
        if let Some(tile) = self.state.map.get_mut(pos) {
            tile.unit = Some(id);
        }
        id
    }

    fn relocate_unit(&mut self, unit_id: UnitId, from: Position, to: Position) {
        if let Some(tile) = self.state.map.get_mut(from) {
            if tile.unit == Some(unit_id) {
                tile.unit = None;
            }
        }
        if let Some(tile) = self.state.map.get_mut(to) {
            tile.unit = Some(unit_id);
        }
        if let Some(unit) = self.state.units.get_mut(unit_id) {
            unit.position = Some(to);
        }
    }

    /// Export the full persistable match state.
    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        let mut buildings = Vec::new();
        let mut units = Vec::new();

        for side in Side::BOTH {
            for id in &state.player(side).buildings {
                let Some(building) = state.buildings.get(*id) else {
                    continue;
                };
                let Some(tl) = building.top_left else {
                    continue;
                };
                buildings.push(BuildingRecord {
                    side,
                    kind: building.kind,
                    x: tl.x,
                    y: tl.y,
                    hits: building.hits,
                });
            }
            for id in &state.player(side).units {
                let Some(unit) = state.units.get(*id) else {
                    continue;
                };
                let Some(pos) = unit.position else {
                    continue;
                };
                units.push(UnitRecord {
                    side,
                    kind: unit.kind,
                    x: pos.x,
                    y: pos.y,
                    hits: unit.hits,
                });
            }
        }

        Snapshot {
            width: state.map.width(),
            height: state.map.height(),
            turn: state.turn.number,
            human_turn: state.turn.human_turn,
            human_resources: state.human.stock.amounts(),
            opponent_resources: state.opponent.stock.amounts(),
            terrain: state.map.terrain_row_major(),
            buildings,
            units,
        }
    }

    /// Rebuild a match from a snapshot. Buildings are stamped as recorded;
    /// a unit whose recorded tile is occupied or inaccessible is dropped
    /// rather than failing the whole load.
    pub fn from_snapshot(snapshot: &Snapshot, seed: u64) -> Result<Self, RuleError> {
        let map = GameMap::from_terrain(snapshot.width, snapshot.height, snapshot.terrain.clone())
            .ok_or(RuleError::MalformedSnapshot)?;

        let mut engine = Self::from_parts(
            map,
            Stockpile::from_amounts(snapshot.human_resources),
            Stockpile::from_amounts(snapshot.opponent_resources),
            GameRng::seed_from_u64(seed),
        );
        engine.state.turn = TurnState::restore(snapshot.turn, snapshot.human_turn);

        for record in &snapshot.buildings {
            let id = engine.place_building_at(
                record.kind,
                record.side,
                Position::new(record.x, record.y),
            );
            if let Some(building) = engine.state.buildings.get_mut(id) {
                building.hits = record.hits.max(0);
            }
        }

        for record in &snapshot.units {
            let pos = Position::new(record.x, record.y);
            if let Some(id) = engine.spawn_unit_at(record.kind, record.side, pos) {
                if let Some(unit) = engine.state.units.get_mut(id) {
                    unit.hits = record.hits.max(0);
                }
            }
        }

        Ok(engine)
    }
}

#[cfg(test)]
impl Engine {
    pub(crate) fn state_mut_for_tests(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub(crate) fn stock_mut_for_tests(&mut self, side: Side) -> &mut Stockpile {
        &mut self.state.player_mut(side).stock
    }
}
