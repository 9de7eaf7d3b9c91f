use holdfast_core::{ai, initial_stock, Engine, GameMap, GameRng, SaveFile, Stockpile};
use holdfast_protocol::{
    BuildingKind, Command, Event, Position, Resource, ResourceAmounts, Side, Terrain, UnitKind,
};

fn rich() -> Stockpile {
    Stockpile::from_amounts(ResourceAmounts {
        gold: 500,
        wood: 500,
        stone: 500,
        food: 500,
    })
}

/// All-grass 16x8 board with starting buildings and a wealthy human side.
fn scenario(human_stock: Stockpile) -> Engine {
    let mut engine = Engine::from_parts(
        GameMap::new(16, 8, Terrain::Grass),
        human_stock,
        initial_stock(),
        GameRng::seed_from_u64(0),
    );
    engine.place_building_at(BuildingKind::Castle, Side::Human, Position::new(14, 6));
    engine.place_building_at(BuildingKind::Barracks, Side::Human, Position::new(12, 6));
    engine.place_building_at(BuildingKind::Castle, Side::Opponent, Position::new(0, 0));
    engine.place_building_at(BuildingKind::Barracks, Side::Opponent, Position::new(2, 0));
    engine
}

#[test]
fn placing_a_farm_runs_the_whole_turn_cycle() {
    let mut engine = scenario(rich());
    let top_left = Position::new(7, 4);
    let wood_before = engine.state().player(Side::Human).stock.get(Resource::Wood);

    let events = engine
        .apply(Command::PlaceBuilding {
            kind: BuildingKind::Farm,
            top_left,
        })
        .expect("placement is legal and affordable");

    // Farm registered and all four tiles stamped.
    assert_eq!(engine.state().building_count(Side::Human, BuildingKind::Farm), 1);
    let id = engine.state().map.get(top_left).unwrap().building.unwrap();
    for pos in [
        top_left,
        Position::new(8, 4),
        Position::new(7, 5),
        Position::new(8, 5),
    ] {
        let tile = engine.state().map.get(pos).unwrap();
        assert_eq!(tile.building, Some(id));
        assert_eq!(tile.owner, Some(Side::Human));
    }
    assert_eq!(
        engine.state().player(Side::Human).stock.get(Resource::Wood),
        wood_before - 80
    );

    // The fresh farm already pays out in this turn's income phase.
    assert!(events.iter().any(|e| matches!(
        e,
        Event::IncomeGranted {
            side: Side::Human,
            resource: Resource::Food,
            amount: 10,
        }
    )));
    // The opponent side got its turn and control came back.
    assert!(events.iter().any(|e| matches!(
        e,
        Event::TurnStarted {
            side: Side::Opponent,
            ..
        }
    )));
    assert!(engine.state().turn.human_turn);
    assert_eq!(engine.state().turn.number, 2);
}

#[test]
fn destroying_the_castle_wins_and_locks_the_match() {
    let mut engine = scenario(rich());
    let from = Position::new(0, 2);
    engine
        .spawn_unit_at(UnitKind::Cavalry, Side::Human, from)
        .expect("tile is free");

    let events = engine
        .apply(Command::Attack {
            from,
            target: Position::new(0, 1),
        })
        .expect("castle is adjacent");

    assert_eq!(engine.state().winner(), Some(Side::Human));
    assert!(events.iter().any(|e| matches!(
        e,
        Event::MatchEnded {
            winner: Side::Human
        }
    )));
    assert!(engine
        .apply(Command::Train {
            kind: UnitKind::Soldier
        })
        .is_err());
}

#[test]
fn save_file_round_trips_a_midgame_position() {
    let dir = tempfile::tempdir().unwrap();
    let save = SaveFile::new(dir.path().join("match.sav"));

    let mut engine = Engine::new_match(17);
    for _ in 0..3 {
        let mut rng = GameRng::seed_from_u64(99);
        let Some(command) = ai::decide(engine.state(), &mut rng, Side::Human) else {
            break;
        };
        engine.apply(command).expect("scripted action is legal");
    }

    let snapshot = engine.snapshot();
    save.store(&snapshot).unwrap();
    let restored = Engine::from_snapshot(&save.load().unwrap(), 17).unwrap();
    assert_eq!(restored.snapshot(), snapshot);
}

#[test]
fn scripted_sides_play_many_turns_without_illegal_actions() {
    let mut engine = Engine::new_match(3);
    let mut rng = GameRng::seed_from_u64(4);

    for _ in 0..40 {
        if engine.state().winner().is_some() {
            break;
        }
        let Some(command) = ai::decide(engine.state(), &mut rng, Side::Human) else {
            break;
        };
        engine.apply(command).expect("scripted action is legal");

        for side in Side::BOTH {
            let amounts = engine.state().player(side).stock.amounts();
            for resource in Resource::ALL {
                assert!(amounts.get(resource) >= 0);
            }
        }
    }
    assert!(engine.state().turn.number > 1);
}
