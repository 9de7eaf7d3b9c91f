use holdfast_protocol::{BuildingKind, Command, Position, Side, UnitKind};
use tracing::{info, warn};

use crate::engine::{Engine, GameState};
use crate::save::SaveFile;

/// Callbacks into the presentation layer. The session never renders or
/// reads input itself; it tells the presenter what happened.
pub trait Presenter {
    fn render(&mut self, state: &GameState);
    fn notify(&mut self, message: &str);
    fn show_main_menu(&mut self) {}
    fn show_match(&mut self) {}
    fn show_victory(&mut self) {}
    fn show_defeat(&mut self) {}
}

/// How many of each kind one side may build over a match.
pub fn build_cap(kind: BuildingKind) -> usize {
    match kind {
        BuildingKind::Castle => 0,
        BuildingKind::Barracks => 2,
        BuildingKind::Farm => 1,
        BuildingKind::Mine => 1,
    }
}

/// The command surface the presentation layer drives. Every human action
/// funnels into [`Engine::apply`]; rejected actions surface as notices and
/// never consume the turn.
pub struct Session<P: Presenter> {
    presenter: P,
    save: SaveFile,
    engine: Option<Engine>,
    pending_build: Option<BuildingKind>,
}

impl<P: Presenter> Session<P> {
    pub fn new(presenter: P, save: SaveFile) -> Self {
        Self {
            presenter,
            save,
            engine: None,
            pending_build: None,
        }
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn start_new_match(&mut self, seed: u64) {
        self.pending_build = None;
        let engine = Engine::new_match(seed);
        self.presenter.show_match();
        self.presenter.render(engine.state());
        self.engine = Some(engine);
    }

    /// Restore the last save, falling back to a fresh match with a notice
    /// when the file is missing or corrupt.
    pub fn load_last_save(&mut self, fallback_seed: u64) {
        self.pending_build = None;
        let engine = match self.save.load() {
            Ok(snapshot) => match Engine::from_snapshot(&snapshot, fallback_seed) {
                Ok(engine) => engine,
                Err(err) => {
                    warn!(%err, "save did not restore");
                    self.presenter.notify("The save could not be restored; starting fresh.");
                    Engine::new_match(fallback_seed)
                }
            },
            Err(err) => {
                warn!(%err, "save did not load");
                self.presenter.notify("No usable save found; starting fresh.");
                Engine::new_match(fallback_seed)
            }
        };
        self.presenter.show_match();
        self.presenter.render(engine.state());
        self.engine = Some(engine);
    }

    pub fn save_now(&mut self) {
        let Some(engine) = &self.engine else {
            self.presenter.notify("No match to save.");
            return;
        };
        match self.save.store(&engine.snapshot()) {
            Ok(()) => self.presenter.notify("Match saved."),
            Err(err) => {
                warn!(%err, "save failed");
                self.presenter.notify("Saving failed.");
            }
        }
    }

    pub fn return_to_menu(&mut self) {
        self.engine = None;
        self.pending_build = None;
        self.presenter.show_main_menu();
    }

    pub fn move_unit(&mut self, from: Position, to: Position) {
        self.submit(Command::Move { from, to });
    }

    pub fn can_attack(&self, from: Position, target: Position) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|e| e.state().can_attack(Side::Human, from, target).is_ok())
    }

    pub fn attack(&mut self, from: Position, target: Position) {
        self.submit(Command::Attack { from, target });
    }

    pub fn can_collect(&self, from: Position, target: Position) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|e| e.state().can_collect(from, target).is_ok())
    }

    pub fn collect(&mut self, from: Position, target: Position) {
        self.submit(Command::Collect { from, target });
    }

    pub fn train(&mut self, kind: UnitKind) {
        self.submit(Command::Train { kind });
    }

    /// Select a kind to place. Rejected outright when the side already owns
    /// its full allowance of that kind.
    pub fn begin_build(&mut self, kind: BuildingKind) {
        let Some(engine) = &self.engine else {
            self.presenter.notify("No match in progress.");
            return;
        };
        let owned = engine.state().building_count(Side::Human, kind);
        if owned >= build_cap(kind) {
            self.pending_build = None;
            self.presenter.notify("You cannot build more of those.");
            return;
        }
        self.pending_build = Some(kind);
    }

    /// Commit the pending build at `top_left`. Any rejection cancels the
    /// pending selection without consuming the turn.
    pub fn place_pending_building(&mut self, top_left: Position) {
        let Some(kind) = self.pending_build.take() else {
            self.presenter.notify("Pick a building first.");
            return;
        };
        self.submit(Command::PlaceBuilding { kind, top_left });
    }

    pub fn pending_build(&self) -> Option<BuildingKind> {
        self.pending_build
    }

    fn submit(&mut self, command: Command) {
        let Some(engine) = &mut self.engine else {
            self.presenter.notify("No match in progress.");
            return;
        };
        match engine.apply(command) {
            Ok(_events) => {
                self.presenter.render(engine.state());
                match engine.state().winner() {
                    Some(Side::Human) => {
                        info!("match won");
                        self.presenter.show_victory();
                    }
                    Some(Side::Opponent) => {
                        info!("match lost");
                        self.presenter.show_defeat();
                    }
                    None => {}
                }
            }
            Err(err) => self.presenter.notify(&err.to_string()),
        }
    }
}
