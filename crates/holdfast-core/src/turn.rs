use holdfast_protocol::Side;
use serde::{Deserialize, Serialize};

/// Turn counter plus whose turn it is. The counter starts at 1 and bumps
/// each time control comes back to the human side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub number: u32,
    pub human_turn: bool,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            number: 1,
            human_turn: true,
        }
    }
}

impl TurnState {
    pub fn active_side(&self) -> Side {
        if self.human_turn {
            Side::Human
        } else {
            Side::Opponent
        }
    }

    pub fn advance(&mut self) {
        self.human_turn = !self.human_turn;
        if self.human_turn {
            self.number += 1;
        }
    }

    /// Replay `advance` calls until the given counter/side is reached.
    pub fn restore(number: u32, human_turn: bool) -> Self {
        let mut state = Self::default();
        while state.number < number {
            state.advance();
        }
        if state.human_turn != human_turn {
            state.advance();
        }
        state
    }
}
