mod command;
mod event;
mod grid;
mod ids;
mod snapshot;
mod types;
pub mod wire;

pub use crate::command::*;
pub use crate::event::*;
pub use crate::grid::*;
pub use crate::ids::*;
pub use crate::snapshot::*;
pub use crate::types::*;
pub use crate::wire::{read_snapshot, write_snapshot, WireError};
