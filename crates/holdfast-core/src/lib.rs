pub mod ai;
mod building;
mod combat;
mod economy;
mod engine;
mod entities;
mod map;
pub mod mapgen;
mod player;
mod rng;
mod save;
mod session;
mod turn;
mod unit;

pub use crate::building::*;
pub use crate::combat::*;
pub use crate::economy::*;
pub use crate::engine::*;
pub use crate::entities::*;
pub use crate::map::*;
pub use crate::mapgen::{generate_map, generate_bordered_map, MapGenConfig};
pub use crate::player::*;
pub use crate::rng::*;
pub use crate::save::*;
pub use crate::session::*;
pub use crate::turn::*;
pub use crate::unit::*;
