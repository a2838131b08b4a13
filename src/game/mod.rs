//! Snake simulation
//!
//! Grid state, the bounded move queue and per-tick movement/collision logic.
//! Nothing here touches the terminal or the member store.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

pub use config::{GameConfig, MOVE_QUEUE_CAPACITY};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome};
pub use state::{CollisionType, GameState, Position, Snake};
