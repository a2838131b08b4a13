//! Screen flow: registration, the snake round and the leaderboard

pub mod controller;
pub mod form;
pub mod layout;

pub use controller::{Screen, ScreenController, Session};
pub use form::{Field, RegistrationForm, TextField};
pub use layout::{Button, RegistrationLayout};
