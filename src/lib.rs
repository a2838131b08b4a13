//! Expo Snake - a kiosk snake game with visitor registration and a leaderboard
//!
//! This library provides:
//! - The snake simulation (game module)
//! - CSV-backed member records and leaderboard (members module)
//! - The registration / game / leaderboard screen flow (screen module)
//! - Terminal input mapping and rendering (input, render modules)
//! - The fixed-rate kiosk loop (modes module)

pub mod config;
pub mod game;
pub mod input;
pub mod members;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod screen;

pub use config::ExpoConfig;
