use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::state::{Position, Snake};

/// Number of direction intents the snake will buffer between ticks
pub const MOVE_QUEUE_CAPACITY: usize = 5;

/// Configuration for the snake grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Cell the head starts on; the body trails to the left
    pub start: (i32, i32),
    /// Maximum queued direction intents
    pub move_queue_capacity: usize,
    /// Random draws tried before fruit placement scans for free cells
    pub max_fruit_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 15,
            initial_snake_length: 3,
            start: (10, 8),
            move_queue_capacity: MOVE_QUEUE_CAPACITY,
            max_fruit_attempts: 64,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            start: (5, 5),
            ..Self::new(10, 10)
        }
    }

    /// Head position at the start of a round
    pub fn start_position(&self) -> Position {
        Position::new(self.start.0, self.start.1)
    }

    /// Snake every round begins with, heading right
    pub fn starting_snake(&self) -> Snake {
        Snake::new(self.start_position(), Direction::Right, self.initial_snake_length)
    }

    /// Reject settings that would start a round already lost
    pub fn validate(&self) -> Result<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            bail!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width,
                self.grid_height
            );
        }
        if self.move_queue_capacity == 0 {
            bail!("move_queue_capacity must be at least 1");
        }

        let in_bounds = |pos: &Position| {
            pos.x >= 0
                && pos.y >= 0
                && (pos.x as usize) < self.grid_width
                && (pos.y as usize) < self.grid_height
        };
        if let Some(cell) = self.starting_snake().body.iter().find(|pos| !in_bounds(*pos)) {
            bail!(
                "starting snake cell ({}, {}) lies outside the {}x{} grid",
                cell.x,
                cell.y,
                self.grid_width,
                self.grid_height
            );
        }
        Ok(())
    }
}
