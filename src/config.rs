use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::game::GameConfig;

/// Everything the kiosk needs to know up front
///
/// Built once at startup and handed to the screen controller; nothing else
/// in the crate holds process-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpoConfig {
    /// Snake grid settings
    pub game: GameConfig,
    /// CSV file holding member records
    pub members_path: PathBuf,
    /// Domain appended to every entered email local part
    pub email_domain: String,
    /// Fixed frame period; one simulation tick per frame
    pub frame_interval_ms: u64,
    /// Rows shown on the leaderboard screen
    pub leaderboard_limit: usize,
    /// Maximum characters accepted by a registration field
    pub max_field_len: usize,
    pub title: String,
    pub subtitle: String,
}

impl Default for ExpoConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            members_path: PathBuf::from("member_info.csv"),
            email_domain: "southridge.ca".to_string(),
            frame_interval_ms: 100,
            leaderboard_limit: 10,
            max_field_len: 20,
            title: "Southridge Coding Club".to_string(),
            subtitle: "Snake Game Challenge".to_string(),
        }
    }
}

impl ExpoConfig {
    /// Read a JSON config file; absent keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse config {:?}", path))
    }

    /// Checked once after every override is applied, before any file is touched
    pub fn validate(&self) -> Result<()> {
        self.game.validate().context("Invalid game settings")
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }
}
