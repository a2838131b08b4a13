use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use expo_snake::config::ExpoConfig;
use expo_snake::game::GameEngine;
use expo_snake::members::MemberStore;
use expo_snake::modes::KioskMode;
use expo_snake::screen::ScreenController;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "expo_snake")]
#[command(version, about = "Snake kiosk with visitor registration and leaderboard")]
struct Cli {
    /// JSON file with kiosk settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Member CSV file
    #[arg(long)]
    members: Option<PathBuf>,

    /// Grid width in cells
    #[arg(long)]
    width: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    height: Option<usize>,

    /// Frame period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for fruit placement
    #[arg(long)]
    seed: Option<u64>,

    /// Log file; the terminal itself is taken by the UI
    #[arg(long, default_value = "expo_snake.log")]
    log_file: PathBuf,
}

impl Cli {
    fn expo_config(&self) -> Result<ExpoConfig> {
        let mut config = match &self.config {
            Some(path) => ExpoConfig::from_json_file(path)?,
            None => ExpoConfig::default(),
        };

        if let Some(members) = &self.members {
            config.members_path = members.clone();
        }
        if let Some(width) = self.width {
            config.game.grid_width = width;
        }
        if let Some(height) = self.height {
            config.game.grid_height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.frame_interval_ms = tick_ms;
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let config = cli.expo_config()?;
    let store = MemberStore::open(&config.members_path, &config.email_domain)
        .with_context(|| format!("Failed to open member file {:?}", config.members_path))?;

    let engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(config.game.clone(), seed),
        None => GameEngine::new(config.game.clone()),
    };
    let controller = ScreenController::with_engine(config, store, engine);

    let mut kiosk = KioskMode::with_controller(controller);
    kiosk.run().await?;

    Ok(())
}
