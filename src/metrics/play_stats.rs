use std::time::{Duration, Instant};

/// Kiosk-wide play statistics shown in the game HUD
///
/// Unlike member best scores these live only as long as the process.
pub struct PlayStats {
    pub round_started: Instant,
    pub round_elapsed: Duration,
    pub games_played: u32,
    pub kiosk_high_score: u32,
    round_running: bool,
}

impl PlayStats {
    pub fn new() -> Self {
        Self {
            round_started: Instant::now(),
            round_elapsed: Duration::ZERO,
            games_played: 0,
            kiosk_high_score: 0,
            round_running: false,
        }
    }

    /// Refresh the round clock; frozen once the round has ended
    pub fn update(&mut self) {
        if self.round_running {
            self.round_elapsed = self.round_started.elapsed();
        }
    }

    pub fn on_round_start(&mut self) {
        self.round_started = Instant::now();
        self.round_elapsed = Duration::ZERO;
        self.round_running = true;
    }

    pub fn on_round_over(&mut self, final_score: u32) {
        self.update();
        self.round_running = false;
        self.games_played += 1;
        self.kiosk_high_score = self.kiosk_high_score.max(final_score);
    }

    pub fn format_round_time(&self) -> String {
        let total_secs = self.round_elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for PlayStats {
    fn default() -> Self {
        Self::new()
    }
}
