pub mod play_stats;

pub use play_stats::PlayStats;
