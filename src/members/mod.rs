//! Member records and the CSV-backed store behind registration and the leaderboard

pub mod record;
pub mod store;

pub use record::MemberRecord;
pub use store::{MemberStore, StoreError, CSV_HEADER};
