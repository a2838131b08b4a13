use serde::{Deserialize, Serialize};

/// Format of the advisory last-played column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One registered visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Full address, `localpart@domain`
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub best_score: u32,
    pub last_played: String,
}

impl MemberRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Row layout of the backing file
///
/// Kept apart from [`MemberRecord`] so that loose cells (an empty score, a
/// missing timestamp column) are absorbed here instead of leaking into the
/// record type.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MemberRow {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(
        rename = "Best Score",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub best_score: Option<u32>,
    #[serde(rename = "Last Played", default)]
    pub last_played: String,
}

impl From<MemberRow> for MemberRecord {
    fn from(row: MemberRow) -> Self {
        Self {
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            best_score: row.best_score.unwrap_or(0),
            last_played: row.last_played,
        }
    }
}

impl From<&MemberRecord> for MemberRow {
    fn from(record: &MemberRecord) -> Self {
        Self {
            email: record.email.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            best_score: Some(record.best_score),
            last_played: record.last_played.clone(),
        }
    }
}
