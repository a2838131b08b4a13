use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use super::record::{MemberRecord, MemberRow, TIMESTAMP_FORMAT};

/// Header row of the backing file
pub const CSV_HEADER: [&str; 5] = ["Email", "First Name", "Last Name", "Best Score", "Last Played"];

/// Failure reading or writing the member file
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access member file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed member file {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// In-memory member set mirrored to a CSV file
///
/// Records are kept in insertion order. Every mutation rewrites the whole
/// file through a temporary sibling that is renamed into place, so a crash
/// mid-write leaves the previous file intact.
#[derive(Debug)]
pub struct MemberStore {
    path: PathBuf,
    domain: String,
    members: Vec<MemberRecord>,
}

impl MemberStore {
    /// Open the store at `path`, creating a header-only file if none exists
    pub fn open(path: impl Into<PathBuf>, domain: impl Into<String>) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.into(),
            domain: domain.into(),
            members: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Replace the in-memory set with the file's contents
    pub fn load(&mut self) -> Result<(), StoreError> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
            }
            fs::File::create(&self.path).map_err(|source| self.io_error(source))?;
            self.members.clear();
            self.save()?;
            info!(path = %self.path.display(), "created empty member file");
            return Ok(());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(|source| self.csv_error(source))?;
        let mut members: Vec<MemberRecord> = Vec::new();

        for row in reader.deserialize::<MemberRow>() {
            let record = MemberRecord::from(row.map_err(|source| self.csv_error(source))?);
            // Later rows win, the first occurrence keeps its slot
            match members.iter_mut().find(|m| m.email == record.email) {
                Some(existing) => *existing = record,
                None => members.push(record),
            }
        }

        info!(path = %self.path.display(), members = members.len(), "loaded member file");
        self.members = members;
        Ok(())
    }

    /// Register or refresh a member, stamped with the current local time
    ///
    /// Returns the display name built from the given first and last name.
    pub fn upsert(
        &mut self,
        email_local_part: &str,
        first_name: &str,
        last_name: &str,
        score: u32,
    ) -> Result<String, StoreError> {
        let now = Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.upsert_at(email_local_part, first_name, last_name, score, &now)
    }

    /// [`upsert`](Self::upsert) with an explicit last-played stamp
    pub fn upsert_at(
        &mut self,
        email_local_part: &str,
        first_name: &str,
        last_name: &str,
        score: u32,
        played_at: &str,
    ) -> Result<String, StoreError> {
        let email = self.email_for(email_local_part);

        match self.members.iter_mut().find(|m| m.email == email) {
            Some(existing) => {
                existing.best_score = existing.best_score.max(score);
                existing.last_played = played_at.to_string();
                info!(%email, best_score = existing.best_score, "member updated");
            }
            None => {
                self.members.push(MemberRecord {
                    email: email.clone(),
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    best_score: score,
                    last_played: played_at.to_string(),
                });
                info!(%email, best_score = score, "member registered");
            }
        }

        self.save()?;
        Ok(format!("{} {}", first_name, last_name))
    }

    pub fn lookup(&self, email_local_part: &str) -> Option<&MemberRecord> {
        let email = self.email_for(email_local_part);
        self.members.iter().find(|m| m.email == email)
    }

    /// Top `limit` members by best score; equal scores keep insertion order
    pub fn leaderboard(&self, limit: usize) -> Vec<&MemberRecord> {
        let mut ranked: Vec<&MemberRecord> = self.members.iter().collect();
        ranked.sort_by(|a, b| b.best_score.cmp(&a.best_score));
        ranked.truncate(limit);
        ranked
    }

    /// Highest best score on record, 0 for an empty store
    pub fn top_score(&self) -> u32 {
        self.members.iter().map(|m| m.best_score).max().unwrap_or(0)
    }

    pub fn email_for(&self, email_local_part: &str) -> String {
        format!("{}@{}", email_local_part, self.domain)
    }

    pub fn members(&self) -> &[MemberRecord] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut staging = NamedTempFile::new_in(&dir).map_err(|source| self.io_error(source))?;
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(staging.as_file_mut());
            writer
                .write_record(CSV_HEADER)
                .map_err(|source| self.csv_error(source))?;
            for record in &self.members {
                writer
                    .serialize(MemberRow::from(record))
                    .map_err(|source| self.csv_error(source))?;
            }
            writer.flush().map_err(|source| self.io_error(source))?;
        }

        if let Ok(existing) = fs::metadata(&self.path) {
            staging
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|source| self.io_error(source))?;
        }

        staging
            .persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        debug!(path = %self.path.display(), members = self.members.len(), "member file saved");
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOMAIN: &str = "southridge.ca";

    fn open_in(dir: &TempDir) -> MemberStore {
        MemberStore::open(dir.path().join("member_info.csv"), DOMAIN).unwrap()
    }

    #[test]
    fn test_missing_file_is_created_with_header() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);

        assert!(store.is_empty());
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents.lines().next(),
            Some("Email,First Name,Last Name,Best Score,Last Played")
        );
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_missing_parent_directory_is_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kiosk").join("member_info.csv");
        let store = MemberStore::open(&path, DOMAIN).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_register_then_lookup() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);

        let name = store.upsert("alice", "Alice", "Smith", 0).unwrap();
        assert_eq!(name, "Alice Smith");

        let record = store.lookup("alice").unwrap();
        assert_eq!(record.email, "alice@southridge.ca");
        assert_eq!(record.best_score, 0);
        assert!(store.lookup("bob").is_none());
    }

    #[test]
    fn test_best_score_never_decreases() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);

        store.upsert("alice", "Alice", "Smith", 5).unwrap();
        store.upsert("alice", "Alice", "Smith", 5).unwrap();
        assert_eq!(store.lookup("alice").unwrap().best_score, 5);

        store.upsert("alice", "Alice", "Smith", 3).unwrap();
        assert_eq!(store.lookup("alice").unwrap().best_score, 5);

        store.upsert("alice", "Alice", "Smith", 9).unwrap();
        assert_eq!(store.lookup("alice").unwrap().best_score, 9);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_refreshes_timestamp_but_keeps_names() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);

        store
            .upsert_at("alice", "Alice", "Smith", 2, "2025-05-01 09:00")
            .unwrap();
        let name = store
            .upsert_at("alice", "Ally", "Smythe", 0, "2025-05-02 14:30")
            .unwrap();

        assert_eq!(name, "Ally Smythe");
        let record = store.lookup("alice").unwrap();
        assert_eq!(record.display_name(), "Alice Smith");
        assert_eq!(record.last_played, "2025-05-02 14:30");
        assert_eq!(record.best_score, 2);
    }

    #[test]
    fn test_saved_members_survive_reload_in_order() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        store.upsert_at("zed", "Zed", "Zulu", 4, "2025-05-01 09:00").unwrap();
        store.upsert_at("amy", "Amy", "Adams", 7, "2025-05-01 09:05").unwrap();

        let reloaded = open_in(&dir);
        let emails: Vec<&str> = reloaded.members().iter().map(|m| m.email.as_str()).collect();
        assert_eq!(emails, vec!["zed@southridge.ca", "amy@southridge.ca"]);
        assert_eq!(reloaded.lookup("amy").unwrap().best_score, 7);
        assert_eq!(reloaded.lookup("zed").unwrap().last_played, "2025-05-01 09:00");
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.upsert("alice", "Alice", "Smith", 3).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_load_tolerates_blank_scores_and_duplicate_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("member_info.csv");
        fs::write(
            &path,
            "Email,First Name,Last Name,Best Score,Last Played\r\n\
             bob@southridge.ca,Bob,Jones,,2025-05-01 10:00\r\n\
             cat@southridge.ca,Cat,Lee,3,2025-05-01 10:05\r\n\
             bob@southridge.ca,Bob,Jones,6,2025-05-01 11:00\r\n",
        )
        .unwrap();

        let store = MemberStore::open(&path, DOMAIN).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.members()[0].email, "bob@southridge.ca");
        assert_eq!(store.members()[0].best_score, 6);
        assert_eq!(store.lookup("cat").unwrap().best_score, 3);
    }

    #[test]
    fn test_load_reports_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("member_info.csv");
        fs::write(&path, "Email,First Name\nbob@southridge.ca,Bob,Jones,4,x\n").unwrap();

        let err = MemberStore::open(&path, DOMAIN).unwrap_err();
        assert!(matches!(err, StoreError::Csv { .. }));
    }

    #[test]
    fn test_leaderboard_orders_by_score() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        store.upsert("ten", "Ten", "Points", 10).unwrap();
        store.upsert("thirty", "Thirty", "Points", 30).unwrap();
        store.upsert("twenty", "Twenty", "Points", 20).unwrap();

        let top = store.leaderboard(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].best_score, 30);
        assert_eq!(top[1].best_score, 20);
        assert_eq!(store.top_score(), 30);
    }

    #[test]
    fn test_leaderboard_ties_keep_insertion_order() {
        let dir = TempDir::new().unwrap();
        let mut store = open_in(&dir);
        store.upsert("first", "First", "In", 8).unwrap();
        store.upsert("low", "Low", "Score", 1).unwrap();
        store.upsert("second", "Second", "In", 8).unwrap();

        let names: Vec<String> = store
            .leaderboard(10)
            .iter()
            .map(|m| m.display_name())
            .collect();
        assert_eq!(names, vec!["First In", "Second In", "Low Score"]);
    }

    #[test]
    fn test_empty_store_has_empty_leaderboard() {
        let dir = TempDir::new().unwrap();
        let store = open_in(&dir);
        assert!(store.leaderboard(10).is_empty());
        assert_eq!(store.top_score(), 0);
    }
}
