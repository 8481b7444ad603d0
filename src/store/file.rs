use super::{Collections, EventReset, Repository};
use crate::error::{FestError, Result};
use crate::types::model::{
    Event, EventResult, LeaderboardSummary, Participant, RankRecord, Roster, Score,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Repository backed by a single JSON document on disk.
///
/// Each write is applied to a copy of the collections, written to a sibling
/// temp file and renamed over the store. In-memory state only advances after
/// the rename succeeds.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    collections: Collections,
}

impl FileStore {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FestError::StoreNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        let collections: Collections = serde_json::from_str(&content)?;
        debug!(
            path = %path.display(),
            events = collections.events.len(),
            scores = collections.scores.len(),
            "opened store"
        );
        Ok(Self {
            path: path.to_path_buf(),
            collections,
        })
    }

    pub fn create(path: &Path, overwrite: bool) -> Result<Self> {
        if path.exists() && !overwrite {
            return Err(FestError::AlreadyExists(path.display().to_string()));
        }
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let collections = Collections::default();
        write_atomic(path, &collections)?;
        Ok(Self {
            path: path.to_path_buf(),
            collections,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit<T>(&mut self, change: impl FnOnce(&mut Collections) -> T) -> Result<T> {
        let mut next = self.collections.clone();
        let output = change(&mut next);
        write_atomic(&self.path, &next)?;
        self.collections = next;
        Ok(output)
    }
}

fn write_atomic(path: &Path, collections: &Collections) -> Result<()> {
    let json = serde_json::to_string_pretty(collections)?;
    let staging = staging_path(path);
    fs::write(&staging, json)
        .map_err(|e| FestError::Persistence(format!("{}: {}", staging.display(), e)))?;
    fs::rename(&staging, path)
        .map_err(|e| FestError::Persistence(format!("{}: {}", path.display(), e)))?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl Repository for FileStore {
    fn event(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.collections.event(id))
    }

    fn events(&self) -> Result<Vec<Event>> {
        Ok(self.collections.events.clone())
    }

    fn participants(&self) -> Result<Vec<Participant>> {
        Ok(self.collections.participants.clone())
    }

    fn sectors(&self) -> Result<Vec<String>> {
        Ok(self.collections.sectors.clone())
    }

    fn scores_for_event(&self, event_id: &str) -> Result<Vec<Score>> {
        Ok(self.collections.scores_for_event(event_id))
    }

    fn rank_records_for_event(&self, event_id: &str) -> Result<Vec<RankRecord>> {
        Ok(self.collections.rank_records_for_event(event_id))
    }

    fn all_rank_records(&self) -> Result<Vec<RankRecord>> {
        Ok(self.collections.rank_records.clone())
    }

    fn result(&self, event_id: &str) -> Result<Option<EventResult>> {
        Ok(self.collections.result(event_id))
    }

    fn results(&self) -> Result<Vec<EventResult>> {
        Ok(self.collections.results.clone())
    }

    fn leaderboard(&self) -> Result<Option<LeaderboardSummary>> {
        Ok(self.collections.leaderboard.clone())
    }

    fn import_roster(&mut self, roster: Roster) -> Result<()> {
        self.commit(|collections| collections.import_roster(roster))
    }

    fn upsert_score(&mut self, score: Score) -> Result<()> {
        self.commit(|collections| collections.upsert_score(score))
    }

    fn replace_rank_records(&mut self, event_id: &str, records: Vec<RankRecord>) -> Result<()> {
        self.commit(|collections| collections.replace_rank_records(event_id, records))
    }

    fn upsert_result(&mut self, result: EventResult) -> Result<()> {
        self.commit(|collections| collections.upsert_result(result))
    }

    fn reset_event(&mut self, event_id: &str) -> Result<EventReset> {
        self.commit(|collections| collections.reset_event(event_id))
    }

    fn upsert_leaderboard(&mut self, summary: LeaderboardSummary) -> Result<()> {
        self.commit(|collections| collections.leaderboard = Some(summary))
    }
}
