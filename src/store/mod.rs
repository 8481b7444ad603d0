pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::model::{
    Event, EventResult, LeaderboardSummary, Participant, RankRecord, Roster, Score,
};
use serde::{Deserialize, Serialize};

/// Document-store operations the scoring workflow needs.
///
/// Every write is all-or-nothing: an implementation either applies the whole
/// change or returns an error and leaves the stored data as it was.
pub trait Repository {
    fn event(&self, id: &str) -> Result<Option<Event>>;
    fn events(&self) -> Result<Vec<Event>>;
    fn participants(&self) -> Result<Vec<Participant>>;
    fn sectors(&self) -> Result<Vec<String>>;
    fn scores_for_event(&self, event_id: &str) -> Result<Vec<Score>>;
    fn rank_records_for_event(&self, event_id: &str) -> Result<Vec<RankRecord>>;
    fn all_rank_records(&self) -> Result<Vec<RankRecord>>;
    fn result(&self, event_id: &str) -> Result<Option<EventResult>>;
    fn results(&self) -> Result<Vec<EventResult>>;
    fn leaderboard(&self) -> Result<Option<LeaderboardSummary>>;

    fn import_roster(&mut self, roster: Roster) -> Result<()>;
    fn upsert_score(&mut self, score: Score) -> Result<()>;
    /// Drops every rank record of `event_id` and writes `records` in one batch.
    fn replace_rank_records(&mut self, event_id: &str, records: Vec<RankRecord>) -> Result<()>;
    fn upsert_result(&mut self, result: EventResult) -> Result<()>;
    /// Removes the marks, rank records and result of `event_id` in one batch.
    fn reset_event(&mut self, event_id: &str) -> Result<EventReset>;
    fn upsert_leaderboard(&mut self, summary: LeaderboardSummary) -> Result<()>;
}

/// What an event reset removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventReset {
    pub scores: usize,
    pub rank_records: usize,
    pub result_removed: bool,
}

/// All collections of one store, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Collections {
    pub sectors: Vec<String>,
    pub events: Vec<Event>,
    pub participants: Vec<Participant>,
    pub scores: Vec<Score>,
    pub rank_records: Vec<RankRecord>,
    pub results: Vec<EventResult>,
    pub leaderboard: Option<LeaderboardSummary>,
}

impl Collections {
    pub fn event(&self, id: &str) -> Option<Event> {
        self.events.iter().find(|event| event.id == id).cloned()
    }

    pub fn scores_for_event(&self, event_id: &str) -> Vec<Score> {
        self.scores
            .iter()
            .filter(|score| score.event_id == event_id)
            .cloned()
            .collect()
    }

    pub fn rank_records_for_event(&self, event_id: &str) -> Vec<RankRecord> {
        self.rank_records
            .iter()
            .filter(|record| record.event_id == event_id)
            .cloned()
            .collect()
    }

    pub fn result(&self, event_id: &str) -> Option<EventResult> {
        self.results
            .iter()
            .find(|result| result.event_id == event_id)
            .cloned()
    }

    pub fn import_roster(&mut self, roster: Roster) {
        for sector in roster.sectors {
            if !self.sectors.contains(&sector) {
                self.sectors.push(sector);
            }
        }
        for event in roster.events {
            match self.events.iter_mut().find(|existing| existing.id == event.id) {
                Some(existing) => *existing = event,
                None => self.events.push(event),
            }
        }
        for participant in roster.participants {
            match self
                .participants
                .iter_mut()
                .find(|existing| existing.id == participant.id)
            {
                Some(existing) => *existing = participant,
                None => self.participants.push(participant),
            }
        }
    }

    pub fn upsert_score(&mut self, score: Score) {
        match self.scores.iter_mut().find(|existing| existing.same_slot(&score)) {
            Some(existing) => existing.marks = score.marks,
            None => self.scores.push(score),
        }
    }

    pub fn delete_scores_for_event(&mut self, event_id: &str) -> usize {
        let before = self.scores.len();
        self.scores.retain(|score| score.event_id != event_id);
        before - self.scores.len()
    }

    pub fn delete_rank_records_for_event(&mut self, event_id: &str) -> usize {
        let before = self.rank_records.len();
        self.rank_records.retain(|record| record.event_id != event_id);
        before - self.rank_records.len()
    }

    pub fn replace_rank_records(&mut self, event_id: &str, records: Vec<RankRecord>) {
        self.delete_rank_records_for_event(event_id);
        self.rank_records.extend(records);
    }

    pub fn upsert_result(&mut self, result: EventResult) {
        match self
            .results
            .iter_mut()
            .find(|existing| existing.event_id == result.event_id)
        {
            Some(existing) => *existing = result,
            None => self.results.push(result),
        }
    }

    pub fn delete_result(&mut self, event_id: &str) -> bool {
        let before = self.results.len();
        self.results.retain(|result| result.event_id != event_id);
        before != self.results.len()
    }

    pub fn reset_event(&mut self, event_id: &str) -> EventReset {
        EventReset {
            scores: self.delete_scores_for_event(event_id),
            rank_records: self.delete_rank_records_for_event(event_id),
            result_removed: self.delete_result(event_id),
        }
    }
}
