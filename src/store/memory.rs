use super::{Collections, EventReset, Repository};
use crate::error::Result;
use crate::types::model::{
    Event, EventResult, LeaderboardSummary, Participant, RankRecord, Roster, Score,
};

/// Repository kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub collections: Collections,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roster(roster: Roster) -> Self {
        let mut store = Self::new();
        store.collections.import_roster(roster);
        store
    }
}

impl Repository for MemoryStore {
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
        self.collections.import_roster(roster);
        Ok(())
    }

    fn upsert_score(&mut self, score: Score) -> Result<()> {
        self.collections.upsert_score(score);
        Ok(())
    }

    fn replace_rank_records(&mut self, event_id: &str, records: Vec<RankRecord>) -> Result<()> {
        self.collections.replace_rank_records(event_id, records);
        Ok(())
    }

    fn upsert_result(&mut self, result: EventResult) -> Result<()> {
        self.collections.upsert_result(result);
        Ok(())
    }

    fn reset_event(&mut self, event_id: &str) -> Result<EventReset> {
        Ok(self.collections.reset_event(event_id))
    }

    fn upsert_leaderboard(&mut self, summary: LeaderboardSummary) -> Result<()> {
        self.collections.leaderboard = Some(summary);
        Ok(())
    }
}
