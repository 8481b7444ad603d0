use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One judge's mark for one participant in one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub event_id: String,
    pub participant_id: String,
    pub judge_id: String,
    pub marks: u32,
}

impl Score {
    pub fn new(event_id: &str, participant_id: &str, judge_id: &str, marks: u32) -> Self {
        Self {
            event_id: event_id.to_string(),
            participant_id: participant_id.to_string(),
            judge_id: judge_id.to_string(),
            marks,
        }
    }

    pub fn same_slot(&self, other: &Score) -> bool {
        self.event_id == other.event_id
            && self.participant_id == other.participant_id
            && self.judge_id == other.judge_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub category: String,
    pub competition_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub sector: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionType {
    Single,
    Group,
}

impl CompetitionType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" | "individual" => Some(Self::Single),
            "group" | "team" => Some(Self::Group),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankRecord {
    pub event_id: String,
    pub participant_id: String,
    pub participant_name: String,
    pub participant_sector: String,
    pub participant_category: String,
    pub rank: u32,
    pub points_awarded: u64,
    pub total_score: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub participant_id: String,
    pub participant_name: String,
    pub sector: String,
    pub rank: u32,
    pub total_score: u64,
    pub points_awarded: u64,
}

impl From<&RankRecord> for Placement {
    fn from(record: &RankRecord) -> Self {
        Self {
            participant_id: record.participant_id.clone(),
            participant_name: record.participant_name.clone(),
            sector: record.participant_sector.clone(),
            rank: record.rank,
            total_score: record.total_score,
            points_awarded: record.points_awarded,
        }
    }
}

/// Published result of one event, keyed by `event_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    pub event_id: String,
    pub event_name: String,
    pub category_name: String,
    pub competition_type: String,
    pub placements: Vec<Placement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_image: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorStanding {
    pub sector: String,
    pub total_score: u64,
}

/// Per-category points of one sector; serializes as `{"Kids": 0, ..., "total": 0}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorTally {
    #[serde(flatten)]
    pub categories: BTreeMap<String, u64>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardSummary {
    pub sorted_leaderboard: Vec<SectorStanding>,
    pub sector_category_scores: BTreeMap<String, SectorTally>,
    pub last_updated: DateTime<Utc>,
}

/// Configuration records imported in bulk before an event day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Roster {
    pub sectors: Vec<String>,
    pub events: Vec<Event>,
    pub participants: Vec<Participant>,
}
