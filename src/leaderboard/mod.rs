use crate::types::model::{LeaderboardSummary, RankRecord, SectorStanding, SectorTally};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnrecognizedSector,
    UnrecognizedCategory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub event_id: String,
    pub participant_id: String,
    pub sector: String,
    pub category: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Standings {
    pub sorted_leaderboard: Vec<SectorStanding>,
    pub sector_category_scores: BTreeMap<String, SectorTally>,
    pub skipped: Vec<SkippedRecord>,
}

impl Standings {
    pub fn into_summary(self, last_updated: DateTime<Utc>) -> LeaderboardSummary {
        LeaderboardSummary {
            sorted_leaderboard: self.sorted_leaderboard,
            sector_category_scores: self.sector_category_scores,
            last_updated,
        }
    }
}

/// Folds every rank record into per-sector, per-category points.
///
/// Every registered sector appears in the output with every category at zero
/// before any record is counted. Records naming a sector or category outside
/// those sets are reported in `skipped` and contribute nothing. Sectors with
/// equal totals keep their registration order.
pub fn aggregate(records: &[RankRecord], sectors: &[String], categories: &[String]) -> Standings {
    let mut order = Vec::<&str>::new();
    let mut tallies = BTreeMap::<String, SectorTally>::new();
    for sector in sectors {
        if tallies.contains_key(sector) {
            continue;
        }
        let tally = SectorTally {
            categories: categories
                .iter()
                .map(|category| (category.clone(), 0))
                .collect(),
            total: 0,
        };
        tallies.insert(sector.clone(), tally);
        order.push(sector.as_str());
    }

    let mut skipped = Vec::new();
    for record in records {
        let reason = match tallies.get_mut(&record.participant_sector) {
            None => Some(SkipReason::UnrecognizedSector),
            Some(tally) => match tally.categories.get_mut(&record.participant_category) {
                None => Some(SkipReason::UnrecognizedCategory),
                Some(points) => {
                    *points += record.points_awarded;
                    tally.total += record.points_awarded;
                    None
                }
            },
        };
        if let Some(reason) = reason {
            warn!(
                event = %record.event_id,
                participant = %record.participant_id,
                sector = %record.participant_sector,
                category = %record.participant_category,
                ?reason,
                "rank record left out of leaderboard"
            );
            skipped.push(SkippedRecord {
                event_id: record.event_id.clone(),
                participant_id: record.participant_id.clone(),
                sector: record.participant_sector.clone(),
                category: record.participant_category.clone(),
                reason,
            });
        }
    }

    let mut sorted_leaderboard = order
        .iter()
        .map(|sector| SectorStanding {
            sector: sector.to_string(),
            total_score: tallies.get(*sector).map_or(0, |tally| tally.total),
        })
        .collect::<Vec<_>>();
    sorted_leaderboard.sort_by(|left, right| right.total_score.cmp(&left.total_score));

    debug!(
        sectors = sorted_leaderboard.len(),
        counted = records.len() - skipped.len(),
        skipped = skipped.len(),
        "aggregated leaderboard"
    );
    Standings {
        sorted_leaderboard,
        sector_category_scores: tallies,
        skipped,
    }
}
