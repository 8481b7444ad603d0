pub mod policy;

pub use policy::PointsPolicy;

use crate::error::{FestError, Result};
use crate::types::config::FestConfig;
use crate::types::model::{CompetitionType, Event, Participant, Placement, RankRecord, Score};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

pub const UNKNOWN_PARTICIPANT: &str = "Unknown";
pub const PLACEMENT_RANKS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringRules {
    pub categories: Vec<String>,
    pub policy: PointsPolicy,
}

impl ScoringRules {
    pub fn from_config(config: &FestConfig) -> Self {
        Self {
            categories: config.categories(),
            policy: config.points_policy(),
        }
    }
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self::from_config(&FestConfig::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankOutcome {
    pub records: Vec<RankRecord>,
    pub placements: Vec<Placement>,
}

/// Checks that the event can be scored under the configured rules.
pub fn competition_type_for(event: &Event, categories: &[String]) -> Result<CompetitionType> {
    if !categories.iter().any(|category| category == &event.category) {
        return Err(FestError::MissingPointScheme {
            event: event.id.clone(),
            reason: format!("unrecognized category `{}`", event.category),
        });
    }
    CompetitionType::parse(&event.competition_type).ok_or_else(|| FestError::MissingPointScheme {
        event: event.id.clone(),
        reason: format!(
            "unrecognized competition type `{}`",
            event.competition_type
        ),
    })
}

/// Ranks every participant holding at least one mark in `event`.
pub fn calculate(
    event: &Event,
    scores: &[Score],
    participants: &[Participant],
    rules: &ScoringRules,
) -> Result<RankOutcome> {
    let competition_type = competition_type_for(event, &rules.categories)?;

    let mut totals = total_marks(event, scores);
    totals.sort_by(|left, right| right.1.cmp(&left.1));

    let by_id: HashMap<&str, &Participant> = participants
        .iter()
        .map(|participant| (participant.id.as_str(), participant))
        .collect();

    let ranks = assign_ranks(&totals.iter().map(|(_, total)| *total).collect::<Vec<_>>());
    let records = totals
        .into_iter()
        .zip(ranks)
        .map(|((participant_id, total_score), rank)| {
            let (name, sector, category) = match by_id.get(participant_id.as_str()) {
                Some(participant) => (
                    participant.name.clone(),
                    participant.sector.clone(),
                    participant
                        .category
                        .clone()
                        .unwrap_or_else(|| event.category.clone()),
                ),
                None => {
                    warn!(
                        event = %event.id,
                        participant = %participant_id,
                        "scored participant is not on the roster"
                    );
                    (
                        UNKNOWN_PARTICIPANT.to_string(),
                        String::new(),
                        event.category.clone(),
                    )
                }
            };
            RankRecord {
                event_id: event.id.clone(),
                participant_id,
                participant_name: name,
                participant_sector: sector,
                participant_category: category,
                rank,
                points_awarded: rules.policy.points(rank, total_score, competition_type),
                total_score,
            }
        })
        .collect::<Vec<_>>();

    let placements = select_placements(&records);
    debug!(
        event = %event.id,
        ranked = records.len(),
        placements = placements.len(),
        "ranked event"
    );
    Ok(RankOutcome {
        records,
        placements,
    })
}

/// Sums marks per participant in first-appearance order.
fn total_marks(event: &Event, scores: &[Score]) -> Vec<(String, u64)> {
    let mut index = HashMap::<&str, usize>::new();
    let mut totals = Vec::<(String, u64)>::new();
    for score in scores {
        if score.event_id != event.id {
            debug!(
                event = %event.id,
                other = %score.event_id,
                "ignoring mark recorded for another event"
            );
            continue;
        }
        match index.get(score.participant_id.as_str()) {
            Some(&slot) => totals[slot].1 += u64::from(score.marks),
            None => {
                index.insert(score.participant_id.as_str(), totals.len());
                totals.push((score.participant_id.clone(), u64::from(score.marks)));
            }
        }
    }
    totals
}

/// Standard competition ranking over totals sorted in descending order:
/// `[100, 90, 90, 80]` ranks as `[1, 2, 2, 4]`.
pub fn assign_ranks(sorted_totals: &[u64]) -> Vec<u32> {
    let mut ranks = Vec::with_capacity(sorted_totals.len());
    let mut rank = 1u32;
    let mut previous: Option<u64> = None;
    for (position, &total) in sorted_totals.iter().enumerate() {
        if previous.is_some_and(|previous| total < previous) {
            rank = position as u32 + 1;
        }
        ranks.push(rank);
        previous = Some(total);
    }
    ranks
}

/// Everyone holding one of the first three distinct ranks.
pub fn select_placements(records: &[RankRecord]) -> Vec<Placement> {
    let mut seen = HashSet::<u32>::new();
    let mut placements = Vec::new();
    for record in records {
        if !seen.contains(&record.rank) {
            if seen.len() == PLACEMENT_RANKS {
                break;
            }
            seen.insert(record.rank);
        }
        placements.push(Placement::from(record));
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(category: &str, competition_type: &str) -> Event {
        Event {
            id: "e1".to_string(),
            name: "Folk Dance".to_string(),
            category: category.to_string(),
            competition_type: competition_type.to_string(),
            stage: None,
            scheduled_at: None,
        }
    }

    fn participant(id: &str, sector: &str) -> Participant {
        Participant {
            id: id.to_string(),
            name: format!("Name {id}"),
            sector: sector.to_string(),
            category: None,
        }
    }

    fn marks(entries: &[(&str, &str, u32)]) -> Vec<Score> {
        entries
            .iter()
            .map(|(participant, judge, marks)| Score::new("e1", participant, judge, *marks))
            .collect()
    }

    fn ranks_of(outcome: &RankOutcome) -> Vec<(&str, u32)> {
        outcome
            .records
            .iter()
            .map(|record| (record.participant_id.as_str(), record.rank))
            .collect()
    }

    #[test]
    fn assign_ranks_skips_after_ties() {
        assert_eq!(assign_ranks(&[100, 90, 90, 80]), vec![1, 2, 2, 4]);
        assert_eq!(assign_ranks(&[90, 90, 80]), vec![1, 1, 3]);
        assert_eq!(assign_ranks(&[5, 5, 5, 5]), vec![1, 1, 1, 1]);
        assert!(assign_ranks(&[]).is_empty());
    }

    #[test]
    fn totals_sum_marks_across_judges() {
        let scores = marks(&[
            ("p1", "j1", 20),
            ("p2", "j1", 25),
            ("p1", "j2", 30),
            ("p2", "j2", 10),
            ("p1", "j3", 7),
        ]);
        let roster = [participant("p1", "North"), participant("p2", "South")];

        let outcome = calculate(
            &event("Kids", "single"),
            &scores,
            &roster,
            &ScoringRules::default(),
        )
        .expect("ranking should succeed");

        assert_eq!(outcome.records[0].participant_id, "p1");
        assert_eq!(outcome.records[0].total_score, 57);
        assert_eq!(outcome.records[1].total_score, 35);
        let summed: u64 = scores.iter().map(|score| u64::from(score.marks)).sum();
        let ranked: u64 = outcome.records.iter().map(|record| record.total_score).sum();
        assert_eq!(summed, ranked);
    }

    #[test]
    fn tied_leaders_share_rank_and_all_three_are_placed() {
        let scores = marks(&[("p1", "j1", 50), ("p2", "j1", 50), ("p3", "j1", 30)]);
        let roster = [
            participant("p1", "North"),
            participant("p2", "South"),
            participant("p3", "East"),
        ];

        let outcome = calculate(
            &event("Kids", "single"),
            &scores,
            &roster,
            &ScoringRules::default(),
        )
        .expect("ranking should succeed");

        assert_eq!(ranks_of(&outcome), vec![("p1", 1), ("p2", 1), ("p3", 3)]);
        assert_eq!(outcome.placements.len(), 3);
        assert_eq!(outcome.placements[2].rank, 3);
    }

    #[test]
    fn four_way_tie_counts_as_one_distinct_rank() {
        let scores = marks(&[
            ("p1", "j1", 80),
            ("p2", "j1", 80),
            ("p3", "j1", 80),
            ("p4", "j1", 80),
            ("p5", "j1", 70),
            ("p6", "j1", 60),
            ("p7", "j1", 50),
        ]);

        let outcome = calculate(&event("Junior", "group"), &scores, &[], &ScoringRules::default())
            .expect("ranking should succeed");

        let placed: Vec<_> = outcome
            .placements
            .iter()
            .map(|placement| (placement.participant_id.as_str(), placement.rank))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("p1", 1),
                ("p2", 1),
                ("p3", 1),
                ("p4", 1),
                ("p5", 5),
                ("p6", 6)
            ]
        );
    }

    #[test]
    fn placements_include_everyone_sharing_the_third_rank() {
        let scores = marks(&[
            ("p1", "j1", 90),
            ("p2", "j1", 80),
            ("p3", "j1", 70),
            ("p4", "j1", 70),
            ("p5", "j1", 60),
        ]);

        let outcome = calculate(&event("Kids", "single"), &scores, &[], &ScoringRules::default())
            .expect("ranking should succeed");

        assert_eq!(outcome.placements.len(), 4);
        assert!(outcome
            .placements
            .iter()
            .all(|placement| placement.participant_id != "p5"));
    }

    #[test]
    fn raw_total_policy_awards_total_score() {
        let scores = marks(&[("p1", "j1", 12), ("p1", "j2", 9)]);
        let outcome = calculate(&event("Kids", "single"), &scores, &[], &ScoringRules::default())
            .expect("ranking should succeed");
        assert_eq!(outcome.records[0].points_awarded, 21);
    }

    #[test]
    fn fixed_table_policy_awards_by_rank() {
        let rules = ScoringRules {
            categories: FestConfig::default_categories(),
            policy: PointsPolicy::FixedTable {
                single: vec![5, 3, 1],
                group: vec![10, 8, 5],
            },
        };
        let scores = marks(&[
            ("p1", "j1", 40),
            ("p2", "j1", 40),
            ("p3", "j1", 30),
            ("p4", "j1", 10),
        ]);

        let outcome = calculate(&event("Senior", "group"), &scores, &[], &rules)
            .expect("ranking should succeed");

        let points: Vec<_> = outcome
            .records
            .iter()
            .map(|record| record.points_awarded)
            .collect();
        assert_eq!(points, vec![10, 10, 5, 0]);
    }

    #[test]
    fn zero_total_is_still_ranked() {
        let scores = marks(&[("p1", "j1", 10), ("p2", "j1", 0)]);
        let outcome = calculate(&event("Kids", "single"), &scores, &[], &ScoringRules::default())
            .expect("ranking should succeed");
        assert_eq!(ranks_of(&outcome), vec![("p1", 1), ("p2", 2)]);
        assert_eq!(outcome.records[1].total_score, 0);
    }

    #[test]
    fn empty_scores_yield_empty_outcome() {
        let outcome = calculate(&event("Kids", "single"), &[], &[], &ScoringRules::default())
            .expect("empty event should not fail");
        assert_eq!(outcome, RankOutcome::default());
    }

    #[test]
    fn unknown_category_is_refused() {
        let result = calculate(&event("Elders", "single"), &[], &[], &ScoringRules::default());
        assert!(matches!(result, Err(FestError::MissingPointScheme { .. })));
    }

    #[test]
    fn unknown_competition_type_is_refused() {
        let result = calculate(&event("Kids", "relay"), &[], &[], &ScoringRules::default());
        assert!(matches!(
            result,
            Err(FestError::MissingPointScheme { reason, .. }) if reason.contains("relay")
        ));
    }

    #[test]
    fn roster_supplies_sector_and_category() {
        let mut senior = participant("p1", "North");
        senior.category = Some("Senior".to_string());
        let scores = marks(&[("p1", "j1", 10), ("ghost", "j1", 5)]);

        let outcome = calculate(
            &event("General", "single"),
            &scores,
            &[senior],
            &ScoringRules::default(),
        )
        .expect("ranking should succeed");

        assert_eq!(outcome.records[0].participant_sector, "North");
        assert_eq!(outcome.records[0].participant_category, "Senior");
        assert_eq!(outcome.records[1].participant_name, UNKNOWN_PARTICIPANT);
        assert_eq!(outcome.records[1].participant_sector, "");
        assert_eq!(outcome.records[1].participant_category, "General");
    }

    #[test]
    fn marks_for_other_events_are_ignored() {
        let mut scores = marks(&[("p1", "j1", 10)]);
        scores.push(Score::new("e2", "p1", "j1", 99));

        let outcome = calculate(&event("Kids", "single"), &scores, &[], &ScoringRules::default())
            .expect("ranking should succeed");
        assert_eq!(outcome.records[0].total_score, 10);
    }

    #[test]
    fn recalculation_is_deterministic() {
        let scores = marks(&[
            ("p3", "j1", 30),
            ("p1", "j1", 50),
            ("p2", "j1", 50),
            ("p1", "j2", 5),
            ("p2", "j2", 5),
        ]);
        let rules = ScoringRules::default();

        let first = calculate(&event("Kids", "single"), &scores, &[], &rules)
            .expect("ranking should succeed");
        let second = calculate(&event("Kids", "single"), &scores, &[], &rules)
            .expect("ranking should succeed");

        assert_eq!(
            serde_json::to_vec(&first.records).expect("records should serialize"),
            serde_json::to_vec(&second.records).expect("records should serialize")
        );
        assert_eq!(ranks_of(&first), vec![("p1", 1), ("p2", 1), ("p3", 3)]);
    }
}
