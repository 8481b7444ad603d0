use crate::auth::{Action, Principal, Role};
use crate::error::{FestError, Result};
use crate::leaderboard::{self, SkippedRecord};
use crate::rank::{self, RankOutcome, ScoringRules};
use crate::store::{EventReset, Repository};
use crate::types::model::{Event, EventResult, LeaderboardSummary, Roster, Score};
use chrono::Utc;
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ProcessedEvent {
    pub event: Event,
    pub outcome: RankOutcome,
    pub result: EventResult,
}

#[derive(Debug, Clone)]
pub struct LeaderboardRun {
    pub summary: LeaderboardSummary,
    pub skipped: Vec<SkippedRecord>,
}

pub fn import_roster<R: Repository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
    roster: Roster,
) -> Result<()> {
    principal.authorize(Action::ImportRoster)?;

    let mut known = repo.sectors()?.into_iter().collect::<HashSet<_>>();
    known.extend(roster.sectors.iter().cloned());
    for participant in &roster.participants {
        if !known.contains(&participant.sector) {
            warn!(
                participant = %participant.id,
                sector = %participant.sector,
                "participant belongs to an unregistered sector"
            );
        }
    }

    info!(
        sectors = roster.sectors.len(),
        events = roster.events.len(),
        participants = roster.participants.len(),
        "importing roster"
    );
    repo.import_roster(roster)
}

/// Stores one judge's mark, replacing any earlier mark for the same slot.
///
/// Judges always mark under their own id; admins and stage admins may mark
/// on behalf of a named judge.
pub fn record_mark<R: Repository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
    event_id: &str,
    participant_id: &str,
    judge: Option<&str>,
    marks: u32,
) -> Result<Score> {
    principal.authorize(Action::RecordMark)?;

    let judge_id = match judge {
        Some(judge) if judge != principal.id && principal.role == Role::Judge => {
            return Err(FestError::Forbidden(format!(
                "{} may not mark on behalf of {}",
                principal.id, judge
            )));
        }
        Some(judge) => judge,
        None => principal.id.as_str(),
    };

    if repo.event(event_id)?.is_none() {
        return Err(FestError::EventNotFound(event_id.to_string()));
    }
    if !repo
        .participants()?
        .iter()
        .any(|participant| participant.id == participant_id)
    {
        return Err(FestError::ParticipantNotFound(participant_id.to_string()));
    }

    let score = Score::new(event_id, participant_id, judge_id, marks);
    repo.upsert_score(score.clone())?;
    info!(
        event = %event_id,
        participant = %participant_id,
        judge = %judge_id,
        marks,
        "recorded mark"
    );
    Ok(score)
}

/// Recomputes ranks for one event and republishes its result.
///
/// Earlier rank records for the event are replaced in a single batch, so
/// running this twice on unchanged marks leaves the store unchanged apart
/// from the result timestamp.
pub fn process_event<R: Repository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
    rules: &ScoringRules,
    event_id: &str,
) -> Result<ProcessedEvent> {
    principal.authorize(Action::ProcessRanks)?;

    let event = repo
        .event(event_id)?
        .ok_or_else(|| FestError::EventNotFound(event_id.to_string()))?;
    let scores = repo.scores_for_event(event_id)?;
    let participants = repo.participants()?;

    let outcome = rank::calculate(&event, &scores, &participants, rules)?;
    repo.replace_rank_records(event_id, outcome.records.clone())?;

    let poster_image = repo
        .result(event_id)?
        .and_then(|previous| previous.poster_image);
    let result = EventResult {
        event_id: event.id.clone(),
        event_name: event.name.clone(),
        category_name: event.category.clone(),
        competition_type: event.competition_type.clone(),
        placements: outcome.placements.clone(),
        poster_image,
        timestamp: Utc::now(),
    };
    repo.upsert_result(result.clone())?;

    info!(
        event = %event.id,
        ranked = outcome.records.len(),
        placements = outcome.placements.len(),
        "processed event ranks"
    );
    Ok(ProcessedEvent {
        event,
        outcome,
        result,
    })
}

/// Rebuilds the leaderboard from every stored rank record and overwrites the
/// stored summary with one write.
pub fn recalculate_leaderboard<R: Repository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
    rules: &ScoringRules,
) -> Result<LeaderboardRun> {
    principal.authorize(Action::RecalculateLeaderboard)?;

    let records = repo.all_rank_records()?;
    let sectors = repo.sectors()?;
    let standings = leaderboard::aggregate(&records, &sectors, &rules.categories);
    let skipped = standings.skipped.clone();
    let summary = standings.into_summary(Utc::now());
    repo.upsert_leaderboard(summary.clone())?;

    info!(
        records = records.len(),
        sectors = summary.sorted_leaderboard.len(),
        skipped = skipped.len(),
        "recalculated leaderboard"
    );
    Ok(LeaderboardRun { summary, skipped })
}

/// Clears every mark, rank record and published result of one event.
pub fn reset_event<R: Repository + ?Sized>(
    repo: &mut R,
    principal: &Principal,
    event_id: &str,
) -> Result<EventReset> {
    principal.authorize(Action::ResetEvent)?;

    if repo.event(event_id)?.is_none() {
        return Err(FestError::EventNotFound(event_id.to_string()));
    }
    let report = repo.reset_event(event_id)?;
    info!(
        event = %event_id,
        scores = report.scores,
        rank_records = report.rank_records,
        "reset event"
    );
    Ok(report)
}
