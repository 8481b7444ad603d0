pub mod json;
pub mod md;

use crate::error::FestError;
use crate::types::model::{Event, EventResult, LeaderboardSummary, RankRecord};

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render_events(events: &[Event], format: OutputFormat) -> Result<String, FestError> {
    match format {
        OutputFormat::Json => json::to_json(events).map_err(FestError::Json),
        OutputFormat::Md => Ok(md::events(events)),
    }
}

pub fn render_ranks(
    event: &Event,
    records: &[RankRecord],
    format: OutputFormat,
) -> Result<String, FestError> {
    match format {
        OutputFormat::Json => json::to_json(records).map_err(FestError::Json),
        OutputFormat::Md => Ok(md::ranks(event, records)),
    }
}

pub fn render_results(results: &[EventResult], format: OutputFormat) -> Result<String, FestError> {
    match format {
        OutputFormat::Json => json::to_json(results).map_err(FestError::Json),
        OutputFormat::Md => Ok(md::results(results)),
    }
}

pub fn render_leaderboard(
    summary: &LeaderboardSummary,
    categories: &[String],
    format: OutputFormat,
) -> Result<String, FestError> {
    match format {
        OutputFormat::Json => json::to_json(summary).map_err(FestError::Json),
        OutputFormat::Md => Ok(md::leaderboard(summary, categories)),
    }
}
