use crate::types::model::{Event, EventResult, LeaderboardSummary, RankRecord};

pub const ABSENT: &str = "Absent";

fn score_cell(total: u64) -> String {
    if total == 0 {
        ABSENT.to_string()
    } else {
        total.to_string()
    }
}

pub fn events(events: &[Event]) -> String {
    let mut output = String::new();
    output.push_str("# Events\n\n");
    if events.is_empty() {
        output.push_str("- none scheduled\n");
        return output;
    }

    for event in events {
        output.push_str(&format!(
            "- {} `{}`: {} / {}",
            event.name, event.id, event.category, event.competition_type
        ));
        if let Some(stage) = &event.stage {
            output.push_str(&format!(", stage {}", stage));
        }
        if let Some(at) = &event.scheduled_at {
            output.push_str(&format!(", {}", at.format("%Y-%m-%d %H:%M UTC")));
        }
        output.push('\n');
    }
    output
}

pub fn ranks(event: &Event, records: &[RankRecord]) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Ranks: {} ({})\n\n", event.name, event.id));
    output.push_str(&format!(
        "Category: {} / {}\n\n",
        event.category, event.competition_type
    ));

    if records.is_empty() {
        output.push_str("- no marks recorded\n");
        return output;
    }

    output.push_str("| Rank | Participant | Sector | Score | Points |\n");
    output.push_str("|---|---|---|---|---|\n");
    for record in records {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            record.rank,
            record.participant_name,
            record.participant_sector,
            score_cell(record.total_score),
            record.points_awarded
        ));
    }
    output
}

pub fn results(results: &[EventResult]) -> String {
    let mut output = String::new();
    output.push_str("# Results\n\n");
    if results.is_empty() {
        output.push_str("- none published\n");
        return output;
    }

    for result in results {
        output.push_str(&format!(
            "## {} ({}, {})\n\n",
            result.event_name, result.category_name, result.competition_type
        ));
        if result.placements.is_empty() {
            output.push_str("- no placements\n\n");
            continue;
        }
        for placement in &result.placements {
            output.push_str(&format!(
                "- {}: {} [{}] {}\n",
                ordinal(placement.rank),
                placement.participant_name,
                placement.sector,
                score_cell(placement.total_score)
            ));
        }
        output.push('\n');
    }
    output
}

pub fn leaderboard(summary: &LeaderboardSummary, categories: &[String]) -> String {
    let mut output = String::new();
    output.push_str("# Sector Leaderboard\n\n");
    output.push_str(&format!(
        "Last updated: {}\n\n",
        summary.last_updated.to_rfc3339()
    ));

    output.push_str("| Sector |");
    for category in categories {
        output.push_str(&format!(" {} |", category));
    }
    output.push_str(" Total |\n|---|");
    for _ in categories {
        output.push_str("---|");
    }
    output.push_str("---|\n");

    for standing in &summary.sorted_leaderboard {
        output.push_str(&format!("| {} |", standing.sector));
        let tally = summary.sector_category_scores.get(&standing.sector);
        for category in categories {
            let points = tally
                .and_then(|tally| tally.categories.get(category))
                .copied()
                .unwrap_or(0);
            output.push_str(&format!(" {} |", points));
        }
        output.push_str(&format!(" {} |\n", standing.total_score));
    }
    output
}

fn ordinal(rank: u32) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}
