mod auth;
mod cli;
mod config;
mod error;
mod leaderboard;
mod rank;
mod report;
mod service;
mod store;
mod types;

use crate::error::FestError;
use crate::store::{FileStore, Repository};
use crate::types::config::DEFAULT_STORE_FILE;
use crate::types::model::Roster;
use clap::Parser;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const REFUSED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn confirm(prompt: &str) -> Result<bool, FestError> {
    print!("{prompt} [y/N]: ");
    io::stdout().flush().map_err(FestError::Io)?;
    let mut input = String::new();
    io::stdin().read_line(&mut input).map_err(FestError::Io)?;
    let normalized = input.trim().to_ascii_lowercase();
    Ok(normalized == "y" || normalized == "yes")
}

fn run(cli: cli::Cli) -> Result<i32, FestError> {
    let cli::Cli {
        data_dir,
        user,
        format,
        command,
        ..
    } = cli;

    if let cli::Commands::Init(cmd) = &command {
        if !cmd.force {
            for path in [
                data_dir.join(config::DEFAULT_CONFIG_FILE),
                data_dir.join(DEFAULT_STORE_FILE),
            ] {
                if path.exists() {
                    return Err(FestError::AlreadyExists(path.display().to_string()));
                }
            }
        }
        let config_path = config::write_template(&data_dir, cmd.force)?;
        let store = FileStore::create(&data_dir.join(DEFAULT_STORE_FILE), cmd.force)?;
        println!("config: {}", config_path.display());
        println!("store: {}", store.path().display());
        return Ok(exit_code::SUCCESS);
    }

    let loaded = config::load_config(&data_dir)?;
    let missing_config = loaded.is_none();
    if missing_config {
        eprintln!(
            "warning: no {} found in {}; using defaults",
            config::DEFAULT_CONFIG_FILE,
            data_dir.display()
        );
    }
    let config = loaded.unwrap_or_default();
    let principal = auth::resolve(&config, user.as_deref())?;
    let rules = rank::ScoringRules::from_config(&config);
    let mut store = FileStore::open(&data_dir.join(config.store_path()))?;
    let output_format = match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    };
    tracing::debug!(user = %principal.id, role = %principal.role, "session resolved");

    let mut has_warnings = missing_config;
    match command {
        cli::Commands::Init(_) => unreachable!("init handled before store is opened"),
        cli::Commands::Import(cmd) => {
            let content = std::fs::read_to_string(&cmd.roster)?;
            let roster: Roster = serde_json::from_str(&content)?;
            let (sectors, events, participants) = (
                roster.sectors.len(),
                roster.events.len(),
                roster.participants.len(),
            );
            service::import_roster(&mut store, &principal, roster)?;
            println!(
                "imported {sectors} sector(s), {events} event(s), {participants} participant(s)"
            );
        }
        cli::Commands::Events => {
            let events = store.events()?;
            println!("{}", report::render_events(&events, output_format)?);
        }
        cli::Commands::Mark(cmd) => {
            let score = service::record_mark(
                &mut store,
                &principal,
                &cmd.event,
                &cmd.participant,
                cmd.judge.as_deref(),
                cmd.marks,
            )?;
            println!(
                "recorded {} marks for {} in {} (judge {})",
                score.marks, score.participant_id, score.event_id, score.judge_id
            );
        }
        cli::Commands::Process(cmd) => {
            let processed = service::process_event(&mut store, &principal, &rules, &cmd.event)?;
            let rendered = report::render_ranks(
                &processed.event,
                &processed.outcome.records,
                output_format,
            )?;
            println!("{rendered}");
            if matches!(output_format, report::OutputFormat::Md) {
                println!(
                    "published {} placement(s) for {}",
                    processed.result.placements.len(),
                    processed.result.event_name
                );
            }
        }
        cli::Commands::Ranks(cmd) => {
            let event = store
                .event(&cmd.event)?
                .ok_or_else(|| FestError::EventNotFound(cmd.event.clone()))?;
            let records = store.rank_records_for_event(&cmd.event)?;
            println!("{}", report::render_ranks(&event, &records, output_format)?);
        }
        cli::Commands::Results(cmd) => {
            let results: Vec<_> = match &cmd.event {
                Some(event_id) => store.result(event_id)?.into_iter().collect(),
                None => store.results()?,
            };
            println!("{}", report::render_results(&results, output_format)?);
        }
        cli::Commands::Leaderboard(cmd) => {
            let summary = if cmd.recalculate {
                let run = service::recalculate_leaderboard(&mut store, &principal, &rules)?;
                if !run.skipped.is_empty() {
                    eprintln!(
                        "warning: {} rank record(s) left out of the leaderboard",
                        run.skipped.len()
                    );
                    for skipped in &run.skipped {
                        eprintln!(
                            "  - {}/{}: sector `{}`, category `{}` ({:?})",
                            skipped.event_id,
                            skipped.participant_id,
                            skipped.sector,
                            skipped.category,
                            skipped.reason
                        );
                    }
                    has_warnings = true;
                }
                run.summary
            } else {
                match store.leaderboard()? {
                    Some(summary) => summary,
                    None => {
                        println!("leaderboard: not calculated yet (use --recalculate)");
                        return Ok(completion_code(has_warnings));
                    }
                }
            };
            println!(
                "{}",
                report::render_leaderboard(&summary, &rules.categories, output_format)?
            );
            if let (Some(sector), report::OutputFormat::Md) = (&principal.sector, output_format) {
                if let Some(position) = summary
                    .sorted_leaderboard
                    .iter()
                    .position(|standing| &standing.sector == sector)
                {
                    println!("{sector} is in position {}", position + 1);
                }
            }
        }
        cli::Commands::Reset(cmd) => {
            if !cmd.yes && !confirm(&format!("Reset all marks and ranks of {}?", cmd.event))? {
                println!("reset cancelled");
                return Ok(completion_code(has_warnings));
            }
            let reset = service::reset_event(&mut store, &principal, &cmd.event)?;
            println!(
                "reset {}: removed {} mark(s), {} rank record(s){}",
                cmd.event,
                reset.scores,
                reset.rank_records,
                if reset.result_removed {
                    " and the published result"
                } else {
                    ""
                }
            );
        }
    }

    Ok(completion_code(has_warnings))
}

fn completion_code(has_warnings: bool) -> i32 {
    if has_warnings {
        exit_code::WARNINGS
    } else {
        exit_code::SUCCESS
    }
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = if e.is_refusal() {
                exit_code::REFUSED
            } else {
                exit_code::RUNTIME_FAILURE
            };
            std::process::exit(code);
        }
    }
}
