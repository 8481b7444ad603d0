use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "festboard",
    version,
    about = "Cultural-event scoring, rank processing and sector leaderboard CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding festboard.toml and the store
    #[arg(long, global = true, default_value = ".")]
    pub data_dir: PathBuf,

    /// Act as this configured user
    #[arg(long, global = true, env = "FESTBOARD_USER")]
    pub user: Option<String>,

    #[arg(short, long, global = true, value_enum, default_value = "md")]
    pub format: ReportFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Init(InitCommand),
    Import(ImportCommand),
    Events,
    Mark(MarkCommand),
    Process(ProcessCommand),
    Ranks(RanksCommand),
    Results(ResultsCommand),
    Leaderboard(LeaderboardCommand),
    Reset(ResetCommand),
}

#[derive(Args)]
pub struct InitCommand {
    /// Replace an existing config and store
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ImportCommand {
    /// Roster JSON with sectors, events and participants
    pub roster: PathBuf,
}

#[derive(Args)]
pub struct MarkCommand {
    pub event: String,
    pub participant: String,
    pub marks: u32,
    /// Judge to record the mark for (admins and stage admins only)
    #[arg(long)]
    pub judge: Option<String>,
}

#[derive(Args)]
pub struct ProcessCommand {
    pub event: String,
}

#[derive(Args)]
pub struct RanksCommand {
    pub event: String,
}

#[derive(Args)]
pub struct ResultsCommand {
    #[arg(long)]
    pub event: Option<String>,
}

#[derive(Args)]
pub struct LeaderboardCommand {
    /// Rebuild the leaderboard from all rank records before printing
    #[arg(long)]
    pub recalculate: bool,
}

#[derive(Args)]
pub struct ResetCommand {
    pub event: String,
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}
