//! Command-line interface for bracket-pool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bracket Pool - prediction pool over a 64-entrant single-elimination bracket
#[derive(Parser, Debug)]
#[command(name = "bracket-pool")]
#[command(about = "Projects, scores and administers a bracket pool snapshot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a fresh snapshot from a JSON array of 64 entrants
    Init {
        /// Snapshot file to write
        snapshot: PathBuf,

        /// JSON file holding the field
        #[arg(long)]
        field: PathBuf,
    },

    /// Rank every bracket in the pool
    Leaderboard {
        snapshot: PathBuf,
    },

    /// Print the projected pair of every match for one bracket
    Project {
        snapshot: PathBuf,

        #[arg(long)]
        bracket: String,
    },

    /// Score one bracket against recorded results
    Score {
        snapshot: PathBuf,

        #[arg(long)]
        bracket: String,
    },

    /// Register an empty bracket
    AddBracket {
        snapshot: PathBuf,

        #[arg(long)]
        bracket: String,

        /// Owning user
        #[arg(long)]
        owner: String,
    },

    /// Place or change a pick
    Pick {
        snapshot: PathBuf,

        #[arg(long)]
        bracket: String,

        #[arg(long = "match")]
        match_id: String,

        #[arg(long)]
        entrant: String,

        /// User making the change
        #[arg(long)]
        user: String,

        /// Act as an administrator (overrides lock and ownership)
        #[arg(long)]
        admin: bool,
    },

    /// Submit a complete bracket
    Submit {
        snapshot: PathBuf,

        #[arg(long)]
        bracket: String,

        #[arg(long)]
        user: String,
    },

    /// Record (or correct) a match result as an administrator
    RecordResult {
        snapshot: PathBuf,

        #[arg(long = "match")]
        match_id: String,

        #[arg(long)]
        winner: String,

        /// Administrator recording the result
        #[arg(long)]
        user: String,
    },
}
