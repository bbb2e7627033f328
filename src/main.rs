//! Bracket Pool CLI
//!
//! Reads a pool snapshot, runs one engine operation and prints JSON to stdout.
//! Mutating commands apply the resulting effects and save the snapshot atomically.

mod cli;

use std::path::Path;
use std::process::ExitCode;

use bracket_pool::effects::EffectInterpreter;
use bracket_pool::persistence::{
    PoolSnapshot, SnapshotError, load_snapshot, save_snapshot_atomic,
};
use bracket_pool::pool::{Actor, ApplyError, InMemoryPool, PoolEngine, PoolError};
use bracket_pool::scoring::score;
use bracket_pool::state::Projector;
use bracket_pool::types::{Bracket, BracketId, Entrant, EntrantId, MatchId, PickSet, Settings};
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error("reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("bracket {0} not found")]
    UnknownBracket(BracketId),
}

type Result<T> = std::result::Result<T, CliError>;

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bracket_pool=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { snapshot, field } => init(&snapshot, &field),
        Command::Leaderboard { snapshot } => {
            let pool = open(&snapshot)?;
            let engine = PoolEngine::new(pool.settings().clone());
            let today = Utc::now().date_naive();
            print_json(&engine.leaderboard(pool.tournament(), pool.entries(), today))
        }
        Command::Project { snapshot, bracket } => {
            let pool = open(&snapshot)?;
            let (_, picks) = entry(&pool, &BracketId::new(bracket))?;
            print_json(&Projector::new(pool.tournament(), picks).resolve_all())
        }
        Command::Score { snapshot, bracket } => {
            let pool = open(&snapshot)?;
            let (_, picks) = entry(&pool, &BracketId::new(bracket))?;
            print_json(&score(picks, pool.tournament(), &pool.settings().weights))
        }
        Command::AddBracket {
            snapshot,
            bracket,
            owner,
        } => {
            let mut pool = open(&snapshot)?;
            let bracket = Bracket::new(bracket, owner);
            info!(bracket_id = %bracket.id, owner = %bracket.owner, "Adding bracket");
            pool.add_bracket(bracket.clone())?;
            save(&snapshot, &pool)?;
            print_json(&bracket)
        }
        Command::Pick {
            snapshot,
            bracket,
            match_id,
            entrant,
            user,
            admin,
        } => {
            let mut pool = open(&snapshot)?;
            let actor = if admin {
                Actor::admin(user)
            } else {
                Actor::participant(user)
            };
            let outcome = {
                let (bracket, picks) = entry(&pool, &BracketId::new(bracket))?;
                PoolEngine::new(pool.settings().clone()).place_pick(
                    pool.tournament(),
                    bracket,
                    picks,
                    &actor,
                    &MatchId::new(match_id),
                    &EntrantId::new(entrant),
                    Utc::now(),
                )?
            };
            if !outcome.effects.is_empty() {
                pool.apply(&outcome.effects)?;
                save(&snapshot, &pool)?;
            }
            print_json(&json!({
                "pick": outcome.pick,
                "replaced": outcome.replaced,
                "invalidated": outcome.invalidated,
                "projected": outcome.projected,
            }))
        }
        Command::Submit {
            snapshot,
            bracket,
            user,
        } => {
            let mut pool = open(&snapshot)?;
            let effects = {
                let (bracket, picks) = entry(&pool, &BracketId::new(bracket))?;
                PoolEngine::new(pool.settings().clone()).submit_bracket(
                    pool.tournament(),
                    bracket,
                    picks,
                    &Actor::participant(user),
                    Utc::now(),
                )?
            };
            pool.apply(&effects)?;
            save(&snapshot, &pool)?;
            print_json(&effects)
        }
        Command::RecordResult {
            snapshot,
            match_id,
            winner,
            user,
        } => {
            let mut pool = open(&snapshot)?;
            let outcome = PoolEngine::new(pool.settings().clone()).record_result(
                pool.tournament(),
                &Actor::admin(user),
                &MatchId::new(match_id),
                &EntrantId::new(winner),
                Utc::now(),
            )?;
            pool.apply(&outcome.effects)?;
            save(&snapshot, &pool)?;
            print_json(&json!({
                "previous_winner": outcome.previous_winner,
                "voided": outcome.voided,
            }))
        }
    }
}

fn init(snapshot: &Path, field: &Path) -> Result<()> {
    let text = std::fs::read_to_string(field).map_err(|source| CliError::Io {
        path: field.display().to_string(),
        source,
    })?;
    let entrants: Vec<Entrant> = serde_json::from_str(&text)?;
    let fresh = PoolSnapshot::from_field(entrants, Some(Settings::from_env()))?;
    // Validate before writing so a bad field never produces a snapshot.
    fresh.clone().into_pool(Settings::default())?;
    save_snapshot_atomic(snapshot, &fresh)?;
    print_json(&json!({
        "snapshot": snapshot.display().to_string(),
        "matches": fresh.matches.len(),
    }))
}

fn open(path: &Path) -> Result<InMemoryPool> {
    Ok(load_snapshot(path)?.into_pool(Settings::from_env())?)
}

fn save(path: &Path, pool: &InMemoryPool) -> Result<()> {
    Ok(save_snapshot_atomic(path, &PoolSnapshot::from_pool(pool))?)
}

fn entry<'a>(pool: &'a InMemoryPool, id: &BracketId) -> Result<(&'a Bracket, &'a PickSet)> {
    let bracket = pool
        .bracket(id)
        .ok_or_else(|| CliError::UnknownBracket(id.clone()))?;
    let picks = pool
        .picks(id)
        .ok_or_else(|| CliError::UnknownBracket(id.clone()))?;
    Ok((bracket, picks))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
