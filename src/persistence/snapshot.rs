//! Snapshot persistence for the bracket pool.
//!
//! A snapshot is the whole pool as one JSON document: entrants, matches,
//! brackets, picks, optional settings and the admin audit log.
//!
//! # Atomic Writes
//!
//! Snapshots are written with write-to-temp-then-rename:
//! 1. Write to `<path>.tmp`
//! 2. fsync the file
//! 3. Rename to `<path>`
//! 4. fsync the directory
//!
//! Readers see either the old or the new snapshot, never a partial write.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::effects::AuditRecord;
use crate::pool::{ApplyError, InMemoryPool};
use crate::state::{FieldValidationError, build_matches};
use crate::types::{Bracket, Entrant, Match, Pick, Settings, Tournament, TournamentError};

/// Current schema version. Increment when making breaking changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema version mismatch.
    #[error("schema version mismatch: expected {expected}, got {got}")]
    SchemaMismatch { expected: u32, got: u32 },

    /// Entrants and matches do not form a consistent tournament.
    #[error("invalid tournament: {0}")]
    Tournament(#[from] TournamentError),

    #[error("invalid field: {0}")]
    Field(#[from] FieldValidationError),

    #[error("invalid pool: {0}")]
    Pool(#[from] ApplyError),
}

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Persisted pool snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Schema version for forward-compatible migrations.
    pub schema_version: u32,

    /// When this snapshot was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_at: Option<DateTime<Utc>>,

    pub entrants: Vec<Entrant>,

    pub matches: Vec<Match>,

    #[serde(default)]
    pub brackets: Vec<Bracket>,

    #[serde(default)]
    pub picks: Vec<Pick>,

    /// Pool settings. When absent, the caller's settings apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audit_log: Vec<AuditRecord>,
}

impl PoolSnapshot {
    /// A fresh pool for a full field: all 63 matches, no brackets yet.
    pub fn from_field(entrants: Vec<Entrant>, settings: Option<Settings>) -> Result<Self> {
        let matches = build_matches(&entrants)?;
        Ok(PoolSnapshot {
            schema_version: SCHEMA_VERSION,
            snapshot_at: Some(Utc::now()),
            entrants,
            matches,
            brackets: Vec::new(),
            picks: Vec::new(),
            settings,
            audit_log: Vec::new(),
        })
    }

    /// Captures a pool.
    pub fn from_pool(pool: &InMemoryPool) -> Self {
        let tournament = pool.tournament();
        let mut entrants: Vec<Entrant> = tournament.entrants().cloned().collect();
        entrants.sort_by(|a, b| (a.region, a.seed).cmp(&(b.region, b.seed)));

        let mut picks: Vec<Pick> = pool
            .entries()
            .flat_map(|(_, set)| set.iter().cloned())
            .collect();
        picks.sort_by(|a, b| a.id.cmp(&b.id));

        PoolSnapshot {
            schema_version: SCHEMA_VERSION,
            snapshot_at: Some(Utc::now()),
            entrants,
            matches: tournament.matches().to_vec(),
            brackets: pool.brackets().cloned().collect(),
            picks,
            settings: Some(pool.settings().clone()),
            audit_log: pool.audit_log().to_vec(),
        }
    }

    /// Builds the in-memory pool. `fallback` applies when the snapshot has no settings.
    pub fn into_pool(self, fallback: Settings) -> Result<InMemoryPool> {
        let tournament = Tournament::new(self.entrants, self.matches)?;
        let mut pool = InMemoryPool::new(tournament, self.settings.unwrap_or(fallback));
        for bracket in self.brackets {
            pool.add_bracket(bracket)?;
        }
        pool.load_picks(self.picks);
        pool.restore_audit_log(self.audit_log);
        Ok(pool)
    }
}

/// Parses a snapshot from JSON text, checking the schema version.
pub fn parse_snapshot(json: &str) -> Result<PoolSnapshot> {
    let snapshot: PoolSnapshot = serde_json::from_str(json)?;

    if snapshot.schema_version != SCHEMA_VERSION {
        return Err(SnapshotError::SchemaMismatch {
            expected: SCHEMA_VERSION,
            got: snapshot.schema_version,
        });
    }

    Ok(snapshot)
}

/// Loads a snapshot from disk.
///
/// # Errors
///
/// Returns an error if:
/// - The file doesn't exist or can't be read
/// - The JSON is malformed
/// - The schema version is incompatible
pub fn load_snapshot(path: &Path) -> Result<PoolSnapshot> {
    let text = std::fs::read_to_string(path)?;
    let snapshot = parse_snapshot(&text)?;
    debug!(
        path = %path.display(),
        matches = snapshot.matches.len(),
        brackets = snapshot.brackets.len(),
        "Loaded snapshot"
    );
    Ok(snapshot)
}

/// Saves a snapshot atomically to disk.
///
/// # Errors
///
/// Returns an error if any IO operation fails.
pub fn save_snapshot_atomic(path: &Path, snapshot: &PoolSnapshot) -> Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(snapshot)?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&tmp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
    }

    std::fs::rename(&tmp_path, path)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fsync_dir(parent)?;
    }

    info!(path = %path.display(), bytes = bytes.len(), "Saved snapshot");
    Ok(())
}

/// Syncs a directory so a rename inside it survives a crash.
fn fsync_dir(dir_path: &Path) -> io::Result<()> {
    File::open(dir_path)?.sync_all()
}
