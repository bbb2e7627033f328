//! Pool-wide configuration.
//!
//! `Settings` is an explicit value threaded into the calls that need it
//! (lock checks, scoring), never ambient state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

use super::round::Round;

/// Environment variable holding the lock deadline (RFC 3339).
pub const LOCK_AT_ENV: &str = "BRACKET_POOL_LOCK_AT";

/// Environment variable holding six comma-separated round weights, first round first.
pub const WEIGHTS_ENV: &str = "BRACKET_POOL_WEIGHTS";

/// Errors from parsing settings values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("expected {expected} round weights, got {got}")]
    WrongWeightCount { expected: usize, got: usize },

    #[error("invalid round weight '{0}'")]
    InvalidWeight(String),

    #[error("invalid lock timestamp '{0}'")]
    InvalidLockAt(String),
}

/// Points awarded for a correct pick, per round.
///
/// Serialized as a map from round code to weight (`{"R64": 1, ...}`). Rounds
/// missing from the map fall back to the default doubling table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringWeights(BTreeMap<Round, u32>);

impl ScoringWeights {
    /// The default table: 1, 2, 4, 8, 16, 32.
    pub fn doubling() -> Self {
        ScoringWeights(
            Round::ALL
                .iter()
                .map(|&r| (r, Self::default_weight(r)))
                .collect(),
        )
    }

    pub fn from_rounds(weights: [u32; 6]) -> Self {
        ScoringWeights(Round::ALL.iter().copied().zip(weights).collect())
    }

    /// Parses `"1,2,4,8,16,32"`.
    pub fn parse_list(s: &str) -> Result<Self, SettingsError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != Round::ALL.len() {
            return Err(SettingsError::WrongWeightCount {
                expected: Round::ALL.len(),
                got: parts.len(),
            });
        }
        let mut weights = [0u32; 6];
        for (slot, part) in weights.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| SettingsError::InvalidWeight(part.to_string()))?;
        }
        Ok(Self::from_rounds(weights))
    }

    pub fn weight(&self, round: Round) -> u32 {
        self.0
            .get(&round)
            .copied()
            .unwrap_or_else(|| Self::default_weight(round))
    }

    fn default_weight(round: Round) -> u32 {
        1 << round.index()
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::doubling()
    }
}

/// A date range (inclusive) during which a round is being played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundWindow {
    pub round: Round,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// The pool's settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// After this instant ordinary participants may no longer change picks.
    pub lock_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub weights: ScoringWeights,

    /// Play windows per round, checked in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<RoundWindow>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lock_at(mut self, lock_at: DateTime<Utc>) -> Self {
        self.lock_at = Some(lock_at);
        self
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_schedule(mut self, schedule: Vec<RoundWindow>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Creates `Settings` from the process environment.
    ///
    /// Reads `BRACKET_POOL_LOCK_AT` and `BRACKET_POOL_WEIGHTS`. Missing or
    /// unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Settings::from_env`], reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Settings::new();

        if let Some(raw) = lookup(LOCK_AT_ENV) {
            match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(at) => settings.lock_at = Some(at.with_timezone(&Utc)),
                Err(_) => warn!(
                    value = %raw,
                    error = %SettingsError::InvalidLockAt(raw.clone()),
                    "Ignoring {}", LOCK_AT_ENV
                ),
            }
        }

        if let Some(raw) = lookup(WEIGHTS_ENV) {
            match ScoringWeights::parse_list(&raw) {
                Ok(weights) => settings.weights = weights,
                Err(error) => warn!(value = %raw, %error, "Ignoring {}", WEIGHTS_ENV),
            }
        }

        settings
    }

    /// Returns true once `now` is past the lock deadline. No deadline means never locked.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_at.is_some_and(|lock_at| now > lock_at)
    }

    /// The round being played on `date`, per the schedule.
    ///
    /// Dates outside every window (including before the tournament) report the first round.
    pub fn current_round(&self, date: NaiveDate) -> Round {
        self.schedule
            .iter()
            .find(|w| w.start <= date && date <= w.end)
            .map(|w| w.round)
            .unwrap_or(Round::R64)
    }
}
