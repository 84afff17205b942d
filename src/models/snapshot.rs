//! Normalized gamification snapshot shared by every view.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::FetchError;

/// Opaque user identifier supplied by the caller. Never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Accept any non-blank identifier verbatim; blank means "not resolved
    /// yet".
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Awarded achievement marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub label: String,
    pub icon_url: String,
}

/// Positive scaling factor computed upstream.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct StreakMultiplier(f64);

impl StreakMultiplier {
    pub fn new(value: f64) -> Result<Self, FetchError> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(FetchError::Invalid(format!(
                "streak multiplier must be positive, got {value}"
            )))
        }
    }

    /// For literals known to be positive and finite.
    pub(crate) const fn known(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for StreakMultiplier {
    type Error = FetchError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StreakMultiplier> for f64 {
    fn from(m: StreakMultiplier) -> Self {
        m.0
    }
}

impl fmt::Display for StreakMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Point-in-time copy of a user's gamification metrics. Immutable once
/// fetched; the provider is the only source of the numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GamificationSnapshot {
    /// `None` for session-scoped snapshots, which do not echo an id.
    pub user_id: Option<UserId>,
    pub name: String,
    pub department: Option<String>,
    pub avatar_url: Option<String>,
    pub total_points: u64,
    pub total_command_executions: u64,
    pub streak_days: u32,
    pub streak_multiplier: StreakMultiplier,
    /// Display order is provider order.
    pub badges: Vec<Badge>,
    pub fetched_at: DateTime<Utc>,
}

impl GamificationSnapshot {
    /// Reject badge sequences that repeat an id.
    pub fn ensure_unique_badges(badges: &[Badge]) -> Result<(), FetchError> {
        let mut seen = HashSet::with_capacity(badges.len());
        for badge in badges {
            if !seen.insert(badge.id.as_str()) {
                return Err(FetchError::Invalid(format!(
                    "duplicate badge id {}",
                    badge.id
                )));
            }
        }
        Ok(())
    }
}
