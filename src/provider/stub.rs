//! In-process provider serving fixed mock data.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::FetchError;
use crate::models::snapshot::{Badge, GamificationSnapshot, StreakMultiplier, UserId};
use crate::provider::{SnapshotProvider, SnapshotScope};

const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/150";
const PLACEHOLDER_ICON: &str = "https://via.placeholder.com/32";

/// Mock provider. Every profile request gets the same figures with the
/// requested id echoed back; the session user is a fixed persona.
#[derive(Debug, Clone, Default)]
pub struct StubProvider {
    latency: Duration,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every response, imitating a slow backend.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn profile_snapshot(user_id: &UserId) -> GamificationSnapshot {
        GamificationSnapshot {
            user_id: Some(user_id.clone()),
            name: "Jane Doe".to_string(),
            department: None,
            avatar_url: Some(PLACEHOLDER_AVATAR.to_string()),
            total_points: 1234,
            total_command_executions: 42,
            streak_days: 5,
            streak_multiplier: StreakMultiplier::known(1.2),
            badges: [("1", "Beginner"), ("2", "Power User"), ("3", "Veteran")]
                .into_iter()
                .map(|(id, label)| Badge {
                    id: id.to_string(),
                    label: label.to_string(),
                    icon_url: PLACEHOLDER_ICON.to_string(),
                })
                .collect(),
            fetched_at: Utc::now(),
        }
    }

    pub fn session_snapshot() -> GamificationSnapshot {
        GamificationSnapshot {
            user_id: None,
            name: "Sarah Johnson".to_string(),
            department: Some("Engineering".to_string()),
            avatar_url: None,
            total_points: 2450,
            total_command_executions: 156,
            streak_days: 12,
            streak_multiplier: StreakMultiplier::known(2.5),
            badges: Vec::new(),
            fetched_at: Utc::now(),
        }
    }
}

#[async_trait]
impl SnapshotProvider for StubProvider {
    async fn get_snapshot(&self, scope: &SnapshotScope) -> Result<GamificationSnapshot, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(match scope {
            SnapshotScope::User(id) => Self::profile_snapshot(id),
            SnapshotScope::Session => Self::session_snapshot(),
        })
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn profile_echoes_requested_id() {
        let id = UserId::parse("42").unwrap();
        let snapshot = StubProvider::new()
            .get_snapshot(&SnapshotScope::User(id.clone()))
            .await
            .unwrap();
        assert_eq!(snapshot.user_id, Some(id));
        assert_eq!(snapshot.total_points, 1234);
        assert_eq!(snapshot.badges.len(), 3);
    }

    #[tokio::test]
    async fn session_is_the_dashboard_persona() {
        let snapshot = StubProvider::new()
            .get_snapshot(&SnapshotScope::Session)
            .await
            .unwrap();
        assert_eq!(snapshot.name, "Sarah Johnson");
        assert_eq!(snapshot.department.as_deref(), Some("Engineering"));
        assert_eq!(snapshot.streak_multiplier.value(), 2.5);
    }

    #[test]
    fn stub_multipliers_pass_validation() {
        let profile = StubProvider::profile_snapshot(&UserId::parse("u-1").unwrap());
        for multiplier in [profile.streak_multiplier, StubProvider::session_snapshot().streak_multiplier] {
            assert_eq!(StreakMultiplier::new(multiplier.value()), Ok(multiplier));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn latency_delays_the_response() {
        let provider = StubProvider::with_latency(Duration::from_millis(1000));
        let started = tokio::time::Instant::now();
        provider.get_snapshot(&SnapshotScope::Session).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
