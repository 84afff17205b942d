//! JSON bodies of the two provider endpoint variants.
//!
//! The variants disagree on naming: the profile endpoint says
//! `totalCommandsExecuted`, the session endpoint `totalCommandExecutions`.
//! Both map onto `GamificationSnapshot::total_command_executions`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::FetchError;
use crate::models::snapshot::{Badge, GamificationSnapshot, StreakMultiplier, UserId};

/// Badge entry as sent by `GET /user/{id}/gamification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgePayload {
    pub id: String,
    pub label: String,
    pub icon_url: String,
}

/// Body of `GET /user/{id}/gamification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub user_id: String,
    pub name: String,
    pub avatar_url: String,
    pub total_points: u64,
    pub streak_days: u32,
    pub streak_multiplier: f64,
    pub total_commands_executed: u64,
    pub badges: Vec<BadgePayload>,
}

/// Body of `GET /user/gamification` (session scoped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub name: String,
    pub department: String,
    pub total_points: u64,
    pub total_command_executions: u64,
    pub streak_days: u32,
    pub streak_multiplier: f64,
}

impl ProfilePayload {
    /// Normalize into a snapshot, checking that the provider answered for
    /// the user that was asked about.
    pub fn into_snapshot(self, requested: &UserId) -> Result<GamificationSnapshot, FetchError> {
        if self.user_id != requested.as_str() {
            return Err(FetchError::Invalid(format!(
                "provider returned snapshot for {}, expected {requested}",
                self.user_id
            )));
        }

        let badges: Vec<Badge> = self
            .badges
            .into_iter()
            .map(|b| Badge {
                id: b.id,
                label: b.label,
                icon_url: b.icon_url,
            })
            .collect();
        GamificationSnapshot::ensure_unique_badges(&badges)?;

        Ok(GamificationSnapshot {
            user_id: Some(requested.clone()),
            name: self.name,
            department: None,
            avatar_url: Some(self.avatar_url),
            total_points: self.total_points,
            total_command_executions: self.total_commands_executed,
            streak_days: self.streak_days,
            streak_multiplier: StreakMultiplier::new(self.streak_multiplier)?,
            badges,
            fetched_at: Utc::now(),
        })
    }

    /// Serve a snapshot in the profile variant's shape.
    pub fn from_snapshot(user_id: &UserId, snapshot: &GamificationSnapshot) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: snapshot.name.clone(),
            avatar_url: snapshot.avatar_url.clone().unwrap_or_default(),
            total_points: snapshot.total_points,
            streak_days: snapshot.streak_days,
            streak_multiplier: snapshot.streak_multiplier.value(),
            total_commands_executed: snapshot.total_command_executions,
            badges: snapshot
                .badges
                .iter()
                .map(|b| BadgePayload {
                    id: b.id.clone(),
                    label: b.label.clone(),
                    icon_url: b.icon_url.clone(),
                })
                .collect(),
        }
    }
}

impl SessionPayload {
    pub fn into_snapshot(self) -> Result<GamificationSnapshot, FetchError> {
        Ok(GamificationSnapshot {
            user_id: None,
            name: self.name,
            department: Some(self.department),
            avatar_url: None,
            total_points: self.total_points,
            total_command_executions: self.total_command_executions,
            streak_days: self.streak_days,
            streak_multiplier: StreakMultiplier::new(self.streak_multiplier)?,
            badges: Vec::new(),
            fetched_at: Utc::now(),
        })
    }

    /// Serve a snapshot in the session variant's shape.
    pub fn from_snapshot(snapshot: &GamificationSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            department: snapshot.department.clone().unwrap_or_default(),
            total_points: snapshot.total_points,
            total_command_executions: snapshot.total_command_executions,
            streak_days: snapshot.streak_days,
            streak_multiplier: snapshot.streak_multiplier.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile_json() -> serde_json::Value {
        json!({
            "userId": "u-1",
            "name": "Jane Doe",
            "avatarUrl": "https://via.placeholder.com/150",
            "totalPoints": 1234,
            "streakDays": 5,
            "streakMultiplier": 1.2,
            "totalCommandsExecuted": 42,
            "badges": [
                { "id": "1", "label": "Beginner", "iconUrl": "https://via.placeholder.com/32" },
                { "id": "2", "label": "Power User", "iconUrl": "https://via.placeholder.com/32" },
                { "id": "3", "label": "Veteran", "iconUrl": "https://via.placeholder.com/32" }
            ]
        })
    }

    #[test]
    fn profile_payload_maps_commands_executed() {
        let payload: ProfilePayload = serde_json::from_value(profile_json()).unwrap();
        let id = UserId::parse("u-1").unwrap();
        let snapshot = payload.into_snapshot(&id).unwrap();

        assert_eq!(snapshot.total_command_executions, 42);
        assert_eq!(snapshot.total_points, 1234);
        assert_eq!(snapshot.user_id, Some(id));
        let labels: Vec<&str> = snapshot.badges.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Beginner", "Power User", "Veteran"]);
    }

    #[test]
    fn profile_payload_for_other_user_is_rejected() {
        let payload: ProfilePayload = serde_json::from_value(profile_json()).unwrap();
        let err = payload
            .into_snapshot(&UserId::parse("u-2").unwrap())
            .unwrap_err();
        assert!(matches!(err, FetchError::Invalid(_)));
    }

    #[test]
    fn negative_points_fail_to_decode() {
        let mut body = profile_json();
        body["totalPoints"] = json!(-5);
        assert!(serde_json::from_value::<ProfilePayload>(body).is_err());
    }

    #[test]
    fn session_payload_maps_command_executions() {
        let payload: SessionPayload = serde_json::from_value(json!({
            "name": "Sarah Johnson",
            "department": "Engineering",
            "totalPoints": 2450,
            "totalCommandExecutions": 156,
            "streakDays": 12,
            "streakMultiplier": 2.5
        }))
        .unwrap();
        let snapshot = payload.into_snapshot().unwrap();

        assert_eq!(snapshot.total_command_executions, 156);
        assert_eq!(snapshot.department.as_deref(), Some("Engineering"));
        assert!(snapshot.user_id.is_none());
        assert!(snapshot.badges.is_empty());
    }

    #[test]
    fn session_payload_with_zero_multiplier_is_invalid() {
        let payload = SessionPayload {
            name: "x".into(),
            department: "y".into(),
            total_points: 0,
            total_command_executions: 0,
            streak_days: 0,
            streak_multiplier: 0.0,
        };
        assert!(payload.into_snapshot().is_err());
    }

    #[test]
    fn profile_payload_serializes_provider_field_names() {
        let payload: ProfilePayload = serde_json::from_value(profile_json()).unwrap();
        let id = UserId::parse("u-1").unwrap();
        let snapshot = payload.clone().into_snapshot(&id).unwrap();
        let value = serde_json::to_value(ProfilePayload::from_snapshot(&id, &snapshot)).unwrap();

        assert_eq!(value["totalCommandsExecuted"], 42);
        assert_eq!(value["badges"][1]["iconUrl"], "https://via.placeholder.com/32");
        assert!(value.get("totalCommandExecutions").is_none());
    }
}
