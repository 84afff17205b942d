//! Pure mapping from view state to what each page shows.

use crate::models::snapshot::GamificationSnapshot;
use crate::viewmodel::ViewState;

pub const PROFILE_ERROR_HEADLINE: &str = "Failed to load user profile.";
pub const DASHBOARD_ERROR_HEADLINE: &str = "Failed to load user data";

/// The four statistics, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    Points,
    CommandExecutions,
    StreakDays,
    StreakMultiplier,
}

impl StatKind {
    pub const ORDER: [StatKind; 4] = [
        StatKind::Points,
        StatKind::CommandExecutions,
        StatKind::StreakDays,
        StatKind::StreakMultiplier,
    ];

    pub fn title(self) -> &'static str {
        match self {
            StatKind::Points => "Total Points",
            StatKind::CommandExecutions => "Command Executions",
            StatKind::StreakDays => "Streak Days",
            StatKind::StreakMultiplier => "Streak Multiplier",
        }
    }

    /// Theme palette slot used for the tile icon.
    pub fn accent(self) -> &'static str {
        match self {
            StatKind::Points => "primary",
            StatKind::CommandExecutions => "secondary",
            StatKind::StreakDays => "warning",
            StatKind::StreakMultiplier => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatTile {
    pub kind: StatKind,
    pub title: &'static str,
    pub value: String,
}

/// Tiles for a snapshot. `points` is passed separately so the profile can
/// show its local counter.
pub fn stat_tiles(snapshot: &GamificationSnapshot, points: u64) -> [StatTile; 4] {
    StatKind::ORDER.map(|kind| StatTile {
        kind,
        title: kind.title(),
        value: match kind {
            StatKind::Points => points.to_string(),
            StatKind::CommandExecutions => snapshot.total_command_executions.to_string(),
            StatKind::StreakDays => snapshot.streak_days.to_string(),
            StatKind::StreakMultiplier => snapshot.streak_multiplier.to_string(),
        },
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub name: String,
    pub descriptor: Option<String>,
    pub avatar_url: Option<String>,
}

impl Identity {
    fn from_snapshot(snapshot: &GamificationSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            descriptor: snapshot.department.clone(),
            avatar_url: snapshot.avatar_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadgeTile {
    pub id: String,
    pub label: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBanner {
    pub headline: &'static str,
    pub message: String,
    /// Whether a retry action is offered.
    pub retry: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePanel {
    pub identity: Identity,
    pub tiles: [StatTile; 4],
    pub badges: Vec<BadgeTile>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileScreen {
    Progress,
    Failure(ErrorBanner),
    Ready(ProfilePanel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub active: bool,
}

pub fn sidebar() -> Vec<NavItem> {
    ["Overview", "Analytics", "Profile", "Settings"]
        .into_iter()
        .map(|label| NavItem {
            label,
            active: label == "Overview",
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPanel {
    pub greeting: String,
    pub subtitle: &'static str,
    pub identity: Identity,
    pub tiles: [StatTile; 4],
    pub nav: Vec<NavItem>,
    pub notification_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardScreen {
    Progress,
    Failure(ErrorBanner),
    Ready(DashboardPanel),
}

pub fn render_profile(state: &ViewState) -> ProfileScreen {
    match state {
        ViewState::AwaitingParameter | ViewState::Loading => ProfileScreen::Progress,
        ViewState::Error { message } => ProfileScreen::Failure(ErrorBanner {
            headline: PROFILE_ERROR_HEADLINE,
            message: message.clone(),
            retry: true,
        }),
        ViewState::Ready {
            snapshot,
            local_points,
        } => ProfileScreen::Ready(ProfilePanel {
            identity: Identity::from_snapshot(snapshot),
            tiles: stat_tiles(snapshot, *local_points),
            badges: snapshot
                .badges
                .iter()
                .map(|b| BadgeTile {
                    id: b.id.clone(),
                    label: b.label.clone(),
                    icon_url: b.icon_url.clone(),
                })
                .collect(),
        }),
    }
}

pub fn render_dashboard(state: &ViewState) -> DashboardScreen {
    match state {
        ViewState::AwaitingParameter | ViewState::Loading => DashboardScreen::Progress,
        ViewState::Error { message } => DashboardScreen::Failure(ErrorBanner {
            headline: DASHBOARD_ERROR_HEADLINE,
            message: message.clone(),
            retry: false,
        }),
        ViewState::Ready { snapshot, .. } => {
            let name = if snapshot.name.trim().is_empty() {
                "User"
            } else {
                snapshot.name.as_str()
            };
            DashboardScreen::Ready(DashboardPanel {
                greeting: format!("Welcome back, {name}"),
                subtitle: "Here's your performance overview",
                identity: Identity::from_snapshot(snapshot),
                tiles: stat_tiles(snapshot, snapshot.total_points),
                nav: sidebar(),
                notification_count: 4,
            })
        }
    }
}
