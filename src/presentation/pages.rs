//! Server-rendered HTML for the profile and dashboard screens.

use std::time::Instant;

use askama::Template;
use uuid::Uuid;

use crate::presentation::theme::{self, Theme};
use crate::presentation::ui::UiToggles;
use crate::presentation::view::{
    DashboardPanel, DashboardScreen, ErrorBanner, ProfilePanel, ProfileScreen,
};

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage {
    pub theme: &'static Theme,
    pub screen: ProfileScreen,
    pub view_id: Uuid,
    /// Base path of this view's form actions.
    pub actions: String,
    pub toast: Option<String>,
    /// Milliseconds until the toast hides itself.
    pub toast_ms: u128,
}

impl ProfilePage {
    pub fn new(screen: ProfileScreen, view_id: Uuid, ui: &UiToggles, now: Instant) -> Self {
        Self {
            theme: theme::current(),
            screen,
            view_id,
            actions: format!("/views/profile/{view_id}"),
            toast: ui.visible_toast(now).map(str::to_string),
            toast_ms: ui.toast_remaining(now).map_or(0, |left| left.as_millis()),
        }
    }

    fn banner(&self) -> Option<&ErrorBanner> {
        match &self.screen {
            ProfileScreen::Failure(banner) => Some(banner),
            _ => None,
        }
    }

    fn panel(&self) -> Option<&ProfilePanel> {
        match &self.screen {
            ProfileScreen::Ready(panel) => Some(panel),
            _ => None,
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub theme: &'static Theme,
    pub screen: DashboardScreen,
    pub view_id: Uuid,
    pub actions: String,
    pub drawer_open: bool,
}

impl DashboardPage {
    pub fn new(screen: DashboardScreen, view_id: Uuid, ui: &UiToggles) -> Self {
        Self {
            theme: theme::current(),
            screen,
            view_id,
            actions: format!("/views/dashboard/{view_id}"),
            drawer_open: ui.drawer_open(),
        }
    }

    fn banner(&self) -> Option<&ErrorBanner> {
        match &self.screen {
            DashboardScreen::Failure(banner) => Some(banner),
            _ => None,
        }
    }

    fn panel(&self) -> Option<&DashboardPanel> {
        match &self.screen {
            DashboardScreen::Ready(panel) => Some(panel),
            _ => None,
        }
    }
}
