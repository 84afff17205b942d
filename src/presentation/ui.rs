//! Presentation-only toggles: navigation drawer and the earn-point toast.
//!
//! Never shared with a view model. A fresh `UiToggles` (drawer closed,
//! no toast) is created on every mount.

use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::viewmodel::Notification;

/// Why the toast is being closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DismissReason {
    /// Click outside the toast. Ignored.
    ClickAway,
    CloseButton,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveToast {
    message: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiToggles {
    drawer_open: bool,
    toast: Option<ActiveToast>,
}

impl UiToggles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawer_open(&self) -> bool {
        self.drawer_open
    }

    pub fn toggle_drawer(&mut self) {
        self.drawer_open = !self.drawer_open;
    }

    /// Show a notification; a newer one replaces the current toast and
    /// restarts its timer.
    pub fn show(&mut self, notification: &Notification, now: Instant) {
        self.toast = Some(ActiveToast {
            message: notification.message.clone(),
            expires_at: now + notification.ttl,
        });
    }

    /// Toast text if it is still up at `now`.
    pub fn visible_toast(&self, now: Instant) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|t| now < t.expires_at)
            .map(|t| t.message.as_str())
    }

    /// Time left before the visible toast hides itself.
    pub fn toast_remaining(&self, now: Instant) -> Option<Duration> {
        self.toast
            .as_ref()
            .map(|t| t.expires_at.saturating_duration_since(now))
            .filter(|left| !left.is_zero())
    }

    pub fn dismiss(&mut self, reason: DismissReason) {
        if reason == DismissReason::ClickAway {
            return;
        }
        self.toast = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn note() -> Notification {
        Notification {
            message: "+1 point!".to_string(),
            ttl: Duration::from_millis(3000),
        }
    }

    #[test]
    fn starts_closed_and_hidden() {
        let ui = UiToggles::new();
        assert!(!ui.drawer_open());
        assert!(ui.visible_toast(Instant::now()).is_none());
    }

    #[test]
    fn drawer_toggles() {
        let mut ui = UiToggles::new();
        ui.toggle_drawer();
        assert!(ui.drawer_open());
        ui.toggle_drawer();
        assert!(!ui.drawer_open());
    }

    #[test]
    fn toast_expires_after_ttl() {
        let mut ui = UiToggles::new();
        let now = Instant::now();
        ui.show(&note(), now);

        assert_eq!(ui.visible_toast(now + Duration::from_millis(2999)), Some("+1 point!"));
        assert!(ui.visible_toast(now + Duration::from_millis(3000)).is_none());
        assert_eq!(
            ui.toast_remaining(now + Duration::from_millis(1000)),
            Some(Duration::from_millis(2000))
        );
        assert!(ui.toast_remaining(now + Duration::from_millis(3000)).is_none());
    }

    #[test]
    fn click_away_keeps_toast_close_button_hides_it() {
        let mut ui = UiToggles::new();
        let now = Instant::now();
        ui.show(&note(), now);

        ui.dismiss(DismissReason::ClickAway);
        assert!(ui.visible_toast(now).is_some());

        ui.dismiss(DismissReason::CloseButton);
        assert!(ui.visible_toast(now).is_none());
    }

    #[test]
    fn dismiss_reason_reads_form_values() {
        let reason: DismissReason = serde_json::from_str("\"close-button\"").unwrap();
        assert_eq!(reason, DismissReason::CloseButton);
        let reason: DismissReason = serde_json::from_str("\"click-away\"").unwrap();
        assert_eq!(reason, DismissReason::ClickAway);
    }

    #[test]
    fn new_toast_restarts_timer() {
        let mut ui = UiToggles::new();
        let start = Instant::now();
        ui.show(&note(), start);
        ui.show(&note(), start + Duration::from_millis(2000));
        assert!(ui.visible_toast(start + Duration::from_millis(4000)).is_some());
    }
}
