//! Mounted page views kept between requests.
//!
//! A page mount creates a controller plus its own `UiToggles` and files
//! them under a random view id. Form posts carrying that id drive the same
//! controller, so local points and the toast survive the round trip.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::presentation::ui::UiToggles;
use crate::viewmodel::{DashboardController, ProfileController};

struct Entry<S> {
    view: Arc<tokio::sync::Mutex<S>>,
    last_seen: Instant,
}

/// Mounted views of one kind, keyed by view id.
pub struct ViewSessions<S> {
    views: Arc<Mutex<HashMap<Uuid, Entry<S>>>>,
}

impl<S> Clone for ViewSessions<S> {
    fn clone(&self) -> Self {
        Self {
            views: Arc::clone(&self.views),
        }
    }
}

impl<S> Default for ViewSessions<S> {
    fn default() -> Self {
        Self {
            views: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<S> ViewSessions<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, view: S) -> (Uuid, Arc<tokio::sync::Mutex<S>>) {
        let id = Uuid::new_v4();
        let view = Arc::new(tokio::sync::Mutex::new(view));
        let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        views.insert(
            id,
            Entry {
                view: Arc::clone(&view),
                last_seen: Instant::now(),
            },
        );
        (id, view)
    }

    /// Look up a view and mark it as used.
    pub fn get(&self, id: &Uuid) -> Option<Arc<tokio::sync::Mutex<S>>> {
        let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        views.get_mut(id).map(|entry| {
            entry.last_seen = Instant::now();
            Arc::clone(&entry.view)
        })
    }

    /// Remove views idle for at least `idle` as of `now` and hand them back
    /// so the caller can unmount them.
    pub fn purge_idle(&self, idle: Duration, now: Instant) -> Vec<Arc<tokio::sync::Mutex<S>>> {
        let mut views = self.views.lock().unwrap_or_else(|e| e.into_inner());
        let expired: Vec<Uuid> = views
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.last_seen) >= idle)
            .map(|(id, _)| *id)
            .collect();
        let purged: Vec<_> = expired
            .iter()
            .filter_map(|id| views.remove(id))
            .map(|entry| entry.view)
            .collect();
        if !purged.is_empty() {
            tracing::debug!(purged = purged.len(), "Purged idle views");
        }
        purged
    }
}

/// A mounted profile page.
pub struct ProfileSession {
    pub controller: ProfileController,
    pub ui: UiToggles,
    /// Request path the page was last rendered at, already URL-encoded.
    page_path: String,
}

impl ProfileSession {
    pub fn new(controller: ProfileController, page_path: impl Into<String>) -> Self {
        Self {
            controller,
            ui: UiToggles::new(),
            page_path: page_path.into(),
        }
    }

    pub fn set_page_path(&mut self, page_path: impl Into<String>) {
        self.page_path = page_path.into();
    }

    /// Where a form post on this view redirects to.
    pub fn return_path(&self, view_id: &Uuid) -> String {
        format!("{}?view={}", self.page_path, view_id)
    }
}

/// A mounted dashboard page.
pub struct DashboardSession {
    pub controller: DashboardController,
    pub ui: UiToggles,
}

impl DashboardSession {
    pub fn new(controller: DashboardController) -> Self {
        Self {
            controller,
            ui: UiToggles::new(),
        }
    }

    pub fn return_path(view_id: &Uuid) -> String {
        format!("/?view={view_id}")
    }
}
