//! Dashboard view model: the session user's read-only summary.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::errors::FetchError;
use crate::models::snapshot::GamificationSnapshot;
use crate::provider::{SnapshotProvider, SnapshotScope};
use crate::viewmodel::state::{
    spawn_fetch, Completion, FetchTicket, FetchTracker, PendingFetch, SettleFetch, ViewState,
};

/// Same lifecycle as the profile view, minus the id parameter and local
/// commands. Mounting always fetches. There is no retry: a failed
/// dashboard recovers by being mounted again.
#[derive(Debug)]
pub struct DashboardViewModel {
    state: ViewState,
    tracker: FetchTracker<()>,
}

impl DashboardViewModel {
    pub fn mount() -> (Self, FetchTicket<()>) {
        let mut tracker = FetchTracker::new();
        let ticket = tracker.begin(());
        tracing::debug!("Loading dashboard snapshot");
        (
            Self {
                state: ViewState::Loading,
                tracker,
            },
            ticket,
        )
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn unmount(&mut self) {
        self.tracker.unmount();
    }
}

impl SettleFetch<()> for DashboardViewModel {
    fn complete(
        &mut self,
        ticket: &FetchTicket<()>,
        result: Result<GamificationSnapshot, FetchError>,
    ) -> Completion {
        let completion = self.tracker.settle(ticket);
        match completion {
            Completion::Applied => {
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "Dashboard fetch failed");
                }
                self.state = ViewState::from_result(result);
            }
            Completion::Stale | Completion::Detached => {
                tracing::debug!(?completion, "Dropping dashboard response");
            }
        }
        completion
    }
}

/// Drives a [`DashboardViewModel`] against a provider.
#[derive(Clone)]
pub struct DashboardController {
    view_model: Arc<Mutex<DashboardViewModel>>,
}

impl DashboardController {
    /// Mount and start the unconditional session fetch.
    pub fn mount(provider: Arc<dyn SnapshotProvider>) -> (Self, PendingFetch) {
        let (vm, ticket) = DashboardViewModel::mount();
        let view_model = Arc::new(Mutex::new(vm));
        let pending = spawn_fetch(view_model.clone(), provider, SnapshotScope::Session, ticket);
        (Self { view_model }, pending)
    }

    pub async fn unmount(&self) {
        self.view_model.lock().await.unmount();
    }

    pub async fn state(&self) -> ViewState {
        self.view_model.lock().await.state().clone()
    }
}
