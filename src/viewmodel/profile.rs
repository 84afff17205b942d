//! Profile view model: one user's snapshot plus a local points counter.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::errors::{FetchError, ViewModelError};
use crate::models::snapshot::{GamificationSnapshot, UserId};
use crate::provider::{SnapshotProvider, SnapshotScope};
use crate::viewmodel::state::{
    spawn_fetch, Completion, FetchTicket, FetchTracker, Notification, PendingFetch, SettleFetch,
    ViewState,
};

pub const EARN_POINT_MESSAGE: &str = "+1 point!";

/// State machine for the profile page.
///
/// `AwaitingParameter -> Loading -> {Ready | Error}`. A new user id
/// re-enters `Loading` and supersedes any fetch in flight; `retry` is only
/// accepted from `Error`.
#[derive(Debug)]
pub struct ProfileViewModel {
    user_id: Option<UserId>,
    state: ViewState,
    tracker: FetchTracker<UserId>,
    toast_ttl: Duration,
}

impl ProfileViewModel {
    /// Mount the view. Returns the first fetch to run if the id is known.
    pub fn mount(user_id: Option<UserId>, toast_ttl: Duration) -> (Self, Option<FetchTicket<UserId>>) {
        let mut vm = Self {
            user_id: None,
            state: ViewState::AwaitingParameter,
            tracker: FetchTracker::new(),
            toast_ttl,
        };
        let ticket = match user_id {
            Some(id) => {
                vm.user_id = Some(id.clone());
                Some(vm.enter_loading(id))
            }
            None => None,
        };
        (vm, ticket)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn is_fetch_pending(&self) -> bool {
        self.tracker.is_pending()
    }

    /// React to the routing parameter changing.
    ///
    /// The same id again is a no-op. Losing the id drops back to
    /// `AwaitingParameter` and abandons the fetch in flight.
    pub fn set_user_id(
        &mut self,
        user_id: Option<UserId>,
    ) -> Result<Option<FetchTicket<UserId>>, ViewModelError> {
        if !self.tracker.is_mounted() {
            return Err(ViewModelError::Unmounted);
        }
        match user_id {
            None => {
                if self.user_id.take().is_some() {
                    tracing::debug!("User id unresolved, awaiting parameter");
                }
                self.tracker.cancel();
                self.state = ViewState::AwaitingParameter;
                Ok(None)
            }
            Some(id) if self.user_id.as_ref() == Some(&id) => Ok(None),
            Some(id) => {
                self.user_id = Some(id.clone());
                Ok(Some(self.enter_loading(id)))
            }
        }
    }

    /// Restart loading after a failure. No backoff and no attempt limit.
    pub fn retry(&mut self) -> Result<FetchTicket<UserId>, ViewModelError> {
        if !self.tracker.is_mounted() {
            return Err(ViewModelError::Unmounted);
        }
        if !matches!(self.state, ViewState::Error { .. }) {
            return Err(ViewModelError::RetryUnavailable);
        }
        let id = self.user_id.clone().ok_or(ViewModelError::RetryUnavailable)?;
        tracing::debug!(user_id = %id, "Retrying profile fetch");
        Ok(self.enter_loading(id))
    }

    /// Add one point locally. The snapshot stays untouched and nothing is
    /// sent to the provider.
    pub fn earn_point(&mut self) -> Result<Notification, ViewModelError> {
        if !self.tracker.is_mounted() {
            return Err(ViewModelError::Unmounted);
        }
        match &mut self.state {
            ViewState::Ready { local_points, .. } => {
                *local_points = local_points.saturating_add(1);
                Ok(Notification {
                    message: EARN_POINT_MESSAGE.to_string(),
                    ttl: self.toast_ttl,
                })
            }
            _ => Err(ViewModelError::NotReady),
        }
    }

    pub fn unmount(&mut self) {
        self.tracker.unmount();
    }

    fn enter_loading(&mut self, id: UserId) -> FetchTicket<UserId> {
        tracing::debug!(user_id = %id, "Loading profile snapshot");
        self.state = ViewState::Loading;
        self.tracker.begin(id)
    }
}

impl SettleFetch<UserId> for ProfileViewModel {
    fn complete(
        &mut self,
        ticket: &FetchTicket<UserId>,
        result: Result<GamificationSnapshot, FetchError>,
    ) -> Completion {
        let completion = self.tracker.settle(ticket);
        match completion {
            Completion::Applied => {
                if let Err(e) = &result {
                    tracing::warn!(user_id = %ticket.key(), error = %e, "Profile fetch failed");
                }
                self.state = ViewState::from_result(result);
            }
            Completion::Stale => {
                tracing::debug!(user_id = %ticket.key(), "Discarding stale profile response");
            }
            Completion::Detached => {
                tracing::debug!(user_id = %ticket.key(), "Profile unmounted, dropping response");
            }
        }
        completion
    }
}

/// Drives a [`ProfileViewModel`] against a provider on the tokio runtime.
#[derive(Clone)]
pub struct ProfileController {
    view_model: Arc<Mutex<ProfileViewModel>>,
    provider: Arc<dyn SnapshotProvider>,
}

impl ProfileController {
    /// Mount and, if the id is known, start fetching.
    pub fn mount(
        provider: Arc<dyn SnapshotProvider>,
        user_id: Option<UserId>,
        toast_ttl: Duration,
    ) -> (Self, Option<PendingFetch>) {
        let (vm, ticket) = ProfileViewModel::mount(user_id, toast_ttl);
        let controller = Self {
            view_model: Arc::new(Mutex::new(vm)),
            provider,
        };
        let pending = ticket.map(|t| controller.spawn(t));
        (controller, pending)
    }

    pub async fn navigate(&self, user_id: Option<UserId>) -> Result<Option<PendingFetch>, ViewModelError> {
        let ticket = self.view_model.lock().await.set_user_id(user_id)?;
        Ok(ticket.map(|t| self.spawn(t)))
    }

    pub async fn retry(&self) -> Result<PendingFetch, ViewModelError> {
        let ticket = self.view_model.lock().await.retry()?;
        Ok(self.spawn(ticket))
    }

    pub async fn earn_point(&self) -> Result<Notification, ViewModelError> {
        self.view_model.lock().await.earn_point()
    }

    pub async fn unmount(&self) {
        self.view_model.lock().await.unmount();
    }

    pub async fn state(&self) -> ViewState {
        self.view_model.lock().await.state().clone()
    }

    fn spawn(&self, ticket: FetchTicket<UserId>) -> PendingFetch {
        let scope = SnapshotScope::User(ticket.key().clone());
        spawn_fetch(self.view_model.clone(), self.provider.clone(), scope, ticket)
    }
}
