//! View state and the fetch bookkeeping shared by both view models.
//!
//! A fetch is an explicit pending request: starting one hands out a
//! [`FetchTicket`], and the result is only applied if that ticket is still
//! the current one when it comes back. Tickets issued before a key change,
//! or before the view was unmounted, settle as no-ops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::errors::FetchError;
use crate::models::snapshot::GamificationSnapshot;
use crate::provider::{SnapshotProvider, SnapshotScope};

/// What a view currently shows. Exactly one variant at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// The identifying parameter has not resolved yet. Renders as loading.
    AwaitingParameter,
    Loading,
    Error { message: String },
    Ready {
        snapshot: GamificationSnapshot,
        /// Seeded from `snapshot.total_points`; only local actions move it.
        local_points: u64,
    },
}

impl ViewState {
    /// Loading and awaiting-parameter both show the progress indicator.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading | Self::AwaitingParameter)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn snapshot(&self) -> Option<&GamificationSnapshot> {
        match self {
            Self::Ready { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    pub fn local_points(&self) -> Option<u64> {
        match self {
            Self::Ready { local_points, .. } => Some(*local_points),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message } => Some(message),
            _ => None,
        }
    }

    /// State after a fetch settles.
    pub fn from_result(result: Result<GamificationSnapshot, FetchError>) -> Self {
        match result {
            Ok(snapshot) => Self::Ready {
                local_points: snapshot.total_points,
                snapshot,
            },
            Err(e) => Self::Error {
                message: e.to_string(),
            },
        }
    }
}

/// Handle for one fetch attempt, keyed by the parameter it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    generation: u64,
    key: K,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

/// How a settled fetch was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result became the view's state.
    Applied,
    /// A newer fetch superseded this one; the result was dropped.
    Stale,
    /// The view was unmounted first; nothing was touched.
    Detached,
}

/// Tracks the single current fetch of a view model.
#[derive(Debug)]
pub struct FetchTracker<K> {
    generation: u64,
    in_flight: Option<FetchTicket<K>>,
    mounted: bool,
}

impl<K: Clone + PartialEq> FetchTracker<K> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            in_flight: None,
            mounted: true,
        }
    }

    /// Start a fetch for `key`, superseding whatever was in flight.
    pub fn begin(&mut self, key: K) -> FetchTicket<K> {
        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            key,
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Decide whether a returning fetch may touch state. A ticket settles
    /// as `Applied` at most once.
    pub fn settle(&mut self, ticket: &FetchTicket<K>) -> Completion {
        if !self.mounted {
            return Completion::Detached;
        }
        if self.in_flight.as_ref() == Some(ticket) {
            self.in_flight = None;
            Completion::Applied
        } else {
            Completion::Stale
        }
    }

    /// Forget the in-flight fetch without starting another.
    pub fn cancel(&mut self) {
        self.in_flight = None;
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_key(&self) -> Option<&K> {
        self.in_flight.as_ref().map(|t| &t.key)
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.in_flight = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl<K: Clone + PartialEq> Default for FetchTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient "+1 point" event surfaced by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    /// How long the toast stays up unless dismissed earlier.
    pub ttl: Duration,
}

/// A view model that can receive fetch results.
pub trait SettleFetch<K>: Send + 'static {
    fn complete(
        &mut self,
        ticket: &FetchTicket<K>,
        result: Result<GamificationSnapshot, FetchError>,
    ) -> Completion;
}

/// A fetch running on the runtime.
#[derive(Debug)]
pub struct PendingFetch {
    handle: JoinHandle<Completion>,
}

impl PendingFetch {
    /// Wait for the fetch and report how its result was handled.
    pub async fn settled(self) -> Completion {
        match self.handle.await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::warn!(error = %e, "Fetch task did not finish");
                Completion::Detached
            }
        }
    }
}

/// Run `provider.get_snapshot(scope)` in the background and hand the result
/// to the view model under its lock.
pub fn spawn_fetch<V, K>(
    view_model: Arc<Mutex<V>>,
    provider: Arc<dyn SnapshotProvider>,
    scope: SnapshotScope,
    ticket: FetchTicket<K>,
) -> PendingFetch
where
    V: SettleFetch<K>,
    K: Send + Sync + 'static,
{
    let handle = tokio::spawn(async move {
        let result = provider.get_snapshot(&scope).await;
        view_model.lock().await.complete(&ticket, result)
    });
    PendingFetch { handle }
}
