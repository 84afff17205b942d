//! View models: fetch lifecycle and local state, independent of rendering.

pub mod dashboard;
pub mod profile;
pub mod state;

pub use dashboard::{DashboardController, DashboardViewModel};
pub use profile::{ProfileController, ProfileViewModel};
pub use state::{Completion, FetchTicket, Notification, PendingFetch, ViewState};
