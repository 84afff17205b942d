//! Snapshot model and the provider wire formats.

pub mod snapshot;
pub mod wire;
