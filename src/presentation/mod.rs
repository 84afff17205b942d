//! Rendering of view state: view trees, UI toggles, theme and HTML pages.

pub mod pages;
pub mod session;
pub mod theme;
pub mod ui;
pub mod view;
