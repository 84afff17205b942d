//! Process-wide presentation settings, set once at startup.

use once_cell::sync::OnceCell;

static THEME: OnceCell<Theme> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub card_radius_px: u32,
    pub drawer_width_px: u32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#1976d2".to_string(),
            secondary: "#dc004e".to_string(),
            background: "#f5f5f5".to_string(),
            card_radius_px: 12,
            drawer_width_px: 240,
        }
    }
}

/// Install the theme. Only the first call wins; later calls return `false`.
pub fn init(theme: Theme) -> bool {
    let installed = THEME.set(theme).is_ok();
    if !installed {
        tracing::warn!("Theme already initialized, ignoring");
    }
    installed
}

/// The installed theme, or the default one if `init` never ran.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}
