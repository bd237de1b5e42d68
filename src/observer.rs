use anyhow::Result;
use serde::{Deserialize, Serialize};
use strum::FromRepr;

/// How the status bar renders the battery meter. Owned by the view layer; the
/// cache only relays changes to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, FromRepr, Default)]
pub enum DisplayMode {
    #[default]
    Icon,
    Circle,
    Text,
    Hidden,
}

/// A listener notified on every battery state, display mode, and show-percent
/// change. Errors are logged and counted by the cache, never propagated.
pub trait BatteryObserver {
    fn on_level_changed(&self, level: i32, plugged_in: bool) -> Result<()>;

    fn on_display_mode_changed(&self, _mode: DisplayMode) -> Result<()> {
        Ok(())
    }

    fn on_show_percent_changed(&self, _show_percent: bool) -> Result<()> {
        Ok(())
    }
}

/// Narrower listener kept for older consumers. Only ever sees level changes.
pub trait LegacyBatteryObserver {
    fn on_level_changed(&self, level: i32, plugged_in: bool) -> Result<()>;
}
