use anyhow::Result;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of the only broadcast this crate reacts to.
pub const BATTERY_CHANGED: &str = "BATTERY_CHANGED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ChargeStatus {
    #[default]
    Unknown,
    Charging,
    Discharging,
    NotCharging,
    Full,
}

impl ChargeStatus {
    /// The battery is drawing external power only while charging or full.
    pub fn is_plugged_in(self) -> bool {
        matches!(self, ChargeStatus::Charging | ChargeStatus::Full)
    }
}

/// A raw broadcast from the host event bus. Only `kind` is guaranteed to be
/// present; missing fields take their defaults when the event is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastEvent {
    pub kind: String,
    #[serde(default)]
    pub level: Option<i32>,
    #[serde(default)]
    pub status: Option<ChargeStatus>,
}

impl BroadcastEvent {
    pub fn new(kind: impl Into<String>) -> BroadcastEvent {
        BroadcastEvent {
            kind: kind.into(),
            level: None,
            status: None,
        }
    }

    pub fn battery_changed(level: i32, status: ChargeStatus) -> BroadcastEvent {
        BroadcastEvent {
            kind: BATTERY_CHANGED.to_string(),
            level: Some(level),
            status: Some(status),
        }
    }

    pub fn from_json(json: &str) -> Result<BroadcastEvent> {
        Ok(serde_json::from_str(json)?)
    }
}
