#![deny(clippy::all, unsafe_op_in_unsafe_fn)]
#![warn(rust_2018_idioms)]

pub mod cache;
pub mod event;
pub mod observer;
pub mod source;

pub use cache::{BatteryState, BatteryStateCache};
pub use event::{BroadcastEvent, ChargeStatus, BATTERY_CHANGED};
pub use observer::{BatteryObserver, DisplayMode, LegacyBatteryObserver};
pub use source::{EventSink, EventSource, MockEventSource};
