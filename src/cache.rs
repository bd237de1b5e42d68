use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use log::{debug, error, trace};
use serde::{Deserialize, Serialize};

use crate::event::{BATTERY_CHANGED, BroadcastEvent};
use crate::observer::{BatteryObserver, DisplayMode, LegacyBatteryObserver};
use crate::source::{EventSink, EventSource};

/// Latest known battery state. Always the last processed battery-changed
/// event; no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatteryState {
    pub level: i32,
    pub plugged_in: bool,
}

/// Caches the battery level and charging flag pushed by the host event bus
/// and fans each update out to registered observers.
///
/// Single-threaded by contract: the source delivers events on one logical
/// context at a time, and every operation runs to completion synchronously.
/// Notification passes iterate a snapshot of the observer list, so observers
/// may add or remove observers mid-pass; mutations apply from the next pass.
pub struct BatteryStateCache {
    state: Cell<BatteryState>,
    observers: RefCell<Vec<Rc<dyn BatteryObserver>>>,
    legacy_observers: RefCell<Vec<Rc<dyn LegacyBatteryObserver>>>,
    subscribed: Cell<bool>,
    failed_notifications: Cell<u64>,
}

impl BatteryStateCache {
    pub fn new() -> BatteryStateCache {
        BatteryStateCache {
            state: Cell::new(BatteryState::default()),
            observers: RefCell::new(Vec::new()),
            legacy_observers: RefCell::new(Vec::new()),
            subscribed: Cell::new(false),
            failed_notifications: Cell::new(0),
        }
    }

    /// Begin receiving events from the source. A no-op if already subscribed.
    pub fn subscribe(self: &Rc<Self>, source: &mut dyn EventSource) -> Result<()> {
        if self.subscribed.get() {
            return Ok(());
        }
        let sink: Rc<dyn EventSink> = self.clone();
        source.register(sink)?;
        self.subscribed.set(true);
        Ok(())
    }

    /// Stop receiving events. A no-op if not subscribed.
    pub fn unsubscribe(self: &Rc<Self>, source: &mut dyn EventSource) -> Result<()> {
        if !self.subscribed.get() {
            return Ok(());
        }
        let sink: Rc<dyn EventSink> = self.clone();
        source.unregister(&sink)?;
        self.subscribed.set(false);
        Ok(())
    }

    pub fn add_observer(&self, observer: Rc<dyn BatteryObserver>) {
        self.observers.borrow_mut().push(observer);
    }

    /// Removes the first occurrence of `observer`, matched by identity. A
    /// no-op if it is not registered.
    pub fn remove_observer(&self, observer: &Rc<dyn BatteryObserver>) {
        let mut observers = self.observers.borrow_mut();
        if let Some(i) = observers.iter().position(|o| Rc::ptr_eq(o, observer)) {
            observers.remove(i);
        }
    }

    pub fn add_legacy_observer(&self, observer: Rc<dyn LegacyBatteryObserver>) {
        self.legacy_observers.borrow_mut().push(observer);
    }

    pub fn remove_legacy_observer(&self, observer: &Rc<dyn LegacyBatteryObserver>) {
        let mut observers = self.legacy_observers.borrow_mut();
        if let Some(i) = observers.iter().position(|o| Rc::ptr_eq(o, observer)) {
            observers.remove(i);
        }
    }

    pub fn level(&self) -> i32 {
        self.state.get().level
    }

    pub fn is_charging(&self) -> bool {
        self.state.get().plugged_in
    }

    pub fn state(&self) -> BatteryState {
        self.state.get()
    }

    /// Number of observer callbacks that returned an error so far.
    pub fn failed_notifications(&self) -> u64 {
        self.failed_notifications.get()
    }

    /// Relay a display mode change to primary observers. Legacy observers are
    /// not notified and the cached state is untouched.
    pub fn notify_display_mode_changed(&self, mode: DisplayMode) {
        let observers = self.observers.borrow().clone();
        for observer in &observers {
            if let Err(e) = observer.on_display_mode_changed(mode) {
                self.record_failure("display mode change", e);
            }
        }
    }

    /// Relay a show-percent toggle to primary observers only.
    pub fn notify_show_percent_changed(&self, show_percent: bool) {
        let observers = self.observers.borrow().clone();
        for observer in &observers {
            if let Err(e) = observer.on_show_percent_changed(show_percent) {
                self.record_failure("show percent change", e);
            }
        }
    }

    fn notify_level_changed(&self, level: i32, plugged_in: bool) {
        let observers = self.observers.borrow().clone();
        for observer in &observers {
            if let Err(e) = observer.on_level_changed(level, plugged_in) {
                self.record_failure("level change", e);
            }
        }

        let legacy = self.legacy_observers.borrow().clone();
        for observer in &legacy {
            if let Err(e) = observer.on_level_changed(level, plugged_in) {
                self.record_failure("level change", e);
            }
        }
    }

    fn record_failure(&self, what: &str, e: anyhow::Error) {
        error!("observer failed to handle {}: {:#}", what, e);
        self.failed_notifications
            .set(self.failed_notifications.get() + 1);
    }
}

impl EventSink for BatteryStateCache {
    fn handle_event(&self, event: &BroadcastEvent) {
        if event.kind != BATTERY_CHANGED {
            trace!("ignoring event kind {}", event.kind);
            return;
        }

        let level = event.level.unwrap_or(0);
        let status = event.status.unwrap_or_default();
        let plugged_in = status.is_plugged_in();

        self.state.set(BatteryState { level, plugged_in });
        debug!("battery changed: {}% ({})", level, status);

        self.notify_level_changed(level, plugged_in);
    }
}

impl Default for BatteryStateCache {
    fn default() -> Self {
        Self::new()
    }
}
