use std::rc::Rc;

use anyhow::Result;

use crate::event::BroadcastEvent;

/// Receiver half of the host event bus seam.
pub trait EventSink {
    fn handle_event(&self, event: &BroadcastEvent);
}

/// The host's broadcast bus, behind a seam so the cache logic stays testable.
/// Sources deliver events synchronously on one logical context at a time.
pub trait EventSource {
    fn register(&mut self, sink: Rc<dyn EventSink>) -> Result<()>;

    fn unregister(&mut self, sink: &Rc<dyn EventSink>) -> Result<()>;
}

/// In-process source for tests and the simulator.
pub struct MockEventSource {
    sinks: Vec<Rc<dyn EventSink>>,
}

impl MockEventSource {
    pub fn new() -> MockEventSource {
        MockEventSource { sinks: Vec::new() }
    }

    pub fn emit(&self, event: &BroadcastEvent) {
        for sink in &self.sinks {
            sink.handle_event(event);
        }
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl Default for MockEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for MockEventSource {
    fn register(&mut self, sink: Rc<dyn EventSink>) -> Result<()> {
        self.sinks.push(sink);
        Ok(())
    }

    fn unregister(&mut self, sink: &Rc<dyn EventSink>) -> Result<()> {
        if let Some(i) = self.sinks.iter().position(|s| Rc::ptr_eq(s, sink)) {
            self.sinks.remove(i);
        }
        Ok(())
    }
}
