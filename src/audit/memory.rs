use parking_lot::Mutex;

use super::{AuditEvent, AuditSubscriber};

/// Keeps every delivered event in memory, in delivery order.
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemorySink {
    pub fn new() -> Self { Self::default() }

    pub fn events(&self) -> Vec<AuditEvent> { self.events.lock().clone() }

    pub fn messages(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.message.clone()).collect()
    }

    pub fn len(&self) -> usize { self.events.lock().len() }

    pub fn is_empty(&self) -> bool { self.events.lock().is_empty() }

    pub fn clear(&self) { self.events.lock().clear(); }
}

impl AuditSubscriber for MemorySink {
    fn name(&self) -> &str { "memory" }

    fn on_event(&self, event: &AuditEvent) -> anyhow::Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}
