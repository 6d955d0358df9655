//! Nullable event sink: captures approval events for assertions.

use permit_ledger::ApprovalEvent;
use std::sync::{Arc, Mutex};

/// Records every event delivered to its listeners.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<ApprovalEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener suitable for `ApprovalLedger::subscribe`.
    pub fn listener(&self) -> Box<dyn Fn(&ApprovalEvent) + Send + Sync> {
        let events = Arc::clone(&self.events);
        Box::new(move |event: &ApprovalEvent| {
            events.lock().unwrap().push(event.clone());
        })
    }

    /// Everything recorded so far, in delivery order.
    pub fn events(&self) -> Vec<ApprovalEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}
