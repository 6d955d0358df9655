//! Approval notifications for subscribers.

use permit_types::{Address, Amount, AssetId};
use serde::{Deserialize, Serialize};

/// One event per logical change to an approval count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalEvent {
    /// An approval was recorded.
    Granted {
        from: Address,
        to: Address,
        amount: Amount,
        asset: AssetId,
    },
    /// An approval was revoked or consumed by a transfer.
    Removed {
        from: Address,
        to: Address,
        amount: Amount,
        asset: AssetId,
    },
}

impl ApprovalEvent {
    pub fn granted(from: Address, to: Address, amount: Amount, asset: AssetId) -> Self {
        Self::Granted {
            from,
            to,
            amount,
            asset,
        }
    }

    pub fn removed(from: Address, to: Address, amount: Amount, asset: AssetId) -> Self {
        Self::Removed {
            from,
            to,
            amount,
            asset,
        }
    }
}

/// Synchronous fan-out event bus for approval events.
///
/// Listeners are invoked inline on the emitting thread, in subscription order.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&ApprovalEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&ApprovalEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &ApprovalEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn sample(kind: fn(Address, Address, Amount, AssetId) -> ApprovalEvent) -> ApprovalEvent {
        kind(
            Address::new([1; 20]),
            Address::new([2; 20]),
            Amount::new(10),
            AssetId::new(Address::new([9; 20])),
        )
    }

    #[test]
    fn every_listener_sees_the_same_stream() {
        let mut bus = EventBus::default();
        let sinks: Vec<Arc<Mutex<Vec<ApprovalEvent>>>> =
            (0..2).map(|_| Arc::new(Mutex::new(Vec::new()))).collect();
        for sink in &sinks {
            let sink = Arc::clone(sink);
            bus.subscribe(Box::new(move |event: &ApprovalEvent| {
                sink.lock().unwrap().push(event.clone());
            }));
        }
        assert_eq!(bus.listener_count(), 2);

        let granted = sample(ApprovalEvent::granted);
        let removed = sample(ApprovalEvent::removed);
        bus.emit(&granted);
        bus.emit(&removed);

        for sink in &sinks {
            assert_eq!(sink.lock().unwrap().as_slice(), &[granted.clone(), removed.clone()]);
        }
    }

    #[test]
    fn grant_and_removal_of_one_transfer_are_distinct() {
        let granted = sample(ApprovalEvent::granted);
        let removed = sample(ApprovalEvent::removed);
        assert_ne!(granted, removed);
        match removed {
            ApprovalEvent::Removed { amount, asset, .. } => {
                assert_eq!(amount, Amount::new(10));
                assert_eq!(asset, AssetId::new(Address::new([9; 20])));
            }
            other => panic!("expected a removal, got {other:?}"),
        }
    }

    #[test]
    fn listener_sees_events_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = Arc::clone(&seen);
        bus.subscribe(Box::new(move |event: &ApprovalEvent| {
            sink.lock().unwrap().push(event.clone());
        }));

        bus.emit(&sample(ApprovalEvent::granted));
        bus.emit(&sample(ApprovalEvent::removed));

        let seen = seen.lock().unwrap();
        assert!(matches!(seen[0], ApprovalEvent::Granted { .. }));
        assert!(matches!(seen[1], ApprovalEvent::Removed { .. }));
    }
}
