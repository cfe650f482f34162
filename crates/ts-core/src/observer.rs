//! Update broadcasting between controls and views

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

/// A value change broadcast by a control.
///
/// Subscribers match on the variant and silently ignore shapes they do not
/// handle, so one registry can carry scalar and range traffic side by side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlUpdate {
    /// Scalar control value.
    Point(f64),
    /// Range control values; publishers guarantee `start <= end`.
    Range { start: f64, end: f64 },
}

/// Receiving end of a subscription edge.
pub trait UpdateSubscriber: Send + Sync {
    fn on_update(&self, update: ControlUpdate) -> anyhow::Result<()>;
}

static NEXT_PUBLISHER_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    // Publisher ids currently delivering on this thread. The same id twice
    // means someone wired a subscription cycle.
    static ACTIVE_PUBLISHERS: RefCell<Vec<u64>> = RefCell::new(Vec::new());
}

/// Broadcasting end of subscription edges.
///
/// Holds weak handles only; a dropped subscriber is pruned on the next
/// publish. Delivery is synchronous and depth-first, in subscription order.
pub struct Publisher {
    id: u64,
    subscribers: RwLock<Vec<(usize, Weak<dyn UpdateSubscriber>)>>,
}

impl Publisher {
    pub fn new() -> Self {
        Self {
            id: NEXT_PUBLISHER_ID.fetch_add(1, Ordering::Relaxed),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Add a subscription edge.
    ///
    /// Subscribing the same subscriber twice keeps a single edge at its
    /// original position in the delivery order.
    pub fn subscribe<S>(&self, subscriber: &Arc<S>)
    where
        S: UpdateSubscriber + 'static,
    {
        let key = Arc::as_ptr(subscriber) as *const () as usize;
        let mut subscribers = self.subscribers.write();
        if subscribers.iter().any(|(existing, _)| *existing == key) {
            return;
        }
        let weak = Arc::downgrade(subscriber);
        let weak: Weak<dyn UpdateSubscriber> = weak;
        subscribers.push((key, weak));
    }

    /// Remove a subscription edge. Removing an absent subscriber is a no-op.
    pub fn unsubscribe<S>(&self, subscriber: &Arc<S>)
    where
        S: UpdateSubscriber + 'static,
    {
        let key = Arc::as_ptr(subscriber) as *const () as usize;
        self.subscribers
            .write()
            .retain(|(existing, _)| *existing != key);
    }

    /// Drop every subscription edge.
    pub fn clear(&self) {
        self.subscribers.write().clear();
    }

    /// Number of live subscription edges.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|(_, weak)| weak.strong_count() > 0);
        subscribers.len()
    }

    /// Broadcast `update` to every live subscriber, in subscription order.
    ///
    /// The live list is snapshotted before delivery, so subscribing or
    /// unsubscribing from inside a callback only affects later publishes.
    /// A failing subscriber is logged and skipped; the rest still receive
    /// the update.
    pub fn publish(&self, update: ControlUpdate) {
        let live: Vec<Arc<dyn UpdateSubscriber>> = {
            let mut subscribers = self.subscribers.write();
            subscribers.retain(|(_, weak)| weak.strong_count() > 0);
            subscribers
                .iter()
                .filter_map(|(_, weak)| weak.upgrade())
                .collect()
        };

        ACTIVE_PUBLISHERS.with(|stack| {
            debug_assert!(
                !stack.borrow().contains(&self.id),
                "subscription cycle: publisher {} re-entered during its own delivery",
                self.id
            );
            stack.borrow_mut().push(self.id);
        });

        for subscriber in &live {
            if let Err(err) = subscriber.on_update(update) {
                tracing::warn!("subscriber rejected update {:?}: {:#}", update, err);
            }
        }

        ACTIVE_PUBLISHERS.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<(&'static str, ControlUpdate)>>>,
    }

    impl Recorder {
        fn new(label: &'static str, log: &Arc<Mutex<Vec<(&'static str, ControlUpdate)>>>) -> Arc<Self> {
            Arc::new(Self {
                label,
                log: Arc::clone(log),
            })
        }
    }

    impl UpdateSubscriber for Recorder {
        fn on_update(&self, update: ControlUpdate) -> anyhow::Result<()> {
            self.log.lock().push((self.label, update));
            Ok(())
        }
    }

    struct Failing;

    impl UpdateSubscriber for Failing {
        fn on_update(&self, _update: ControlUpdate) -> anyhow::Result<()> {
            anyhow::bail!("refusing update")
        }
    }

    #[test]
    fn test_publish_reaches_subscribers_in_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = Recorder::new("first", &log);
        let second = Recorder::new("second", &log);

        let publisher = Publisher::new();
        publisher.subscribe(&first);
        publisher.subscribe(&second);
        publisher.publish(ControlUpdate::Point(3.0));

        let entries = log.lock().clone();
        assert_eq!(
            entries,
            vec![
                ("first", ControlUpdate::Point(3.0)),
                ("second", ControlUpdate::Point(3.0)),
            ]
        );
    }

    #[test]
    fn test_subscribe_same_arc_twice_keeps_one_edge() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder::new("only", &log);

        let publisher = Publisher::new();
        publisher.subscribe(&recorder);
        publisher.subscribe(&recorder);

        assert_eq!(publisher.subscriber_count(), 1);
        publisher.publish(ControlUpdate::Point(1.0));
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_unsubscribe_absent_subscriber_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let present = Recorder::new("present", &log);
        let stranger = Recorder::new("stranger", &log);

        let publisher = Publisher::new();
        publisher.subscribe(&present);
        publisher.unsubscribe(&stranger);

        assert_eq!(publisher.subscriber_count(), 1);
        publisher.unsubscribe(&present);
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let publisher = Publisher::new();

        let short_lived = Recorder::new("short", &log);
        publisher.subscribe(&short_lived);
        drop(short_lived);

        assert_eq!(publisher.subscriber_count(), 0);
        publisher.publish(ControlUpdate::Point(9.0));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_failing_subscriber_does_not_block_delivery() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let failing = Arc::new(Failing);
        let recorder = Recorder::new("after-failure", &log);

        let publisher = Publisher::new();
        publisher.subscribe(&failing);
        publisher.subscribe(&recorder);
        publisher.publish(ControlUpdate::Range { start: 1.0, end: 2.0 });

        assert_eq!(
            log.lock().clone(),
            vec![("after-failure", ControlUpdate::Range { start: 1.0, end: 2.0 })]
        );
    }

    struct SubscribesAnother {
        publisher: Arc<Publisher>,
        other: Arc<Recorder>,
    }

    impl UpdateSubscriber for SubscribesAnother {
        fn on_update(&self, _update: ControlUpdate) -> anyhow::Result<()> {
            self.publisher.subscribe(&self.other);
            Ok(())
        }
    }

    #[test]
    fn test_registry_changes_during_publish_take_effect_next_publish() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let publisher = Arc::new(Publisher::new());
        let late = Recorder::new("late", &log);
        let wiring = Arc::new(SubscribesAnother {
            publisher: Arc::clone(&publisher),
            other: Arc::clone(&late),
        });

        publisher.subscribe(&wiring);
        publisher.publish(ControlUpdate::Point(1.0));
        // The mid-publish subscription missed the in-flight update.
        assert!(log.lock().is_empty());

        publisher.publish(ControlUpdate::Point(2.0));
        assert_eq!(log.lock().clone(), vec![("late", ControlUpdate::Point(2.0))]);
    }

    struct Reentrant {
        publisher: Arc<Publisher>,
    }

    impl UpdateSubscriber for Reentrant {
        fn on_update(&self, update: ControlUpdate) -> anyhow::Result<()> {
            self.publisher.publish(update);
            Ok(())
        }
    }

    #[test]
    #[should_panic(expected = "subscription cycle")]
    fn test_reentrant_publish_is_caught_in_debug() {
        let publisher = Arc::new(Publisher::new());
        let reentrant = Arc::new(Reentrant {
            publisher: Arc::clone(&publisher),
        });
        publisher.subscribe(&reentrant);
        publisher.publish(ControlUpdate::Point(0.0));
    }
}
