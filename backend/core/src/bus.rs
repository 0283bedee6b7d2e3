//! Publish/subscribe event bus with an explicit dispatch registry.
//!
//! A subscriber is a named set of `(filter, callback)` handlers. Dispatch is
//! synchronous: every matching handler of every current subscriber runs, in
//! subscription order, before `dispatch` returns. A failing handler is logged
//! and skipped; it never aborts the fan-out or reaches the publisher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::error::PlotError;
use crate::event::{EventFamily, PlotEvent};

/// Selects which event kinds a handler receives.
///
/// `Any` matches every event; `Family` matches every kind in one family and
/// nothing from sibling families; `Kind` matches one leaf variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    Any,
    Family(EventFamily),
    Kind(&'static str),
}

impl EventFilter {
    fn matches(&self, event: &PlotEvent) -> bool {
        match self {
            EventFilter::Any => true,
            EventFilter::Family(family) => event.kind.family() == *family,
            EventFilter::Kind(name) => event.kind.name() == *name,
        }
    }
}

/// Handler verdict: `Suppress` marks the dispatch outcome as suppressed
/// (used by the outbound-notification path); it does not skip later handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Handled {
    #[default]
    Continue,
    Suppress,
}

type Callback = Box<dyn Fn(&PlotEvent) -> anyhow::Result<Handled> + Send + Sync>;

struct Handler {
    filter: EventFilter,
    callback: Callback,
}

/// A named set of event handlers, built once and handed to [`EventBus::subscribe`].
pub struct Subscriber {
    name: String,
    handlers: Vec<Handler>,
}

impl Subscriber {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    /// Add a handler for events matching `filter`.
    pub fn on<F>(mut self, filter: EventFilter, callback: F) -> Self
    where
        F: Fn(&PlotEvent) -> anyhow::Result<Handled> + Send + Sync + 'static,
    {
        self.handlers.push(Handler {
            filter,
            callback: Box::new(callback),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Handle identifying a live subscription; passed back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Registered {
    id: SubscriptionId,
    subscriber: Subscriber,
}

/// Aggregate result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// Handlers that ran to completion.
    pub delivered: usize,
    /// Handlers that returned an error (logged, not propagated).
    pub failed: usize,
    /// True when any handler asked for suppression.
    pub suppressed: bool,
}

/// The central event bus connecting PlotForge components.
///
/// Registration and dispatch may happen concurrently from any task. The
/// subscriber list is snapshotted at dispatch start, so `subscribe` and
/// `unsubscribe` never block on an in-flight fan-out; a subscriber added
/// mid-dispatch may or may not see that event.
pub struct EventBus {
    subscribers: RwLock<Vec<Arc<Registered>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a subscriber. Fails with [`PlotError::InvalidSubscriber`]
    /// when it declares no handlers; existing subscriptions are unaffected.
    pub fn subscribe(&self, subscriber: Subscriber) -> Result<SubscriptionId, PlotError> {
        if subscriber.handlers.is_empty() {
            return Err(PlotError::InvalidSubscriber(subscriber.name));
        }
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(
            subscriber = %subscriber.name,
            handlers = subscriber.handlers.len(),
            "subscriber registered"
        );
        self.subscribers
            .write()
            .unwrap()
            .push(Arc::new(Registered { id, subscriber }));
        Ok(id)
    }

    /// Remove a subscription by identity. Idempotent: returns whether a
    /// removal actually occurred.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write().unwrap();
        let before = subscribers.len();
        subscribers.retain(|registered| registered.id != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().unwrap().len()
    }

    /// Synchronously fan `event` out to every matching handler of every
    /// current subscriber, in subscription order. Handler errors are caught,
    /// logged with the subscriber name and handler index, and do not stop
    /// delivery to the remaining handlers. The caller keeps ownership of the
    /// event and can chain on the returned outcome.
    pub fn dispatch(&self, event: &PlotEvent) -> DispatchOutcome {
        // Snapshot under the read lock, invoke with no lock held.
        let snapshot: Vec<Arc<Registered>> = self.subscribers.read().unwrap().clone();

        let mut outcome = DispatchOutcome::default();
        for registered in &snapshot {
            for (index, handler) in registered.subscriber.handlers.iter().enumerate() {
                if !handler.filter.matches(event) {
                    continue;
                }
                match (handler.callback)(event) {
                    Ok(Handled::Continue) => outcome.delivered += 1,
                    Ok(Handled::Suppress) => {
                        outcome.delivered += 1;
                        outcome.suppressed = true;
                    }
                    Err(error) => {
                        outcome.failed += 1;
                        warn!(
                            subscriber = %registered.subscriber.name,
                            handler = index,
                            event = %event.kind,
                            plot_id = event.plot_id,
                            %error,
                            "event handler failed; continuing dispatch"
                        );
                    }
                }
            }
        }
        debug!(
            event = %event.kind,
            plot_id = event.plot_id,
            delivered = outcome.delivered,
            failed = outcome.failed,
            suppressed = outcome.suppressed,
            "event dispatched"
        );
        outcome
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
    use crate::event::{NotificationKind, PlotEventKind, ReviewEvent, UndoEvent};
    use std::sync::Mutex;

    fn submitted(plot_id: u32) -> PlotEvent {
        PlotEvent::new(plot_id, PlotEventKind::Submitted)
    }

    #[test]
    fn fan_out_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for n in 0..3 {
            let seen = seen.clone();
            bus.subscribe(Subscriber::new(format!("listener-{n}")).on(
                EventFilter::Any,
                move |_| {
                    seen.lock().unwrap().push(n);
                    Ok(Handled::Continue)
                },
            ))
            .unwrap();
        }

        let outcome = bus.dispatch(&submitted(1));
        assert_eq!(outcome.delivered, 3);
        assert_eq!(outcome.failed, 0);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn family_filter_excludes_siblings() {
        let bus = EventBus::new();
        let reviews = Arc::new(Mutex::new(0usize));
        let undos = Arc::new(Mutex::new(0usize));

        let r = reviews.clone();
        bus.subscribe(
            Subscriber::new("reviews").on(EventFilter::Family(EventFamily::Review), move |_| {
                *r.lock().unwrap() += 1;
                Ok(Handled::Continue)
            }),
        )
        .unwrap();
        let u = undos.clone();
        bus.subscribe(
            Subscriber::new("undos").on(EventFilter::Family(EventFamily::Undo), move |_| {
                *u.lock().unwrap() += 1;
                Ok(Handled::Continue)
            }),
        )
        .unwrap();

        bus.dispatch(&PlotEvent::new(
            1,
            PlotEventKind::Review(ReviewEvent::Approved),
        ));
        bus.dispatch(&PlotEvent::new(
            1,
            PlotEventKind::Review(ReviewEvent::Rejected),
        ));
        bus.dispatch(&PlotEvent::new(
            1,
            PlotEventKind::Undo(UndoEvent::UndoReview),
        ));

        assert_eq!(*reviews.lock().unwrap(), 2);
        assert_eq!(*undos.lock().unwrap(), 1);
    }

    #[test]
    fn kind_filter_matches_exact_variant() {
        let bus = EventBus::new();
        let hits = Arc::new(Mutex::new(0usize));
        let h = hits.clone();
        bus.subscribe(
            Subscriber::new("approvals-only").on(EventFilter::Kind("approved"), move |_| {
                *h.lock().unwrap() += 1;
                Ok(Handled::Continue)
            }),
        )
        .unwrap();

        bus.dispatch(&PlotEvent::new(
            1,
            PlotEventKind::Review(ReviewEvent::Approved),
        ));
        bus.dispatch(&PlotEvent::new(
            1,
            PlotEventKind::Review(ReviewEvent::Rejected),
        ));
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn empty_subscriber_is_rejected() {
        let bus = EventBus::new();
        let result = bus.subscribe(Subscriber::new("empty"));
        assert!(matches!(result, Err(PlotError::InvalidSubscriber(name)) if name == "empty"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn failing_handler_does_not_stop_dispatch() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = seen.clone();
        bus.subscribe(Subscriber::new("before").on(EventFilter::Any, move |_| {
            s.lock().unwrap().push("before");
            Ok(Handled::Continue)
        }))
        .unwrap();
        bus.subscribe(Subscriber::new("faulty").on(EventFilter::Any, |_| {
            anyhow::bail!("listener blew up")
        }))
        .unwrap();
        let s = seen.clone();
        bus.subscribe(Subscriber::new("after").on(EventFilter::Any, move |_| {
            s.lock().unwrap().push("after");
            Ok(Handled::Continue)
        }))
        .unwrap();

        let outcome = bus.dispatch(&submitted(1));
        assert_eq!(outcome.delivered, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(*seen.lock().unwrap(), vec!["before", "after"]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let bus = EventBus::new();
        let hits = Arc::new(Mutex::new(0usize));
        let h = hits.clone();
        let id = bus
            .subscribe(Subscriber::new("once").on(EventFilter::Any, move |_| {
                *h.lock().unwrap() += 1;
                Ok(Handled::Continue)
            }))
            .unwrap();

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.dispatch(&submitted(1));
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn suppression_sets_outcome_without_skipping_handlers() {
        let bus = EventBus::new();
        let later = Arc::new(Mutex::new(false));

        bus.subscribe(Subscriber::new("suppressor").on(
            EventFilter::Family(EventFamily::Notification),
            |_| Ok(Handled::Suppress),
        ))
        .unwrap();
        let l = later.clone();
        bus.subscribe(Subscriber::new("late-listener").on(
            EventFilter::Family(EventFamily::Notification),
            move |_| {
                *l.lock().unwrap() = true;
                Ok(Handled::Continue)
            },
        ))
        .unwrap();

        let outcome = bus.dispatch(&PlotEvent::new(
            1,
            PlotEventKind::Notification(NotificationKind::Direct),
        ));
        assert!(outcome.suppressed);
        assert_eq!(outcome.delivered, 2);
        assert!(*later.lock().unwrap());
    }

    #[test]
    fn subscribe_during_dispatch_does_not_deadlock() {
        // A handler registering a new subscriber must not block on the
        // list lock: dispatch iterates a snapshot, not the live list.
        let bus = Arc::new(EventBus::new());
        let inner = bus.clone();
        bus.subscribe(Subscriber::new("registrar").on(EventFilter::Any, move |_| {
            inner
                .subscribe(Subscriber::new("late").on(EventFilter::Any, |_| Ok(Handled::Continue)))
                .map(|_| Handled::Continue)
                .map_err(Into::into)
        }))
        .unwrap();

        let outcome = bus.dispatch(&submitted(1));
        assert_eq!(outcome.failed, 0);
        assert_eq!(bus.subscriber_count(), 2);
    }
}
