//! Lifecycle tracker: the bus consumer that keeps per-plot status in step
//! with the transition table and pushes human-readable notifications.
//!
//! The bus delivers unconditionally; legality lives here. An event outside
//! the table is rejected before any state change and logged, never panicked
//! on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use plotforge_core::{
    EventFilter, Handled, Notifier, PlotError, PlotEvent, PlotEventKind, PlotId, PlotStatus,
    ReviewEvent, Subscriber,
};

/// Tracks the review status of every plot it has seen.
pub struct LifecycleTracker {
    statuses: Mutex<HashMap<PlotId, PlotStatus>>,
    notifier: Arc<dyn Notifier>,
}

impl LifecycleTracker {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            statuses: Mutex::new(HashMap::new()),
            notifier,
        }
    }

    pub fn status_of(&self, plot_id: PlotId) -> Option<PlotStatus> {
        self.statuses.lock().unwrap().get(&plot_id).copied()
    }

    /// Apply one event against the transition table. Out-of-table events
    /// leave the status untouched and come back as errors; notifications are
    /// outside the state machine and are skipped outright.
    pub fn observe(&self, event: &PlotEvent) -> Result<(), PlotError> {
        if matches!(event.kind, PlotEventKind::Notification(_)) {
            return Ok(());
        }

        let mut statuses = self.statuses.lock().unwrap();
        let next = match statuses.get(&event.plot_id) {
            Some(current) => {
                current
                    .apply(&event.kind)
                    .ok_or(PlotError::UnknownTransition {
                        from: *current,
                        event: event.kind.name(),
                    })?
            }
            // First sight of a plot: only creation starts the lifecycle.
            None => match &event.kind {
                PlotEventKind::Created(_) => PlotStatus::OnGoing,
                _ => {
                    return Err(PlotError::UntrackedPlot {
                        plot_id: event.plot_id,
                        event: event.kind.name(),
                    })
                }
            },
        };
        statuses.insert(event.plot_id, next);
        drop(statuses);

        info!(
            plot_id = event.plot_id,
            event = %event.kind,
            status = ?next,
            "plot status updated"
        );
        self.send_notification(event, next);
        Ok(())
    }

    /// Review and closure outcomes are worth telling the owner about.
    /// Delivery is fire-and-forget; the notifier's failures are its own.
    fn send_notification(&self, event: &PlotEvent, status: PlotStatus) {
        let text = match &event.kind {
            PlotEventKind::Review(ReviewEvent::Feedback(note)) => {
                format!("reviewer feedback: {note}")
            }
            PlotEventKind::Review(_) => format!("review update: now {}", status.tag().label),
            PlotEventKind::Closure(_) => format!("plot closed: {}", status.tag().label),
            _ => return,
        };
        let notifier = Arc::clone(&self.notifier);
        let plot_id = event.plot_id;
        tokio::spawn(async move {
            if let Err(error) = notifier.notify(plot_id, &text).await {
                warn!(plot_id, %error, "lifecycle notification failed");
            }
        });
    }

    /// Bus subscription covering every event; transition failures surface
    /// through the bus's per-handler failure accounting.
    pub fn subscriber(self: &Arc<Self>) -> Subscriber {
        let tracker = Arc::clone(self);
        Subscriber::new("lifecycle-tracker").on(EventFilter::Any, move |event| {
            tracker.observe(event)?;
            Ok(Handled::Continue)
        })
    }
}
