use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::provider::CreationRecord;

/// Plot entity identifier.
pub type PlotId = u32;
/// Discord snowflake user identifier.
pub type UserId = u64;
/// Snowflake of the message tracking a plot under review.
pub type TrackingMessageId = u64;

/// An immutable lifecycle event scoped to one plot.
/// Every state change in a plot's review lifecycle is published as a PlotEvent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotEvent {
    pub id: Uuid,
    pub plot_id: PlotId,
    pub timestamp: DateTime<Utc>,
    pub kind: PlotEventKind,
}

/// The closed set of things that can happen to a plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlotEventKind {
    /// A plot was created (or re-created from abandonment, a "reclaim").
    Created(CreationRecord),
    /// The builder submitted the plot for review.
    Submitted,
    /// A reviewer acted on a submitted plot.
    Review(ReviewEvent),
    /// The plot left the active lifecycle.
    Closure(ClosureEvent),
    /// A prior transition was reversed.
    Undo(UndoEvent),
    /// An abandoned plot was reassigned to a new owner.
    Reclaimed { owner: UserId },
    /// Legacy outbound-notification channel; not part of the state machine.
    /// Suppression is a dispatch outcome, never a mutable flag on the event.
    Notification(NotificationKind),
}

/// Review decisions. Mutually exclusive; no shared state beyond the plot id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewEvent {
    Approved,
    Rejected,
    Feedback(String),
}

/// Ways a plot leaves the active lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureEvent {
    Abandoned(AbandonReason),
    Archived { owner: UserId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonReason {
    Inactive,
    Manual,
    CommandForced,
    SystemForced,
}

/// Each undo reverses exactly one prior transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndoEvent {
    UndoReview,
    UndoSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Direct,
    Channel,
}

/// Coarse classification used by the dispatch registry: a handler filtered
/// on a family receives every event kind in that family and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFamily {
    Creation,
    Submission,
    Review,
    Closure,
    Undo,
    Reclaim,
    Notification,
}

impl PlotEvent {
    pub fn new(plot_id: PlotId, kind: PlotEventKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            plot_id,
            timestamp: Utc::now(),
            kind,
        }
    }

    /// Owning-user id for the event kinds that carry one (archive, reclaim).
    /// Lets consumers read the owner without matching on the concrete kind.
    pub fn scoped_owner(&self) -> Option<UserId> {
        match &self.kind {
            PlotEventKind::Closure(ClosureEvent::Archived { owner }) => Some(*owner),
            PlotEventKind::Reclaimed { owner } => Some(*owner),
            _ => None,
        }
    }
}

impl PlotEventKind {
    /// The family this kind belongs to; total over the closed set.
    pub fn family(&self) -> EventFamily {
        match self {
            PlotEventKind::Created(_) => EventFamily::Creation,
            PlotEventKind::Submitted => EventFamily::Submission,
            PlotEventKind::Review(_) => EventFamily::Review,
            PlotEventKind::Closure(_) => EventFamily::Closure,
            PlotEventKind::Undo(_) => EventFamily::Undo,
            PlotEventKind::Reclaimed { .. } => EventFamily::Reclaim,
            PlotEventKind::Notification(_) => EventFamily::Notification,
        }
    }

    /// Stable leaf-variant name, used for exact-kind filtering and logging.
    pub fn name(&self) -> &'static str {
        match self {
            PlotEventKind::Created(_) => "created",
            PlotEventKind::Submitted => "submitted",
            PlotEventKind::Review(ReviewEvent::Approved) => "approved",
            PlotEventKind::Review(ReviewEvent::Rejected) => "rejected",
            PlotEventKind::Review(ReviewEvent::Feedback(_)) => "feedback",
            PlotEventKind::Closure(ClosureEvent::Abandoned(_)) => "abandoned",
            PlotEventKind::Closure(ClosureEvent::Archived { .. }) => "archived",
            PlotEventKind::Undo(UndoEvent::UndoReview) => "undo_review",
            PlotEventKind::Undo(UndoEvent::UndoSubmit) => "undo_submit",
            PlotEventKind::Reclaimed { .. } => "reclaimed",
            PlotEventKind::Notification(_) => "notification",
        }
    }
}

impl std::fmt::Display for PlotEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
