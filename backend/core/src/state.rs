use serde::{Deserialize, Serialize};

use crate::event::{ClosureEvent, PlotEventKind, ReviewEvent, UndoEvent};

/// Review lifecycle states of a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotStatus {
    OnGoing,
    Finished,
    Approved,
    Rejected,
    Archived,
    Abandoned,
}

/// Presentation tag for a status (embed label and accent color).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTag {
    pub label: &'static str,
    pub color: u32,
}

impl PlotStatus {
    /// Lifecycle transition table. Returns the next status, or `None` when
    /// the event is not applicable to `self`. The bus never consults this;
    /// delivery is unconditional and legality is the publisher's concern.
    ///
    /// `Feedback` is a self-transition on approved/rejected plots.
    /// `Created` on an abandoned plot is a reclaim back to on-going.
    pub fn apply(self, event: &PlotEventKind) -> Option<PlotStatus> {
        use PlotStatus::*;
        match (self, event) {
            (OnGoing, PlotEventKind::Submitted) => Some(Finished),
            (Finished, PlotEventKind::Undo(UndoEvent::UndoSubmit)) => Some(OnGoing),
            (Finished, PlotEventKind::Review(ReviewEvent::Approved)) => Some(Approved),
            (Finished, PlotEventKind::Review(ReviewEvent::Rejected)) => Some(Rejected),
            (Approved | Rejected, PlotEventKind::Undo(UndoEvent::UndoReview)) => Some(Finished),
            (Approved | Rejected, PlotEventKind::Review(ReviewEvent::Feedback(_))) => Some(self),
            (Approved, PlotEventKind::Closure(ClosureEvent::Archived { .. })) => Some(Archived),
            (
                OnGoing | Finished | Approved | Rejected,
                PlotEventKind::Closure(ClosureEvent::Abandoned(_)),
            ) => Some(Abandoned),
            (Abandoned, PlotEventKind::Created(_)) => Some(OnGoing),
            (Abandoned, PlotEventKind::Reclaimed { .. }) => Some(OnGoing),
            _ => None,
        }
    }

    pub fn tag(self) -> StatusTag {
        match self {
            PlotStatus::OnGoing => StatusTag { label: "On-Going", color: 0xF5A623 },
            PlotStatus::Finished => StatusTag { label: "Finished", color: 0x3498DB },
            PlotStatus::Approved => StatusTag { label: "Approved", color: 0x2ECC71 },
            PlotStatus::Rejected => StatusTag { label: "Rejected", color: 0xE74C3C },
            PlotStatus::Archived => StatusTag { label: "Archived", color: 0x95A5A6 },
            PlotStatus::Abandoned => StatusTag { label: "Abandoned", color: 0x7F8C8D },
        }
    }
}
