pub mod bus;
pub mod context;
pub mod error;
pub mod event;
pub mod provider;
pub mod state;
pub mod traits;

pub use bus::{DispatchOutcome, EventBus, EventFilter, Handled, Subscriber, SubscriptionId};
pub use context::PlotContext;
pub use error::PlotError;
pub use event::{
    AbandonReason, ClosureEvent, EventFamily, NotificationKind, PlotEvent, PlotEventKind, PlotId,
    ReviewEvent, TrackingMessageId, UndoEvent, UserId,
};
pub use provider::{CreationProvider, CreationRecord};
pub use state::{PlotStatus, StatusTag};
pub use traits::{Notifier, PlotRecord, PlotStore};
