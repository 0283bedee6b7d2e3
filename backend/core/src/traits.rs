use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::event::{PlotId, TrackingMessageId, UserId};
use crate::state::PlotStatus;

/// Stored view of a plot, keyed by plot id and by its tracking message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotRecord {
    pub plot_id: PlotId,
    pub tracking_message_id: TrackingMessageId,
    pub owner: UserId,
    pub status: PlotStatus,
}

/// Read surface of the persistent plot store. Persistence itself is an
/// external collaborator; the core only needs these two lookups.
#[async_trait]
pub trait PlotStore: Send + Sync {
    async fn find_by_tracking_id(&self, id: TrackingMessageId) -> Result<Option<PlotRecord>>;

    async fn find_by_plot_id(&self, id: PlotId) -> Result<Option<PlotRecord>>;
}

/// Outbound human-readable notification channel. Formatting and delivery
/// live outside the core; listeners only push text through this seam.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, plot_id: PlotId, text: &str) -> Result<()>;
}
