use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::event::{PlotId, UserId};
use crate::state::PlotStatus;

/// Structured record describing a newly created plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreationRecord {
    pub owner: UserId,
    pub status: PlotStatus,
    /// Project / build-category tag the plot belongs to.
    pub project: String,
    /// Region code of the plot's location.
    pub region: String,
    /// Latitude/longitude pair of the plot anchor.
    pub coords: (f64, f64),
}

/// Resolves opaque creation input into a structured record.
///
/// Registered exactly once at startup on the [`crate::context::PlotContext`];
/// raw-input event construction before registration is a hard error.
pub trait CreationProvider: Send + Sync {
    /// Parse opaque raw input (e.g. a command argument blob) into a record.
    fn resolve_raw(&self, raw: &str) -> Result<CreationRecord>;

    /// Look up the creation record for an already known plot id.
    fn resolve_plot(&self, plot_id: PlotId) -> Result<CreationRecord>;
}
