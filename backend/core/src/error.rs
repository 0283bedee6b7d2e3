use thiserror::Error;

use crate::state::PlotStatus;

/// Top-level error type for the PlotForge core.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("subscriber '{0}' declares no event handlers")]
    InvalidSubscriber(String),

    #[error("no creation provider registered")]
    ProviderNotRegistered,

    #[error("creation provider already registered")]
    ProviderAlreadyRegistered,

    #[error("no transition from {from:?} for event '{event}'")]
    UnknownTransition {
        from: PlotStatus,
        event: &'static str,
    },

    #[error("event '{event}' for untracked plot {plot_id}")]
    UntrackedPlot {
        plot_id: crate::event::PlotId,
        event: &'static str,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
