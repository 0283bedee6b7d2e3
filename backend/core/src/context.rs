use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::bus::EventBus;
use crate::error::PlotError;
use crate::event::{PlotEvent, PlotEventKind, PlotId};
use crate::provider::{CreationProvider, CreationRecord};

/// Runtime context constructed once at startup and handed to every component
/// that publishes or subscribes. Owns the event bus and the set-once
/// creation provider slot; there are no process-wide statics.
pub struct PlotContext {
    bus: EventBus,
    provider: OnceLock<Arc<dyn CreationProvider>>,
}

impl PlotContext {
    pub fn new() -> Self {
        Self {
            bus: EventBus::new(),
            provider: OnceLock::new(),
        }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Register the creation provider. May be called exactly once.
    pub fn register_provider(&self, provider: Arc<dyn CreationProvider>) -> Result<(), PlotError> {
        self.provider
            .set(provider)
            .map_err(|_| PlotError::ProviderAlreadyRegistered)?;
        info!("creation provider registered");
        Ok(())
    }

    fn provider(&self) -> Result<&Arc<dyn CreationProvider>, PlotError> {
        self.provider.get().ok_or(PlotError::ProviderNotRegistered)
    }

    /// Build a `Created` event from a pre-built record. Never needs the provider.
    pub fn created(&self, plot_id: PlotId, record: CreationRecord) -> PlotEvent {
        PlotEvent::new(plot_id, PlotEventKind::Created(record))
    }

    /// Build a `Created` event from opaque raw input via the registered
    /// provider. Calling this before registration is a programming-sequence
    /// error surfaced as [`PlotError::ProviderNotRegistered`].
    pub fn created_from_raw(&self, plot_id: PlotId, raw: &str) -> Result<PlotEvent, PlotError> {
        let record = self.provider()?.resolve_raw(raw)?;
        Ok(PlotEvent::new(plot_id, PlotEventKind::Created(record)))
    }

    /// Build a `Created` event for an already known plot id via the provider.
    pub fn created_for_plot(&self, plot_id: PlotId) -> Result<PlotEvent, PlotError> {
        let record = self.provider()?.resolve_plot(plot_id)?;
        Ok(PlotEvent::new(plot_id, PlotEventKind::Created(record)))
    }
}

impl Default for PlotContext {
    fn default() -> Self {
        Self::new()
    }
}
