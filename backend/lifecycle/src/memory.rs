//! In-memory implementations of the core's collaborator seams.
//!
//! Back the tests and local runs; production deployments plug in real
//! database and Discord-channel implementations instead.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use plotforge_core::{Notifier, PlotId, PlotRecord, PlotStore, TrackingMessageId};

/// Plot store over a plain map, keyed twice like the real one.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<PlotId, PlotRecord>>,
}

impl MemoryStore {
    pub fn insert(&self, record: PlotRecord) {
        self.records.lock().unwrap().insert(record.plot_id, record);
    }
}

#[async_trait]
impl PlotStore for MemoryStore {
    async fn find_by_tracking_id(&self, id: TrackingMessageId) -> Result<Option<PlotRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|record| record.tracking_message_id == id)
            .cloned())
    }

    async fn find_by_plot_id(&self, id: PlotId) -> Result<Option<PlotRecord>> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }
}

/// Notifier that records every message instead of delivering it.
#[derive(Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<(PlotId, String)>>,
}

impl MemoryNotifier {
    pub fn sent(&self) -> Vec<(PlotId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, plot_id: PlotId, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((plot_id, text.to_string()));
        Ok(())
    }
}
