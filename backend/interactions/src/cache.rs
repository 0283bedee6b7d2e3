//! Time-bounded cache pairing a live interaction id with a typed payload.
//!
//! A payload is stored before the component it belongs to can be clicked,
//! looked up while the interaction is alive, and dropped either explicitly
//! or when its time-to-live elapses. The cache owns each payload; lookups
//! hand out `Arc` clones, never mutation handles.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time;
use tracing::debug;

use crate::error::InteractionError;

/// Interaction-layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSettings {
    /// Seconds a cached interaction payload stays alive without removal.
    pub payload_ttl_secs: u64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            payload_ttl_secs: 15 * 60,
        }
    }
}

type Payload = Arc<dyn Any + Send + Sync>;

struct Entry {
    payload: Payload,
    /// Stamps which `put` this entry belongs to, so a stale eviction timer
    /// racing an overwrite never removes the replacement.
    generation: u64,
    eviction: AbortHandle,
}

/// TTL-evicting map from interaction id to payload.
pub struct InteractionCache {
    entries: Arc<Mutex<HashMap<u64, Entry>>>,
    ttl: Duration,
    generations: std::sync::atomic::AtomicU64,
}

impl InteractionCache {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl: Duration::from_secs(settings.payload_ttl_secs),
            generations: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Store `payload` under `interaction` and arm its eviction timer.
    /// Overwrites silently; the replaced entry's timer is cancelled, so at
    /// most one timer is ever armed per id.
    pub async fn put<T: Send + Sync + 'static>(&self, interaction: u64, payload: T) {
        let generation = self
            .generations
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let entries = Arc::clone(&self.entries);
        let ttl = self.ttl;
        let eviction = tokio::spawn(async move {
            time::sleep(ttl).await;
            let mut entries = entries.lock().await;
            // Only evict the entry this timer was armed for.
            if entries
                .get(&interaction)
                .is_some_and(|entry| entry.generation == generation)
            {
                entries.remove(&interaction);
                debug!(interaction, "interaction payload expired");
            }
        })
        .abort_handle();

        let entry = Entry {
            payload: Arc::new(payload),
            generation,
            eviction,
        };
        if let Some(replaced) = self.entries.lock().await.insert(interaction, entry) {
            replaced.eviction.abort();
            debug!(interaction, "interaction payload overwritten");
        }
    }

    /// Untyped lookup; `None` when absent or already evicted.
    pub async fn get(&self, interaction: u64) -> Option<Payload> {
        self.entries
            .lock()
            .await
            .get(&interaction)
            .map(|entry| Arc::clone(&entry.payload))
    }

    /// Typed lookup. Absent is `Ok(None)`; a present payload of the wrong
    /// type is [`InteractionError::PayloadTypeMismatch`].
    pub async fn get_as<T: Send + Sync + 'static>(
        &self,
        interaction: u64,
    ) -> Result<Option<Arc<T>>, InteractionError> {
        match self.get(interaction).await {
            None => Ok(None),
            Some(payload) => payload.downcast::<T>().map(Some).map_err(|_| {
                InteractionError::PayloadTypeMismatch {
                    interaction,
                    expected: std::any::type_name::<T>(),
                }
            }),
        }
    }

    /// Drop the entry and cancel its timer. Returns whether it existed.
    pub async fn remove(&self, interaction: u64) -> bool {
        match self.entries.lock().await.remove(&interaction) {
            Some(entry) => {
                entry.eviction.abort();
                true
            }
            None => false,
        }
    }

    pub async fn clear(&self) {
        let mut entries = self.entries.lock().await;
        for entry in entries.values() {
            entry.eviction.abort();
        }
        entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
