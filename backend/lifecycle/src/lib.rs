pub mod memory;
pub mod tracker;

pub use memory::{MemoryNotifier, MemoryStore};
pub use tracker::LifecycleTracker;
