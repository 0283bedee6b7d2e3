pub mod cache;
pub mod codec;
pub mod error;
pub mod forward;

pub use cache::{InteractionCache, InteractionSettings};
pub use codec::ComponentId;
pub use error::InteractionError;
pub use forward::{ButtonRoute, ComponentClick, ForwardDisposition};
