use thiserror::Error;

/// Errors surfaced by the interaction layer. Decode and ownership failures
/// are values, not errors; only internal wiring bugs land here.
#[derive(Debug, Error)]
pub enum InteractionError {
    /// A cached payload exists for the interaction but has the wrong type.
    /// This indicates a mis-wired route, not bad user input.
    #[error("payload for interaction {interaction} is not a {expected}")]
    PayloadTypeMismatch {
        interaction: u64,
        expected: &'static str,
    },
}
