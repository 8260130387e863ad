/// Error types for the engine runtime
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by an [`EngineHandle`](crate::EngineHandle).
///
/// Game rules never fail; these only describe the runtime task itself.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The runtime task has stopped (shutdown, or every handle dropped)
    #[error("engine runtime has stopped")]
    Stopped,

    /// The command queue is full (only from `try_send`)
    #[error("engine command queue is full")]
    Busy,
}
