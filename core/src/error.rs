//! Errors surfaced by the session bridge.
//!
//! Host event handlers never return these; they answer with plain booleans.
//! The errors describe why a bridge is unusable or why a configuration
//! snapshot was rejected.

/// Errors produced while setting up or configuring a bridge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The session factory could not create an engine session. The bridge
    /// stays invalid for its whole lifetime.
    #[error("engine session could not be created")]
    SessionUnavailable,

    /// The engine session was already released back to its factory.
    #[error("engine session already destroyed")]
    Destroyed,

    #[error("invalid configuration: {0}")]
    Config(String),
}
