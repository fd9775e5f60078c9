//! Error types for the negotiation protocol.

use thiserror::Error;

/// Errors raised by the authentication negotiation operations.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The required scheme list was absent. Raised before any handler runs.
    #[error("authentication scheme list is required")]
    MissingSchemes,

    /// The required identity list was absent. Raised before any handler runs.
    #[error("identity list is required")]
    MissingIdentities,

    /// The handler did not acknowledge every requested scheme.
    ///
    /// Status-code changes made before dispatch (the 401 of a challenge) are
    /// not rolled back when this is raised.
    #[error("the following authentication schemes were not accepted: {}", .schemes.join(", "))]
    NotAccepted {
        /// Every requested scheme the handler failed to acknowledge.
        schemes: Vec<String>,
    },
}

/// Result type for negotiation operations.
pub type NegotiationResult<T> = Result<T, NegotiationError>;
