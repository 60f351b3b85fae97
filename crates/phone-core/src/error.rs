//! Error types for the phone core library

use thiserror::Error;

use crate::state_table::EventType;
use crate::types::CallPhase;

/// Result type for phone operations
pub type PhoneResult<T> = Result<T, PhoneError>;

/// Errors that can occur while driving the simulated phone
#[derive(Debug, Error)]
pub enum PhoneError {
    /// The command has no transition out of the current phase
    #[error("Invalid transition: {event:?} is not accepted while {phase:?}")]
    InvalidTransition { phase: CallPhase, event: EventType },

    /// Contact is not present in the directory
    #[error("Contact not found: {id}")]
    ContactNotFound { id: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Registration form rejected
    #[error("Registration error: {message}")]
    Registration { message: String },

    /// No tokio runtime available for the timers
    #[error("Runtime error: {message}")]
    Runtime { message: String },

    /// Controller was shut down
    #[error("Controller has been shut down")]
    ShutDown,

    /// I/O error while loading a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON input
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PhoneError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a registration error
    pub fn registration(message: impl Into<String>) -> Self {
        Self::Registration {
            message: message.into(),
        }
    }

    /// Create a contact-not-found error
    pub fn contact_not_found(id: impl Into<String>) -> Self {
        Self::ContactNotFound { id: id.into() }
    }

    /// Create a runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    /// Whether this error is an illegal command rather than a failure
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}
