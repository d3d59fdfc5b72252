//! Unified error type for rollcall
//!
//! The decision engine itself never fails: every gate and geofence operation is
//! total. This error type covers the edges of the system only, namely effect
//! handlers (matching, approvals, session storage) and configuration loading.

use serde::{Deserialize, Serialize};

/// Unified error type for all rollcall operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RollcallError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Session store operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Matching service failed to produce an outcome
    #[error("Matching error: {message}")]
    Matching {
        /// Error message describing the matching failure
        message: String,
    },

    /// Approval workflow service failed
    #[error("Approval error: {message}")]
    Approval {
        /// Error message describing the approval failure
        message: String,
    },

    /// Another operation is already in flight for the session
    #[error("Session busy: {message}")]
    Busy {
        /// Error message naming the busy session
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl RollcallError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a matching error
    pub fn matching(message: impl Into<String>) -> Self {
        Self::Matching {
            message: message.into(),
        }
    }

    /// Create an approval error
    pub fn approval(message: impl Into<String>) -> Self {
        Self::Approval {
            message: message.into(),
        }
    }

    /// Create a busy error
    pub fn busy(message: impl Into<String>) -> Self {
        Self::Busy {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Standard Result type for rollcall operations
pub type Result<T> = std::result::Result<T, RollcallError>;

impl From<std::io::Error> for RollcallError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            _ => Self::storage(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RollcallError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RollcallError {
    fn from(err: toml::de::Error) -> Self {
        Self::invalid(format!("Invalid TOML: {err}"))
    }
}
