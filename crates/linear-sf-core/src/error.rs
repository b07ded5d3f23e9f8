//! Error types for the linear SF testbed

use thiserror::Error;

/// Core error type for environment, solver and evaluation operations
#[derive(Error, Debug)]
pub enum RLError {
    /// Environment-related errors
    #[error("Environment error: {0}")]
    Environment(String),

    /// Invalid action
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A matrix that has to be inverted is singular
    #[error("Singular matrix: {context} is not invertible")]
    SingularMatrix {
        /// Which matrix failed to invert
        context: String,
    },

    /// Two quantities that must agree in shape do not (`(rows, cols)`, vectors are `(n, 1)`)
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: (usize, usize),
        /// Actual shape
        actual: (usize, usize),
    },

    /// The agent does not expose a capability the caller requires
    #[error("Agent does not expose {0}")]
    MissingCapability(&'static str),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RLError {
    /// Singular matrix error for the named matrix
    pub fn singular(context: impl Into<String>) -> Self {
        Self::SingularMatrix {
            context: context.into(),
        }
    }

    /// Shape mismatch between an expected and an actual `(rows, cols)` pair
    #[must_use]
    pub fn shape(expected: (usize, usize), actual: (usize, usize)) -> Self {
        Self::ShapeMismatch { expected, actual }
    }
}

/// Result type alias for testbed operations
pub type Result<T> = std::result::Result<T, RLError>;
