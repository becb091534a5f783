use thiserror::Error;

use crate::template::TemplateError;

/// Error type for bopgraph operations.
///
/// `InvalidInput`, `InvalidParameter` and `Template` are caller mistakes and are
/// reported before any algorithm runs. `Invariant` means an algorithm reached a
/// state its own logic rules out; it aborts the whole call.
#[derive(Debug, Error)]
pub enum BopError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("element not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl BopError {
    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        BopError::InvalidInput(msg.into())
    }

    pub fn invalid_parameter<T: Into<String>>(msg: T) -> Self {
        BopError::InvalidParameter(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BopError::NotFound(msg.into())
    }

    pub fn invariant<T: Into<String>>(msg: T) -> Self {
        BopError::Invariant(msg.into())
    }

    /// True for errors caused by configuration or input rather than a bug.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, BopError::Invariant(_))
    }
}
