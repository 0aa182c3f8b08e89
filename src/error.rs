//! Error types.
//!
//! Two layers:
//!
//! - [`SirError`] is returned by the pure numerical core (estimator, integrator,
//!   table operations). It only knows about structurally invalid inputs.
//! - [`AppError`] is what the binary reports. It carries the process exit code.

use thiserror::Error;

/// Result alias for the numerical core.
pub type SirResult<T> = Result<T, SirError>;

/// Errors raised by the estimator, the integrator and the table model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SirError {
    /// A required column is missing, a window is non-positive, a time grid is
    /// empty, a population is zero, etc. Nothing is computed in this case.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SirError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<SirError> for AppError {
    fn from(err: SirError) -> Self {
        AppError::new(2, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_exit_code_2() {
        let err: AppError = SirError::invalid_input("Column 'x' not found.").into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "invalid input: Column 'x' not found.");
    }
}
