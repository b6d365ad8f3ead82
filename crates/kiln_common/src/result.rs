//! Common result and error types for the Kiln host.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in Kiln), not a
/// user-facing failure. User-facing failures travel as diagnostics or as the
/// formatted report blocks produced at the host boundary, and the operation
/// still returns `Ok`.
pub type HostResult<T> = Result<T, InternalError>;

/// An internal host error indicating a bug in Kiln, not a user input problem.
///
/// These errors should never occur during normal operation. If one does,
/// there is a logic error in the host that should be fixed.
#[derive(Debug, Clone, thiserror::Error)]
#[error("internal host error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("cache poisoned");
        assert_eq!(format!("{err}"), "internal host error: cache poisoned");
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
