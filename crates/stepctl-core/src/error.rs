//! Error types for plan stack and registry operations.

use thiserror::Error;

use crate::models::Tid;

/// Errors raised by plan stacks, the registry and the process driver.
///
/// Two classes exist. Precondition violations ([`EmptyStack`],
/// [`PlanNotFound`], [`UnknownCheckpoint`]) mean the calling stepping logic
/// is broken; a driver receiving one must abort the session instead of
/// carrying on with corrupted stepping state. The remaining variants describe
/// environmental failures.
///
/// [`EmptyStack`]: PlanStackError::EmptyStack
/// [`PlanNotFound`]: PlanStackError::PlanNotFound
/// [`UnknownCheckpoint`]: PlanStackError::UnknownCheckpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanStackError {
    /// Pop or discard on a thread with no active plans
    #[error("cannot {operation} on thread 0x{tid:04x}: the active plan stack is empty")]
    EmptyStack { tid: Tid, operation: &'static str },
    /// A discard target that is not on the active stack
    #[error("plan '{plan}' is not on the active plan stack of thread 0x{tid:04x}")]
    PlanNotFound { tid: Tid, plan: String },
    /// Restore or drop of a checkpoint token the stack never issued, or
    /// already consumed
    #[error("unknown completed-plan checkpoint {token} on thread 0x{tid:04x}")]
    UnknownCheckpoint { tid: Tid, token: usize },
    /// No plan stack is registered for the thread
    #[error("no plan stack registered for thread 0x{tid:04x}")]
    UnknownThread { tid: Tid },
    /// The registry lock was poisoned by a panicking holder
    #[error("plan stack registry lock poisoned")]
    LockPoisoned,
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlanStackError {
        PlanStackError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlanStackError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// True for errors that indicate a bug in the caller's stepping logic.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            PlanStackError::EmptyStack { .. }
                | PlanStackError::PlanNotFound { .. }
                | PlanStackError::UnknownCheckpoint { .. }
        )
    }
}

impl<T> From<std::sync::PoisonError<T>> for PlanStackError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        PlanStackError::LockPoisoned
    }
}

/// Result type alias for plan stack operations
pub type Result<T> = std::result::Result<T, PlanStackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_classification() {
        let empty = PlanStackError::EmptyStack {
            tid: 1,
            operation: "pop",
        };
        assert!(empty.is_precondition_violation());

        let missing = PlanStackError::UnknownThread { tid: 1 };
        assert!(!missing.is_precondition_violation());

        let input = PlanStackError::invalid_input("tid").with_reason("must be non-zero");
        assert!(!input.is_precondition_violation());
    }

    #[test]
    fn test_error_messages_use_hex_tids() {
        let err = PlanStackError::UnknownCheckpoint { tid: 0x2a, token: 3 };
        assert_eq!(
            err.to_string(),
            "unknown completed-plan checkpoint 3 on thread 0x002a"
        );
    }
}
