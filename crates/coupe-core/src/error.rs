//! # Error Types
//!
//! Domain-specific error types for coupe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  coupe-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                    │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  coupe-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  coupe-engine errors (separate crate)                               │
//! │  └── EngineError      - What callers see, with stable codes         │
//! │                                                                     │
//! │  Flow: CoreError ──────► EngineError → Caller                       │
//! │        ValidationError ► EngineError → Caller                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, from/to states)
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::types::AppointmentStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations independent of any
/// storage or transport concern.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An appointment status transition outside the state machine table,
    /// including any attempt to leave a terminal state.
    #[error("invalid status transition from {from:?} to {to:?}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    /// Appointment total duration must be strictly positive.
    #[error("total duration must be greater than 0 minutes")]
    ZeroDuration,

    /// Submitted payments do not equal the appointment total, to the cent.
    #[error("payment total {paid_cents} does not match amount due {due_cents}")]
    PaymentMismatch { paid_cents: i64, due_cents: i64 },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements, before any
/// business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A collection that must not be empty is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidStatusTransition {
            from: AppointmentStatus::Completed,
            to: AppointmentStatus::Scheduled,
        };
        assert_eq!(
            err.to_string(),
            "invalid status transition from Completed to Scheduled"
        );

        let err = CoreError::PaymentMismatch {
            paid_cents: 199_999,
            due_cents: 200_000,
        };
        assert_eq!(
            err.to_string(),
            "payment total 199999 does not match amount due 200000"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "salon_id".to_string(),
        };
        assert_eq!(err.to_string(), "salon_id is required");

        let err = ValidationError::Empty {
            field: "service_ids".to_string(),
        };
        assert_eq!(err.to_string(), "service_ids must not be empty");
    }
}
