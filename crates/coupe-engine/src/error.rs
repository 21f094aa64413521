//! Engine-level error types.
//!
//! Every fallible engine operation returns [`EngineResult`]. Errors carry a
//! stable machine-readable code (see [`EngineError::code`]) so callers can
//! map them onto an API surface without string matching.

use coupe_core::{CoreError, ValidationError};
use coupe_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Convenience alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Stable conflict discriminants.
///
/// A conflict is a request that is well-formed but cannot be honored given
/// the current state of the data. The code survives across releases; the
/// accompanying message is free-form and may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictCode {
    /// The requested slot overlaps a live appointment for the same barber.
    AppointmentOverlap,
    /// The requested status change is not a legal state-machine edge.
    InvalidStatusTransition,
    /// The appointment is not in a status that permits the operation.
    InvalidStatus,
    /// The appointment already has a transaction.
    AlreadyCashed,
    /// Payment lines do not sum to the appointment total, to the cent.
    PaymentMismatch,
}

impl ConflictCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictCode::AppointmentOverlap => "APPOINTMENT_OVERLAP",
            ConflictCode::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            ConflictCode::InvalidStatus => "INVALID_STATUS",
            ConflictCode::AlreadyCashed => "ALREADY_CASHED",
            ConflictCode::PaymentMismatch => "PAYMENT_MISMATCH",
        }
    }
}

impl std::fmt::Display for ConflictCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the scheduling and settlement engines.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The entity does not exist within the caller's salon. Cross-tenant
    /// reads deliberately collapse into this variant so a caller cannot
    /// distinguish "absent" from "belongs to someone else".
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// The request itself is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A well-formed request rejected by the current state of the data.
    #[error("{code}: {message}")]
    Conflict { code: ConflictCode, message: String },

    /// A version-guarded write lost a race. The caller may retry.
    #[error("concurrent modification of {entity} {id}")]
    ConcurrentModification { entity: &'static str, id: String },

    /// No salon identity was supplied.
    #[error("missing tenant context")]
    MissingTenantContext,

    /// Storage-layer failure.
    #[error("database error: {0}")]
    Db(#[from] DbError),
}

impl EngineError {
    /// Shorthand constructor for [`EngineError::NotFound`].
    pub fn not_found(entity: &'static str) -> Self {
        EngineError::NotFound { entity }
    }

    /// Shorthand constructor for [`EngineError::Conflict`].
    pub fn conflict(code: ConflictCode, message: impl Into<String>) -> Self {
        EngineError::Conflict {
            code,
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::InvalidInput(_) => "INVALID_INPUT",
            EngineError::Conflict { code, .. } => code.as_str(),
            EngineError::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
            EngineError::MissingTenantContext => "MISSING_TENANT_CONTEXT",
            EngineError::Db(_) => "DATABASE_ERROR",
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::InvalidInput(err.to_string())
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidStatusTransition { from, to } => EngineError::conflict(
                ConflictCode::InvalidStatusTransition,
                format!(
                    "cannot move appointment from '{}' to '{}'",
                    from.as_str(),
                    to.as_str()
                ),
            ),
            CoreError::PaymentMismatch {
                paid_cents,
                due_cents,
            } => EngineError::conflict(
                ConflictCode::PaymentMismatch,
                format!("payments total {paid_cents} cents, appointment total is {due_cents} cents"),
            ),
            CoreError::ZeroDuration => {
                EngineError::InvalidInput("appointment duration must be positive".to_string())
            }
        }
    }
}
