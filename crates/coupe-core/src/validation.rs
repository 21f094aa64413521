//! # Validation Module
//!
//! Input validation utilities for Coupe.
//!
//! ## Validation Strategy
//! The engines validate caller input here before touching storage; the
//! database adds a second line of defense with NOT NULL, CHECK, UNIQUE,
//! and foreign-key constraints.
//!
//! ## Usage
//! ```rust
//! use coupe_core::validation::{validate_id, validate_payment_amount};
//!
//! validate_id("salon_id", "550e8400-e29b-41d4-a716-446655440000").unwrap();
//! validate_payment_amount(150_000).unwrap();
//! ```

use crate::error::ValidationError;
use crate::MAX_NOTES_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates an entity id (UUID v4 string).
///
/// ## Rules
/// - Must not be empty or blank
/// - Must parse as a UUID
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates an optional entity id: None and blank are both "absent".
///
/// ## Returns
/// The normalized id, or None when absent.
pub fn validate_optional_id(field: &str, id: Option<&str>) -> ValidationResult<Option<String>> {
    match id {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => {
            validate_id(field, raw)?;
            Ok(Some(raw.trim().to_string()))
        }
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates free-text appointment notes.
///
/// ## Rules
/// - Optional; blank normalizes to None
/// - Maximum MAX_NOTES_LENGTH characters
pub fn validate_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    match notes {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            if trimmed.len() > MAX_NOTES_LENGTH {
                return Err(ValidationError::TooLong {
                    field: "notes".to_string(),
                    max: MAX_NOTES_LENGTH,
                });
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a payment amount in cents.
///
/// ## Rules
/// - Must be positive (> 0); zero or negative payment lines are rejected
pub fn validate_payment_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that a service id list is usable for booking.
///
/// ## Rules
/// - Must not be empty
/// - Every entry must be a valid id
pub fn validate_service_ids(service_ids: &[String]) -> ValidationResult<()> {
    if service_ids.is_empty() {
        return Err(ValidationError::Empty {
            field: "service_ids".to_string(),
        });
    }

    for id in service_ids {
        validate_id("service_id", id)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
