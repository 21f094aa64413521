//! # coupe-core: Pure Business Logic for Coupe
//!
//! This crate is the **heart** of the salon backend. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Coupe Architecture                           │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                 Caller (resolved tenant + actor)            │   │
//! │  └──────────────────────────────┬──────────────────────────────┘   │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼──────────────────────────────┐   │
//! │  │                coupe-engine (Scheduling + Settlement)       │   │
//! │  └──────────────────────────────┬──────────────────────────────┘   │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼──────────────────────────────┐   │
//! │  │               ★ coupe-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌───────────┐  │   │
//! │  │   │  types   │  │  money   │  │  error   │  │ validation│  │   │
//! │  │   │ statuses │  │  Money   │  │  typed   │  │   rules   │  │   │
//! │  │   │ entities │  │ Rate/bps │  │  errors  │  │  checks   │  │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └───────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └──────────────────────────────┬──────────────────────────────┘   │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼──────────────────────────────┐   │
//! │  │                 coupe-db (SQLite repositories)              │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Appointment, Transaction, Commission, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CommissionRate, Money};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of appointment free-text notes.
///
/// ## Business Reason
/// Notes are operator shorthand, not documents. Bounding them keeps rows
/// small and rules out accidental paste-bombs.
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Maximum services on a single appointment.
///
/// ## Business Reason
/// A booking with dozens of lines is a data-entry mistake, not a real
/// visit. Can be made configurable per-tenant later.
pub const MAX_SERVICES_PER_APPOINTMENT: usize = 20;

/// Maximum payment lines on a single transaction.
pub const MAX_PAYMENT_LINES: usize = 10;
