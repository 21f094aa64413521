//! # coupe-db: Database Layer for Coupe
//!
//! This crate provides database access for the salon backend. It uses
//! SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Coupe Data Flow                              │
//! │                                                                     │
//! │  Engine call (create_appointment, create_transaction, ...)         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  coupe-db (THIS CRATE)                      │   │
//! │  │                                                             │   │
//! │  │   ┌─────────────┐   ┌────────────────┐   ┌──────────────┐  │   │
//! │  │   │  Database   │   │  Repositories  │   │  Migrations  │  │   │
//! │  │   │  (pool.rs)  │◄──│ appointment.rs │   │  (embedded)  │  │   │
//! │  │   │ SqlitePool  │   │ settlement.rs  │   │ 001_init.sql │  │   │
//! │  │   │             │   │ directory.rs   │   │              │  │   │
//! │  │   └─────────────┘   └────────────────┘   └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database (WAL mode, foreign keys on)                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coupe_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/coupe.db")).await?;
//! let appointment = db.appointments().get_by_id(&id, &salon_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::appointment::AppointmentRepository;
pub use repository::directory::{
    generate_id, ClientRepository, SalonRepository, ServiceItemRepository, StaffRepository,
};
pub use repository::settlement::SettlementRepository;
