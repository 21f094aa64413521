//! # Repository Module
//!
//! Tenant-scoped repository implementations.
//!
//! ## Repository Pattern
//! Each repository wraps the shared pool and owns the SQL for one
//! aggregate. Lookups by id always also filter by salon_id; callers
//! never query by id alone.

pub mod appointment;
pub mod directory;
pub mod settlement;
