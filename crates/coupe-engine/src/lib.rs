//! # Coupe Engine
//!
//! The scheduling and settlement engines of the Coupe salon backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         coupe-engine                            │
//! │                                                                 │
//! │   ┌───────────────────────┐     ┌───────────────────────┐       │
//! │   │   SchedulingEngine    │     │   SettlementEngine    │       │
//! │   │                       │     │                       │       │
//! │   │  create_appointment   │     │  create_transaction   │       │
//! │   │  update_status        │ ──► │  void_transaction     │       │
//! │   │  list / list_to_cash  │     │  list_commissions     │       │
//! │   └──────────┬────────────┘     └──────────┬────────────┘       │
//! │              │                             │                    │
//! │       BarberLocks                   TenantContext               │
//! │  (per-barber critical section)   (every call, no ambient state) │
//! └──────────────┴─────────────────────────────┴────────────────────┘
//!                               │
//!                           coupe-db
//! ```
//!
//! Every operation takes a [`TenantContext`]; all reads and writes are
//! scoped to its salon, and anything belonging to another salon is
//! indistinguishable from nonexistent.

pub mod context;
pub mod error;
pub mod locks;
pub mod scheduling;
pub mod settlement;

pub use context::{DateRange, TenantContext};
pub use error::{ConflictCode, EngineError, EngineResult};
pub use locks::BarberLocks;
pub use scheduling::{
    AppointmentView, CreateAppointmentRequest, SchedulingEngine, ServiceLineView,
};
pub use settlement::{
    CommissionView, CreateTransactionRequest, PaymentLineView, PaymentRequest, SettlementEngine,
    TransactionView,
};
