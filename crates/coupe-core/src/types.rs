//! # Domain Types
//!
//! Core domain types used throughout Coupe.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  Salon (tenant root)                                                │
//! │    ├── Staff        role tag: admin | manager | barber              │
//! │    ├── Client                                                       │
//! │    ├── ServiceItem  name, duration, price, active                   │
//! │    ├── Appointment ──► AppointmentServiceLine (price snapshot)      │
//! │    ├── Transaction ──► PaymentLine                                  │
//! │    └── Commission   1:1 with Transaction, append-only               │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity belongs to exactly one salon, directly or through its
//! parent. Nothing here performs I/O; the repositories in coupe-db load
//! and persist these types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{CommissionRate, Money};

// =============================================================================
// Salon
// =============================================================================

/// The tenant root. All other entities reference exactly one salon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Salon {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Staff
// =============================================================================

/// Staff role tag.
///
/// A single staff record with a role tag replaces a subtype-per-role
/// hierarchy; role-specific fields (commission rate) are optional and
/// only meaningful for the matching tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Manager,
    Barber,
}

/// A staff member of a salon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Staff {
    pub id: String,
    pub salon_id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: StaffRole,
    /// Commission in basis points; only meaningful when role is Barber.
    /// None means "no configured rate" and settles as zero.
    pub commission_rate_bps: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Staff {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Commission rate with the unset-means-zero rule applied.
    pub fn commission_rate(&self) -> CommissionRate {
        match self.commission_rate_bps {
            Some(bps) if bps > 0 => CommissionRate::from_bps(bps as u32),
            _ => CommissionRate::zero(),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// A client of a salon. Optional on appointments (walk-ins).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Client {
    pub id: String,
    pub salon_id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Service Catalog
// =============================================================================

/// A bookable service in a salon's catalog.
///
/// Soft-deleted via `is_active` once referenced by historical
/// appointments; the snapshots on service lines keep history intact
/// regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ServiceItem {
    pub id: String,
    pub salon_id: String,
    pub name: String,
    /// Duration in minutes, strictly positive.
    pub duration_minutes: i64,
    /// Current catalog price in cents.
    pub price_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceItem {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Total duration of a set of booked services, in minutes.
///
/// An empty set (or one that sums to zero) is not a bookable visit.
pub fn total_duration(services: &[ServiceItem]) -> CoreResult<i64> {
    let minutes: i64 = services.iter().map(|s| s.duration_minutes).sum();
    if minutes <= 0 {
        return Err(CoreError::ZeroDuration);
    }
    Ok(minutes)
}

// =============================================================================
// Appointment Status
// =============================================================================

/// The status of an appointment.
///
/// ## State Machine
/// ```text
/// scheduled ──► in_progress ──► completed (terminal)
///     │              │
///     ├──► cancelled ┘ (terminal)
///     └──► no_show     (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Every status, for code that needs to partition the full set.
    pub const ALL: [AppointmentStatus; 5] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];

    /// Whether this status is terminal (no transition out, ever).
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    /// Whether an appointment in this status blocks the barber's slot.
    /// Cancelled and no-show appointments free the interval.
    pub const fn blocks_slot(&self) -> bool {
        !matches!(
            self,
            AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    /// Whether a transition from `self` to `to` is allowed.
    ///
    /// Requesting the current status is handled upstream as a no-op and
    /// is not a transition.
    pub const fn can_transition_to(&self, to: AppointmentStatus) -> bool {
        match self {
            AppointmentStatus::Scheduled => matches!(
                to,
                AppointmentStatus::InProgress
                    | AppointmentStatus::Cancelled
                    | AppointmentStatus::NoShow
            ),
            AppointmentStatus::InProgress => matches!(
                to,
                AppointmentStatus::Completed | AppointmentStatus::Cancelled
            ),
            _ => false,
        }
    }

    /// Checks a transition, returning the typed error on an illegal edge.
    ///
    /// Same-status requests are not transitions; callers treat them as
    /// no-ops before reaching this check.
    pub fn ensure_transition_to(&self, to: AppointmentStatus) -> CoreResult<()> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(CoreError::InvalidStatusTransition { from: *self, to })
        }
    }

    /// Stable lowercase label, matching the stored representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InProgress => "in_progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
        }
    }
}

// =============================================================================
// Appointment
// =============================================================================

/// A scheduled slot for one barber, one or more services, optional client.
///
/// `end_time` is computed at creation: start + sum of snapshotted service
/// durations. `version` detects lost updates from concurrent status
/// edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Appointment {
    pub id: String,
    pub salon_id: String,
    pub barber_id: String,
    pub client_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A priced, duration-bearing booking of one catalog service within an
/// appointment.
///
/// ## Snapshot Pattern
/// Name, duration, and price are copied from the service item at booking
/// time. Later catalog price changes must never retroactively alter a
/// booked appointment's total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AppointmentServiceLine {
    pub id: String,
    pub appointment_id: String,
    pub service_id: String,
    pub name_snapshot: String,
    pub duration_minutes_snapshot: i64,
    pub price_cents_snapshot: i64,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

impl AppointmentServiceLine {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents_snapshot)
    }
}

/// Sum of the frozen line prices. The appointment's total.
pub fn total_price(lines: &[AppointmentServiceLine]) -> Money {
    lines.iter().map(AppointmentServiceLine::price).sum()
}

/// Checks that tendered payments settle the amount due exactly.
///
/// Integer-cent equality; a single cent off in either direction fails.
pub fn verify_exact_payment(paid: Money, due: Money) -> CoreResult<()> {
    if paid != due {
        return Err(CoreError::PaymentMismatch {
            paid_cents: paid.cents(),
            due_cents: due.cents(),
        });
    }
    Ok(())
}

// =============================================================================
// Transaction
// =============================================================================

/// The status of a settlement transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Settled and counted in revenue.
    Completed,
    /// Excluded from revenue; never deleted (audit trail).
    Voided,
}

impl TransactionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Voided => "voided",
        }
    }
}

/// Payment method for one payment line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

/// The financial settlement of exactly one completed appointment.
///
/// Created once; may transition to voided but is never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: String,
    pub salon_id: String,
    pub appointment_id: String,
    pub barber_id: String,
    /// Staff member who recorded the settlement.
    pub recorded_by: String,
    pub total_cents: i64,
    pub status: TransactionStatus,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// One payment line of a transaction (method + amount).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentLine {
    pub id: String,
    pub transaction_id: String,
    pub method: PaymentMethod,
    pub amount_cents: i64,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Commission
// =============================================================================

/// The barber's earned share of a transaction.
///
/// Fixed at transaction-creation time and never mutated or deleted,
/// including when the parent transaction is voided: commissions represent
/// work already attributed and are corrected out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Commission {
    pub id: String,
    pub salon_id: String,
    pub barber_id: String,
    pub transaction_id: String,
    /// Rate used at settlement time, not the barber's current rate.
    pub rate_applied_bps: i64,
    pub amount_cents: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Commission {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    #[inline]
    pub fn rate_applied(&self) -> CommissionRate {
        CommissionRate::from_bps(self.rate_applied_bps.max(0) as u32)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
