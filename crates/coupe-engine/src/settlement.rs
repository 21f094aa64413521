//! Settlement Engine: cashing in completed appointments.
//!
//! ```text
//!                        create_transaction
//!                               |
//!        appointment exists? -> completed? -> not cashed yet?
//!                               |
//!             payments sum == snapshot total, to the cent
//!                               |
//!      transaction + payment lines + commission written atomically
//! ```
//!
//! Preconditions are checked in a fixed order so a caller holding several
//! stale assumptions always sees the same error first. The commission is
//! derived from the barber's rate at settlement time and is never revised
//! afterwards, not even by a void.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use coupe_core::{
    total_price, validation, verify_exact_payment, Commission, Money, PaymentLine, PaymentMethod,
    Transaction, TransactionStatus, AppointmentStatus, MAX_PAYMENT_LINES,
};
use coupe_db::{generate_id, Database, DbError};

use crate::context::{DateRange, TenantContext};
use crate::error::{ConflictCode, EngineError, EngineResult};

// ============================================================================
// Request / view types
// ============================================================================

/// One tendered payment.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub amount_cents: i64,
}

/// Input for cashing in an appointment.
#[derive(Debug, Clone)]
pub struct CreateTransactionRequest {
    pub appointment_id: String,
    /// Staff member recording the settlement (not necessarily the barber).
    pub recorded_by: String,
    pub payments: Vec<PaymentRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentLineView {
    pub method: PaymentMethod,
    pub amount_cents: i64,
}

/// A settlement with its payments and commission snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: String,
    pub appointment_id: String,
    pub barber_id: String,
    pub recorded_by: String,
    pub total_cents: i64,
    pub status: TransactionStatus,
    pub payments: Vec<PaymentLineView>,
    pub commission_rate_bps: Option<i64>,
    pub commission_cents: Option<i64>,
    pub version: i64,
    pub created_at: chrono::DateTime<Utc>,
}

/// A commission row with the owning barber resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CommissionView {
    pub id: String,
    pub transaction_id: String,
    pub barber_id: String,
    pub barber_name: String,
    pub rate_applied_bps: i64,
    pub amount_cents: i64,
    pub created_at: chrono::DateTime<Utc>,
}

// ============================================================================
// Engine
// ============================================================================

/// Settles completed appointments and manages the resulting transactions.
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    db: Database,
}

impl SettlementEngine {
    pub fn new(db: Database) -> Self {
        SettlementEngine { db }
    }

    /// Cashes in a completed appointment.
    ///
    /// Precondition order is fixed: missing appointment, then status,
    /// then already-cashed, then payment mismatch. The transaction, its
    /// payment lines and the commission land in one storage transaction;
    /// a failure anywhere leaves nothing behind.
    pub async fn create_transaction(
        &self,
        ctx: &TenantContext,
        req: CreateTransactionRequest,
    ) -> EngineResult<TransactionView> {
        validation::validate_id("appointment_id", &req.appointment_id)?;
        validation::validate_id("recorded_by", &req.recorded_by)?;
        if req.payments.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one payment is required".to_string(),
            ));
        }
        if req.payments.len() > MAX_PAYMENT_LINES {
            return Err(EngineError::InvalidInput(format!(
                "at most {MAX_PAYMENT_LINES} payment lines per transaction"
            )));
        }
        for payment in &req.payments {
            validation::validate_payment_amount(payment.amount_cents)?;
        }

        let salon_id = ctx.salon_id();

        let appointment = self
            .db
            .appointments()
            .get_by_id(&req.appointment_id, salon_id)
            .await?
            .ok_or(EngineError::not_found("Appointment"))?;

        if appointment.status != AppointmentStatus::Completed {
            return Err(EngineError::conflict(
                ConflictCode::InvalidStatus,
                format!(
                    "appointment is '{}', only completed appointments can be cashed in",
                    appointment.status.as_str()
                ),
            ));
        }

        if let Some(existing) = self
            .db
            .settlements()
            .get_by_appointment(&appointment.id)
            .await?
        {
            return Err(EngineError::conflict(
                ConflictCode::AlreadyCashed,
                format!("appointment already settled by transaction {}", existing.id),
            ));
        }

        let lines = self.db.appointments().get_lines(&appointment.id).await?;
        let due = total_price(&lines);
        let paid: Money = req
            .payments
            .iter()
            .map(|p| Money::from_cents(p.amount_cents))
            .sum();
        verify_exact_payment(paid, due)?;

        let recorder = self
            .db
            .staff()
            .get_by_id(&req.recorded_by, salon_id)
            .await?
            .ok_or(EngineError::not_found("Staff"))?;
        let barber = self
            .db
            .staff()
            .get_by_id(&appointment.barber_id, salon_id)
            .await?
            .ok_or(EngineError::not_found("Barber"))?;

        let rate = barber.commission_rate();
        let commission_amount = due.commission(rate);

        let now = Utc::now();
        let transaction = Transaction {
            id: generate_id(),
            salon_id: salon_id.to_string(),
            appointment_id: appointment.id.clone(),
            barber_id: barber.id.clone(),
            recorded_by: recorder.id.clone(),
            total_cents: due.cents(),
            status: TransactionStatus::Completed,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        let payments: Vec<PaymentLine> = req
            .payments
            .iter()
            .enumerate()
            .map(|(i, p)| PaymentLine {
                id: generate_id(),
                transaction_id: transaction.id.clone(),
                method: p.method,
                amount_cents: p.amount_cents,
                position: i as i64,
                created_at: now,
            })
            .collect();
        let period = appointment.start_time.date_naive();
        let commission = Commission {
            id: generate_id(),
            salon_id: salon_id.to_string(),
            barber_id: barber.id.clone(),
            transaction_id: transaction.id.clone(),
            rate_applied_bps: rate.bps() as i64,
            amount_cents: commission_amount.cents(),
            period_start: period,
            period_end: period,
            created_at: now,
        };

        match self
            .db
            .settlements()
            .insert_settlement(&transaction, &payments, &commission)
            .await
        {
            Ok(()) => {}
            // Lost a race on the one-transaction-per-appointment constraint.
            Err(DbError::UniqueViolation { .. }) => {
                return Err(EngineError::conflict(
                    ConflictCode::AlreadyCashed,
                    "appointment already settled".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            id = %transaction.id,
            appointment_id = %transaction.appointment_id,
            total = transaction.total_cents,
            commission = commission.amount_cents,
            "appointment cashed in"
        );

        Ok(assemble_view(
            transaction,
            payments,
            Some(commission),
        ))
    }

    /// Voids a transaction.
    ///
    /// Idempotent: voiding a voided transaction returns the current state
    /// without writing. The commission row stays exactly as it was; rate
    /// reconciliation for voided settlements is a reporting concern.
    pub async fn void_transaction(
        &self,
        ctx: &TenantContext,
        transaction_id: &str,
    ) -> EngineResult<TransactionView> {
        validation::validate_id("transaction_id", transaction_id)?;
        let salon_id = ctx.salon_id();

        let transaction = self
            .db
            .settlements()
            .get_by_id(transaction_id, salon_id)
            .await?
            .ok_or(EngineError::not_found("Transaction"))?;

        if transaction.status == TransactionStatus::Voided {
            debug!(id = %transaction.id, "transaction already voided");
            return self.view_of(transaction).await;
        }

        let written = self
            .db
            .settlements()
            .void(transaction_id, salon_id, transaction.version)
            .await?;
        if !written {
            return match self
                .db
                .settlements()
                .get_by_id(transaction_id, salon_id)
                .await?
            {
                Some(current) if current.status == TransactionStatus::Voided => {
                    // The race we lost was another void; same outcome.
                    self.view_of(current).await
                }
                Some(_) => Err(EngineError::ConcurrentModification {
                    entity: "Transaction",
                    id: transaction_id.to_string(),
                }),
                None => Err(EngineError::not_found("Transaction")),
            };
        }

        info!(id = %transaction_id, "transaction voided");

        let updated = self
            .db
            .settlements()
            .get_by_id(transaction_id, salon_id)
            .await?
            .ok_or(EngineError::not_found("Transaction"))?;
        self.view_of(updated).await
    }

    /// Fetches one transaction with payments and commission.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        transaction_id: &str,
    ) -> EngineResult<TransactionView> {
        validation::validate_id("transaction_id", transaction_id)?;
        let transaction = self
            .db
            .settlements()
            .get_by_id(transaction_id, ctx.salon_id())
            .await?
            .ok_or(EngineError::not_found("Transaction"))?;
        self.view_of(transaction).await
    }

    /// Lists transactions recorded within the day range.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        range: DateRange,
    ) -> EngineResult<Vec<TransactionView>> {
        let (start, end) = range.bounds();
        let transactions = self
            .db
            .settlements()
            .list_by_range(ctx.salon_id(), start, end)
            .await?;
        let mut views = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            views.push(self.view_of(transaction).await?);
        }
        Ok(views)
    }

    /// Lists commissions earned within the day range, optionally for one
    /// barber. Commissions of voided transactions are included; filtering
    /// them is up to the report consumer.
    pub async fn list_commissions(
        &self,
        ctx: &TenantContext,
        range: DateRange,
        barber_id: Option<&str>,
    ) -> EngineResult<Vec<CommissionView>> {
        if let Some(id) = barber_id {
            validation::validate_id("barber_id", id)?;
        }
        let (start, end) = range.bounds();
        let commissions = self
            .db
            .settlements()
            .list_commissions(ctx.salon_id(), start, end, barber_id)
            .await?;

        let staff_repo = self.db.staff();
        let mut views = Vec::with_capacity(commissions.len());
        for commission in commissions {
            let barber = staff_repo
                .get_by_id(&commission.barber_id, ctx.salon_id())
                .await?
                .ok_or(EngineError::not_found("Barber"))?;
            views.push(CommissionView {
                id: commission.id,
                transaction_id: commission.transaction_id,
                barber_id: commission.barber_id,
                barber_name: barber.full_name(),
                rate_applied_bps: commission.rate_applied_bps,
                amount_cents: commission.amount_cents,
                created_at: commission.created_at,
            });
        }
        Ok(views)
    }

    async fn view_of(&self, transaction: Transaction) -> EngineResult<TransactionView> {
        let payments = self.db.settlements().get_payments(&transaction.id).await?;
        let commission = self.db.settlements().get_commission(&transaction.id).await?;
        Ok(assemble_view(transaction, payments, commission))
    }
}

fn assemble_view(
    transaction: Transaction,
    payments: Vec<PaymentLine>,
    commission: Option<Commission>,
) -> TransactionView {
    TransactionView {
        id: transaction.id,
        appointment_id: transaction.appointment_id,
        barber_id: transaction.barber_id,
        recorded_by: transaction.recorded_by,
        total_cents: transaction.total_cents,
        status: transaction.status,
        payments: payments
            .into_iter()
            .map(|p| PaymentLineView {
                method: p.method,
                amount_cents: p.amount_cents,
            })
            .collect(),
        commission_rate_bps: commission.as_ref().map(|c| c.rate_applied_bps),
        commission_cents: commission.as_ref().map(|c| c.amount_cents),
        version: transaction.version,
        created_at: transaction.created_at,
    }
}
