//! # Settlement Repository
//!
//! Database operations for transactions, payment lines, and the
//! commission ledger.
//!
//! ## Settlement Lifecycle
//! ```text
//! 1. CASH IN
//!    └── insert_settlement() → Transaction { status: Completed }
//!        + its payment lines
//!        + exactly one Commission
//!        all in a single database transaction
//!
//! 2. (OPTIONAL) VOID
//!    └── void() → Transaction { status: Voided }
//!        The commission row is NOT touched: commissions record work
//!        already attributed and are corrected out-of-band.
//! ```
//!
//! The commission ledger is append-only: this module exposes no UPDATE
//! or DELETE on the commissions table.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use coupe_core::{Commission, PaymentLine, Transaction};

/// Repository for settlement database operations.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    pool: SqlitePool,
}

impl SettlementRepository {
    /// Creates a new SettlementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettlementRepository { pool }
    }

    /// Gets a transaction by id within a salon.
    pub async fn get_by_id(&self, id: &str, salon_id: &str) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, salon_id, appointment_id, barber_id, recorded_by,
                   total_cents, status, version, created_at, updated_at
            FROM transactions
            WHERE id = ?1 AND salon_id = ?2
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Gets the transaction referencing an appointment, if any.
    ///
    /// At most one exists (UNIQUE on appointment_id), regardless of
    /// transaction status.
    pub async fn get_by_appointment(&self, appointment_id: &str) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, salon_id, appointment_id, barber_id, recorded_by,
                   total_cents, status, version, created_at, updated_at
            FROM transactions
            WHERE appointment_id = ?1
            "#,
        )
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Inserts a transaction, its payment lines, and its commission in
    /// one database transaction.
    ///
    /// The unit of work is atomic: a settled appointment always has both
    /// the revenue row and the derived commission, or neither.
    pub async fn insert_settlement(
        &self,
        transaction: &Transaction,
        payments: &[PaymentLine],
        commission: &Commission,
    ) -> DbResult<()> {
        debug!(
            id = %transaction.id,
            appointment_id = %transaction.appointment_id,
            total = transaction.total_cents,
            payments = payments.len(),
            "inserting settlement"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, salon_id, appointment_id, barber_id, recorded_by,
                total_cents, status, version, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.salon_id)
        .bind(&transaction.appointment_id)
        .bind(&transaction.barber_id)
        .bind(&transaction.recorded_by)
        .bind(transaction.total_cents)
        .bind(transaction.status)
        .bind(transaction.version)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *tx)
        .await?;

        for payment in payments {
            sqlx::query(
                r#"
                INSERT INTO payments (
                    id, transaction_id, method, amount_cents, position, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&payment.id)
            .bind(&payment.transaction_id)
            .bind(payment.method)
            .bind(payment.amount_cents)
            .bind(payment.position)
            .bind(payment.created_at)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO commissions (
                id, salon_id, barber_id, transaction_id, rate_applied_bps,
                amount_cents, period_start, period_end, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&commission.id)
        .bind(&commission.salon_id)
        .bind(&commission.barber_id)
        .bind(&commission.transaction_id)
        .bind(commission.rate_applied_bps)
        .bind(commission.amount_cents)
        .bind(commission.period_start)
        .bind(commission.period_end)
        .bind(commission.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Gets the payment lines of a transaction, in submission order.
    pub async fn get_payments(&self, transaction_id: &str) -> DbResult<Vec<PaymentLine>> {
        let payments = sqlx::query_as::<_, PaymentLine>(
            r#"
            SELECT id, transaction_id, method, amount_cents, position, created_at
            FROM payments
            WHERE transaction_id = ?1
            ORDER BY position
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    /// Flips a transaction to voided, guarded by the version counter.
    ///
    /// Touches only the transactions table; the commission row stays
    /// exactly as written at settlement time.
    ///
    /// ## Returns
    /// `true` when the row was written; `false` when no row matched
    /// (absent, other salon, or stale version).
    pub async fn void(
        &self,
        id: &str,
        salon_id: &str,
        expected_version: i64,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                status = 'voided',
                version = version + 1,
                updated_at = ?4
            WHERE id = ?1 AND salon_id = ?2 AND version = ?3
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .bind(expected_version)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists transactions of a salon created in `[start, end)`, ordered
    /// by creation time.
    pub async fn list_by_range(
        &self,
        salon_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, salon_id, appointment_id, barber_id, recorded_by,
                   total_cents, status, version, created_at, updated_at
            FROM transactions
            WHERE salon_id = ?1 AND created_at >= ?2 AND created_at < ?3
            ORDER BY created_at
            "#,
        )
        .bind(salon_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Gets the commission derived from a transaction, if any.
    ///
    /// A transaction without a commission should not normally occur but
    /// is tolerated by readers.
    pub async fn get_commission(&self, transaction_id: &str) -> DbResult<Option<Commission>> {
        let commission = sqlx::query_as::<_, Commission>(
            r#"
            SELECT id, salon_id, barber_id, transaction_id, rate_applied_bps,
                   amount_cents, period_start, period_end, created_at
            FROM commissions
            WHERE transaction_id = ?1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(commission)
    }

    /// Lists commissions of a salon created in `[start, end)`,
    /// optionally filtered to one barber, ordered by creation time.
    pub async fn list_commissions(
        &self,
        salon_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        barber_id: Option<&str>,
    ) -> DbResult<Vec<Commission>> {
        let commissions = match barber_id {
            Some(barber_id) => {
                sqlx::query_as::<_, Commission>(
                    r#"
                    SELECT id, salon_id, barber_id, transaction_id, rate_applied_bps,
                           amount_cents, period_start, period_end, created_at
                    FROM commissions
                    WHERE salon_id = ?1 AND barber_id = ?2
                      AND created_at >= ?3 AND created_at < ?4
                    ORDER BY created_at
                    "#,
                )
                .bind(salon_id)
                .bind(barber_id)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Commission>(
                    r#"
                    SELECT id, salon_id, barber_id, transaction_id, rate_applied_bps,
                           amount_cents, period_start, period_end, created_at
                    FROM commissions
                    WHERE salon_id = ?1 AND created_at >= ?2 AND created_at < ?3
                    ORDER BY created_at
                    "#,
                )
                .bind(salon_id)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(commissions)
    }
}
