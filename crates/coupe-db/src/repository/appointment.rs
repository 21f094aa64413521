//! # Appointment Repository
//!
//! Database operations for appointments and their service lines.
//!
//! ## Appointment Lifecycle
//! ```text
//! 1. CREATE
//!    └── insert_with_lines() → Appointment { status: Scheduled } plus
//!        one row per booked service with frozen price snapshot,
//!        in a single database transaction
//!
//! 2. ADVANCE
//!    └── update_status() → version-guarded UPDATE; a stale version
//!        writes nothing and the caller reports concurrent modification
//!
//! 3. SETTLE (see settlement.rs)
//!    └── list_to_cash() finds completed appointments with no
//!        transaction row yet
//! ```
//!
//! ## Concurrency Note
//! `find_overlapping` is only meaningful inside the scheduling engine's
//! per-barber critical section: the check-then-insert sequence must not
//! interleave with another create for the same barber.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use coupe_core::{Appointment, AppointmentServiceLine, AppointmentStatus};

/// Repository for appointment database operations.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: SqlitePool,
}

impl AppointmentRepository {
    /// Creates a new AppointmentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AppointmentRepository { pool }
    }

    /// Gets an appointment by id within a salon.
    pub async fn get_by_id(&self, id: &str, salon_id: &str) -> DbResult<Option<Appointment>> {
        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, salon_id, barber_id, client_id, start_time, end_time,
                   status, notes, version, created_at, updated_at
            FROM appointments
            WHERE id = ?1 AND salon_id = ?2
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Inserts an appointment together with its service lines in one
    /// database transaction.
    ///
    /// ## Snapshot Pattern
    /// Each line carries the service's name, duration, and price copied
    /// at booking time. Later catalog edits never touch these rows.
    pub async fn insert_with_lines(
        &self,
        appointment: &Appointment,
        lines: &[AppointmentServiceLine],
    ) -> DbResult<()> {
        debug!(
            id = %appointment.id,
            barber_id = %appointment.barber_id,
            lines = lines.len(),
            "inserting appointment"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, salon_id, barber_id, client_id, start_time, end_time,
                status, notes, version, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&appointment.id)
        .bind(&appointment.salon_id)
        .bind(&appointment.barber_id)
        .bind(&appointment.client_id)
        .bind(appointment.start_time)
        .bind(appointment.end_time)
        .bind(appointment.status)
        .bind(&appointment.notes)
        .bind(appointment.version)
        .bind(appointment.created_at)
        .bind(appointment.updated_at)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO appointment_services (
                    id, appointment_id, service_id, name_snapshot,
                    duration_minutes_snapshot, price_cents_snapshot,
                    position, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&line.id)
            .bind(&line.appointment_id)
            .bind(&line.service_id)
            .bind(&line.name_snapshot)
            .bind(line.duration_minutes_snapshot)
            .bind(line.price_cents_snapshot)
            .bind(line.position)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Gets the service lines of an appointment, in booking order.
    pub async fn get_lines(&self, appointment_id: &str) -> DbResult<Vec<AppointmentServiceLine>> {
        let lines = sqlx::query_as::<_, AppointmentServiceLine>(
            r#"
            SELECT id, appointment_id, service_id, name_snapshot,
                   duration_minutes_snapshot, price_cents_snapshot,
                   position, created_at
            FROM appointment_services
            WHERE appointment_id = ?1
            ORDER BY position
            "#,
        )
        .bind(appointment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Finds appointments of a barber whose interval overlaps
    /// `[new_start, new_end)`, excluding statuses that free the slot.
    ///
    /// Standard half-open interval test:
    /// `existing.start < new_end AND existing.end > new_start`.
    ///
    /// Must be called inside the per-barber critical section; see module
    /// docs.
    pub async fn find_overlapping(
        &self,
        barber_id: &str,
        salon_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> DbResult<Vec<Appointment>> {
        // The set of statuses that free a slot comes from the status
        // machine itself, not a hand-maintained list here.
        let freeing: Vec<String> = AppointmentStatus::ALL
            .iter()
            .filter(|s| !s.blocks_slot())
            .map(|s| format!("'{}'", s.as_str()))
            .collect();
        let sql = format!(
            r#"
            SELECT id, salon_id, barber_id, client_id, start_time, end_time,
                   status, notes, version, created_at, updated_at
            FROM appointments
            WHERE barber_id = ?1
              AND salon_id = ?2
              AND status NOT IN ({})
              AND start_time < ?4
              AND end_time > ?3
            "#,
            freeing.join(", ")
        );
        let overlapping = sqlx::query_as::<_, Appointment>(&sql)
            .bind(barber_id)
            .bind(salon_id)
            .bind(new_start)
            .bind(new_end)
            .fetch_all(&self.pool)
            .await?;

        Ok(overlapping)
    }

    /// Updates the appointment status, guarded by the version counter.
    ///
    /// ## Returns
    /// `true` when the row was written; `false` when no row matched,
    /// i.e. the appointment is absent, belongs to another salon, or was
    /// modified concurrently (stale `expected_version`). The caller
    /// distinguishes those cases.
    pub async fn update_status(
        &self,
        id: &str,
        salon_id: &str,
        new_status: AppointmentStatus,
        expected_version: i64,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE appointments SET
                status = ?3,
                version = version + 1,
                updated_at = ?5
            WHERE id = ?1 AND salon_id = ?2 AND version = ?4
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .bind(new_status)
        .bind(expected_version)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists appointments of a salon with start_time in `[start, end)`,
    /// optionally filtered to one barber, ordered by start_time.
    pub async fn list_by_range(
        &self,
        salon_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        barber_id: Option<&str>,
    ) -> DbResult<Vec<Appointment>> {
        let appointments = match barber_id {
            Some(barber_id) => {
                sqlx::query_as::<_, Appointment>(
                    r#"
                    SELECT id, salon_id, barber_id, client_id, start_time, end_time,
                           status, notes, version, created_at, updated_at
                    FROM appointments
                    WHERE salon_id = ?1 AND barber_id = ?2
                      AND start_time >= ?3 AND start_time < ?4
                    ORDER BY start_time
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
                sqlx::query_as::<_, Appointment>(
                    r#"
                    SELECT id, salon_id, barber_id, client_id, start_time, end_time,
                           status, notes, version, created_at, updated_at
                    FROM appointments
                    WHERE salon_id = ?1
                      AND start_time >= ?2 AND start_time < ?3
                    ORDER BY start_time
                    "#,
                )
                .bind(salon_id)
                .bind(start)
                .bind(end)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(appointments)
    }

    /// Lists completed appointments in `[start, end)` with no
    /// transaction referencing them yet: the settlement work queue.
    pub async fn list_to_cash(
        &self,
        salon_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<Appointment>> {
        let appointments = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT a.id, a.salon_id, a.barber_id, a.client_id, a.start_time,
                   a.end_time, a.status, a.notes, a.version, a.created_at,
                   a.updated_at
            FROM appointments a
            WHERE a.salon_id = ?1
              AND a.status = 'completed'
              AND a.start_time >= ?2 AND a.start_time < ?3
              AND NOT EXISTS (
                  SELECT 1 FROM transactions t WHERE t.appointment_id = a.id
              )
            ORDER BY a.start_time
            "#,
        )
        .bind(salon_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    /// Deletes an appointment and its lines (cascade).
    ///
    /// Only valid before any transaction references the appointment;
    /// the foreign key on transactions blocks the delete afterwards.
    pub async fn delete(&self, id: &str, salon_id: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM appointments
            WHERE id = ?1 AND salon_id = ?2
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Appointment", id));
        }

        Ok(())
    }
}
