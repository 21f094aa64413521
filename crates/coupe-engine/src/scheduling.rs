//! Scheduling Engine: appointment booking and the status state machine.
//!
//! ```text
//!                         create_appointment
//!                                |
//!          validate -> resolve barber/client/services
//!                                |
//!                    [per-barber lock acquired]
//!                                |
//!              overlap check -> insert appointment + lines
//!                                |
//!                    [per-barber lock released]
//! ```
//!
//! The overlap check and insert run under one `BarberLocks` guard per
//! barber, so two racing bookings for the same slot resolve to exactly
//! one winner. Service name, duration and price are snapshotted onto the
//! appointment lines at booking time; later catalog edits never change
//! an existing booking.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use coupe_core::{
    total_duration, total_price, validation, Appointment, AppointmentServiceLine,
    AppointmentStatus, ServiceItem, MAX_SERVICES_PER_APPOINTMENT,
};
use coupe_db::{generate_id, Database};

use crate::context::{DateRange, TenantContext};
use crate::error::{ConflictCode, EngineError, EngineResult};
use crate::locks::BarberLocks;

// ============================================================================
// Request / view types
// ============================================================================

/// Input for booking an appointment.
#[derive(Debug, Clone)]
pub struct CreateAppointmentRequest {
    pub barber_id: String,
    /// Optional: walk-ins have no client record.
    pub client_id: Option<String>,
    pub start_time: DateTime<Utc>,
    /// At least one service, in the order the client asked for them.
    pub service_ids: Vec<String>,
    pub notes: Option<String>,
}

/// One snapshotted service line as callers see it.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceLineView {
    pub service_id: String,
    pub name: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
}

/// An appointment with its lines and resolved display names.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    pub id: String,
    pub barber_id: String,
    pub barber_name: String,
    pub client_id: Option<String>,
    pub client_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub services: Vec<ServiceLineView>,
    pub total_cents: i64,
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Engine
// ============================================================================

/// Books appointments and drives their status lifecycle.
///
/// Clones share the same database handle and the same barber lock
/// registry, so it is safe to clone one per request handler.
#[derive(Debug, Clone)]
pub struct SchedulingEngine {
    db: Database,
    locks: BarberLocks,
}

impl SchedulingEngine {
    pub fn new(db: Database) -> Self {
        SchedulingEngine {
            db,
            locks: BarberLocks::new(),
        }
    }

    /// Books an appointment.
    ///
    /// End time is derived from the sum of the service durations; callers
    /// never supply it. Fails with `APPOINTMENT_OVERLAP` when the computed
    /// interval intersects a live appointment of the same barber.
    pub async fn create_appointment(
        &self,
        ctx: &TenantContext,
        req: CreateAppointmentRequest,
    ) -> EngineResult<AppointmentView> {
        validation::validate_id("barber_id", &req.barber_id)?;
        let client_id = validation::validate_optional_id("client_id", req.client_id.as_deref())?;
        validation::validate_service_ids(&req.service_ids)?;
        let notes = validation::validate_notes(req.notes.as_deref())?;
        if req.service_ids.len() > MAX_SERVICES_PER_APPOINTMENT {
            return Err(EngineError::InvalidInput(format!(
                "at most {MAX_SERVICES_PER_APPOINTMENT} services per appointment"
            )));
        }

        let salon_id = ctx.salon_id();

        let barber = self
            .db
            .staff()
            .get_barber(&req.barber_id, salon_id)
            .await?
            .ok_or(EngineError::not_found("Barber"))?;

        let client = match &client_id {
            Some(id) => Some(
                self.db
                    .clients()
                    .get_by_id(id, salon_id)
                    .await?
                    .ok_or(EngineError::not_found("Client"))?,
            ),
            None => None,
        };

        let services = self.resolve_services(salon_id, &req.service_ids).await?;
        let duration_minutes = total_duration(&services)?;
        let end_time = req.start_time + Duration::minutes(duration_minutes);

        // Critical section: no other booking for this barber may check or
        // insert between our overlap query and our insert.
        let _guard = self.locks.acquire(&req.barber_id).await;

        let conflicts = self
            .db
            .appointments()
            .find_overlapping(&req.barber_id, salon_id, req.start_time, end_time)
            .await?;
        if let Some(existing) = conflicts.first() {
            debug!(
                barber_id = %req.barber_id,
                conflicting = %existing.id,
                "booking rejected, slot occupied"
            );
            return Err(EngineError::conflict(
                ConflictCode::AppointmentOverlap,
                format!(
                    "barber already booked from {} to {}",
                    existing.start_time, existing.end_time
                ),
            ));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: generate_id(),
            salon_id: salon_id.to_string(),
            barber_id: req.barber_id.clone(),
            client_id: client_id.clone(),
            start_time: req.start_time,
            end_time,
            status: AppointmentStatus::Scheduled,
            notes,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        let lines: Vec<AppointmentServiceLine> = services
            .iter()
            .enumerate()
            .map(|(i, svc)| AppointmentServiceLine {
                id: generate_id(),
                appointment_id: appointment.id.clone(),
                service_id: svc.id.clone(),
                name_snapshot: svc.name.clone(),
                duration_minutes_snapshot: svc.duration_minutes,
                price_cents_snapshot: svc.price_cents,
                position: i as i64,
                created_at: now,
            })
            .collect();

        self.db
            .appointments()
            .insert_with_lines(&appointment, &lines)
            .await?;

        info!(
            id = %appointment.id,
            barber_id = %appointment.barber_id,
            start = %appointment.start_time,
            services = lines.len(),
            "appointment booked"
        );

        Ok(assemble_view(
            appointment,
            lines,
            barber.full_name(),
            client.map(|c| c.full_name()),
        ))
    }

    /// Moves an appointment along the status state machine.
    ///
    /// Requesting the status the appointment already has is a no-op that
    /// returns the current state without writing. Any other edge not in
    /// the machine fails with `INVALID_STATUS_TRANSITION`.
    pub async fn update_status(
        &self,
        ctx: &TenantContext,
        appointment_id: &str,
        new_status: AppointmentStatus,
    ) -> EngineResult<AppointmentView> {
        validation::validate_id("appointment_id", appointment_id)?;
        let salon_id = ctx.salon_id();

        let appointment = self
            .db
            .appointments()
            .get_by_id(appointment_id, salon_id)
            .await?
            .ok_or(EngineError::not_found("Appointment"))?;

        if appointment.status == new_status {
            debug!(id = %appointment.id, status = %new_status.as_str(), "status unchanged");
            return self.view_of(salon_id, appointment).await;
        }
        appointment.status.ensure_transition_to(new_status)?;

        let written = self
            .db
            .appointments()
            .update_status(appointment_id, salon_id, new_status, appointment.version)
            .await?;
        if !written {
            // The row changed (or vanished) between our read and write.
            return match self
                .db
                .appointments()
                .get_by_id(appointment_id, salon_id)
                .await?
            {
                Some(_) => Err(EngineError::ConcurrentModification {
                    entity: "Appointment",
                    id: appointment_id.to_string(),
                }),
                None => Err(EngineError::not_found("Appointment")),
            };
        }

        info!(
            id = %appointment_id,
            from = %appointment.status.as_str(),
            to = %new_status.as_str(),
            "appointment status changed"
        );

        let updated = self
            .db
            .appointments()
            .get_by_id(appointment_id, salon_id)
            .await?
            .ok_or(EngineError::not_found("Appointment"))?;
        self.view_of(salon_id, updated).await
    }

    /// Fetches one appointment with its lines.
    pub async fn get(
        &self,
        ctx: &TenantContext,
        appointment_id: &str,
    ) -> EngineResult<AppointmentView> {
        validation::validate_id("appointment_id", appointment_id)?;
        let appointment = self
            .db
            .appointments()
            .get_by_id(appointment_id, ctx.salon_id())
            .await?
            .ok_or(EngineError::not_found("Appointment"))?;
        self.view_of(ctx.salon_id(), appointment).await
    }

    /// Lists appointments starting within the day range, optionally for
    /// one barber, ordered by start time.
    pub async fn list(
        &self,
        ctx: &TenantContext,
        range: DateRange,
        barber_id: Option<&str>,
    ) -> EngineResult<Vec<AppointmentView>> {
        if let Some(id) = barber_id {
            validation::validate_id("barber_id", id)?;
        }
        let (start, end) = range.bounds();
        let appointments = self
            .db
            .appointments()
            .list_by_range(ctx.salon_id(), start, end, barber_id)
            .await?;
        self.views_of(ctx.salon_id(), appointments).await
    }

    /// Lists completed appointments in the day range that have no
    /// transaction yet: the settlement work queue.
    pub async fn list_to_cash(
        &self,
        ctx: &TenantContext,
        range: DateRange,
    ) -> EngineResult<Vec<AppointmentView>> {
        let (start, end) = range.bounds();
        let appointments = self
            .db
            .appointments()
            .list_to_cash(ctx.salon_id(), start, end)
            .await?;
        self.views_of(ctx.salon_id(), appointments).await
    }

    /// Resolves service ids to active catalog entries, preserving request
    /// order. Any unknown, inactive or cross-salon id fails the whole
    /// request.
    async fn resolve_services(
        &self,
        salon_id: &str,
        service_ids: &[String],
    ) -> EngineResult<Vec<ServiceItem>> {
        let repo = self.db.services();
        let mut services = Vec::with_capacity(service_ids.len());
        for id in service_ids {
            let service = repo
                .get_by_id(id, salon_id)
                .await?
                .filter(|s| s.is_active)
                .ok_or(EngineError::not_found("Service"))?;
            services.push(service);
        }
        Ok(services)
    }

    async fn view_of(
        &self,
        salon_id: &str,
        appointment: Appointment,
    ) -> EngineResult<AppointmentView> {
        let lines = self.db.appointments().get_lines(&appointment.id).await?;
        let barber = self
            .db
            .staff()
            .get_by_id(&appointment.barber_id, salon_id)
            .await?
            .ok_or(EngineError::not_found("Barber"))?;
        let client_name = match &appointment.client_id {
            Some(id) => self
                .db
                .clients()
                .get_by_id(id, salon_id)
                .await?
                .map(|c| c.full_name()),
            None => None,
        };
        Ok(assemble_view(appointment, lines, barber.full_name(), client_name))
    }

    async fn views_of(
        &self,
        salon_id: &str,
        appointments: Vec<Appointment>,
    ) -> EngineResult<Vec<AppointmentView>> {
        let mut views = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            views.push(self.view_of(salon_id, appointment).await?);
        }
        Ok(views)
    }
}

fn assemble_view(
    appointment: Appointment,
    lines: Vec<AppointmentServiceLine>,
    barber_name: String,
    client_name: Option<String>,
) -> AppointmentView {
    let total_cents = total_price(&lines).cents();
    AppointmentView {
        id: appointment.id,
        barber_id: appointment.barber_id,
        barber_name,
        client_id: appointment.client_id,
        client_name,
        start_time: appointment.start_time,
        end_time: appointment.end_time,
        status: appointment.status,
        notes: appointment.notes,
        services: lines
            .into_iter()
            .map(|line| ServiceLineView {
                service_id: line.service_id,
                name: line.name_snapshot,
                duration_minutes: line.duration_minutes_snapshot,
                price_cents: line.price_cents_snapshot,
            })
            .collect(),
        total_cents,
        version: appointment.version,
        created_at: appointment.created_at,
    }
}
