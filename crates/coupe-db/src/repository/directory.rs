//! # Directory Repositories
//!
//! Tenant-scoped lookups for the thin collaborators: salons, staff,
//! clients, and the service catalog. The engines consume these
//! read-only; the inserts exist for onboarding callers and test
//! fixtures.
//!
//! ## Tenant Isolation
//! Every `get_by_id` also filters by `salon_id`. A row owned by another
//! salon decodes to `None`, indistinguishable from an absent row.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use coupe_core::{Client, Salon, ServiceItem, Staff};

// =============================================================================
// Salons
// =============================================================================

/// Repository for salon (tenant root) records.
#[derive(Debug, Clone)]
pub struct SalonRepository {
    pool: SqlitePool,
}

impl SalonRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SalonRepository { pool }
    }

    /// Gets a salon by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Salon>> {
        let salon = sqlx::query_as::<_, Salon>(
            r#"
            SELECT id, name, is_active, created_at, updated_at
            FROM salons
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(salon)
    }

    /// Inserts a salon.
    pub async fn insert(&self, salon: &Salon) -> DbResult<()> {
        debug!(id = %salon.id, name = %salon.name, "inserting salon");

        sqlx::query(
            r#"
            INSERT INTO salons (id, name, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&salon.id)
        .bind(&salon.name)
        .bind(salon.is_active)
        .bind(salon.created_at)
        .bind(salon.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Staff
// =============================================================================

/// Repository for staff records.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Gets a staff member by id within a salon.
    pub async fn get_by_id(&self, id: &str, salon_id: &str) -> DbResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            SELECT id, salon_id, first_name, last_name, role,
                   commission_rate_bps, is_active, created_at, updated_at
            FROM staff
            WHERE id = ?1 AND salon_id = ?2
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Gets a staff member by id within a salon, filtered to the barber
    /// role. A manager's id resolves to `None` here.
    pub async fn get_barber(&self, id: &str, salon_id: &str) -> DbResult<Option<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            r#"
            SELECT id, salon_id, first_name, last_name, role,
                   commission_rate_bps, is_active, created_at, updated_at
            FROM staff
            WHERE id = ?1 AND salon_id = ?2 AND role = 'barber'
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Inserts a staff member.
    pub async fn insert(&self, staff: &Staff) -> DbResult<()> {
        debug!(id = %staff.id, role = ?staff.role, "inserting staff");

        sqlx::query(
            r#"
            INSERT INTO staff (
                id, salon_id, first_name, last_name, role,
                commission_rate_bps, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&staff.id)
        .bind(&staff.salon_id)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(staff.role)
        .bind(staff.commission_rate_bps)
        .bind(staff.is_active)
        .bind(staff.created_at)
        .bind(staff.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a barber's commission rate. The rate on already-settled
    /// commissions is a snapshot and is not affected.
    pub async fn set_commission_rate(
        &self,
        id: &str,
        salon_id: &str,
        rate_bps: Option<i64>,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE staff SET commission_rate_bps = ?3, updated_at = ?4
            WHERE id = ?1 AND salon_id = ?2 AND role = 'barber'
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .bind(rate_bps)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Barber", id));
        }

        Ok(())
    }
}

// =============================================================================
// Clients
// =============================================================================

/// Repository for client records.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: SqlitePool,
}

impl ClientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClientRepository { pool }
    }

    /// Gets a client by id within a salon.
    pub async fn get_by_id(&self, id: &str, salon_id: &str) -> DbResult<Option<Client>> {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, salon_id, first_name, last_name, phone, created_at, updated_at
            FROM clients
            WHERE id = ?1 AND salon_id = ?2
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    /// Inserts a client.
    pub async fn insert(&self, client: &Client) -> DbResult<()> {
        debug!(id = %client.id, "inserting client");

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, salon_id, first_name, last_name, phone, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&client.id)
        .bind(&client.salon_id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.phone)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Service Catalog
// =============================================================================

/// Repository for the service catalog.
#[derive(Debug, Clone)]
pub struct ServiceItemRepository {
    pool: SqlitePool,
}

impl ServiceItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ServiceItemRepository { pool }
    }

    /// Gets a service by id within a salon (active or not; the engine
    /// decides whether inactive is acceptable).
    pub async fn get_by_id(&self, id: &str, salon_id: &str) -> DbResult<Option<ServiceItem>> {
        let service = sqlx::query_as::<_, ServiceItem>(
            r#"
            SELECT id, salon_id, name, duration_minutes, price_cents,
                   is_active, created_at, updated_at
            FROM services
            WHERE id = ?1 AND salon_id = ?2
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Lists active services of a salon, by name.
    pub async fn list_active(&self, salon_id: &str) -> DbResult<Vec<ServiceItem>> {
        let services = sqlx::query_as::<_, ServiceItem>(
            r#"
            SELECT id, salon_id, name, duration_minutes, price_cents,
                   is_active, created_at, updated_at
            FROM services
            WHERE salon_id = ?1 AND is_active = 1
            ORDER BY name
            "#,
        )
        .bind(salon_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Inserts a service.
    pub async fn insert(&self, service: &ServiceItem) -> DbResult<()> {
        debug!(id = %service.id, name = %service.name, "inserting service");

        sqlx::query(
            r#"
            INSERT INTO services (
                id, salon_id, name, duration_minutes, price_cents,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&service.id)
        .bind(&service.salon_id)
        .bind(&service.name)
        .bind(service.duration_minutes)
        .bind(service.price_cents)
        .bind(service.is_active)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a service's current catalog price.
    ///
    /// Booked appointments are unaffected: their lines carry the frozen
    /// snapshot taken at booking time.
    pub async fn update_price(&self, id: &str, salon_id: &str, price_cents: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE services SET price_cents = ?3, updated_at = ?4
            WHERE id = ?1 AND salon_id = ?2
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .bind(price_cents)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }

    /// Deactivates a service (soft delete).
    ///
    /// Services referenced by historical appointments are never
    /// hard-deleted.
    pub async fn soft_delete(&self, id: &str, salon_id: &str) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE services SET is_active = 0, updated_at = ?3
            WHERE id = ?1 AND salon_id = ?2
            "#,
        )
        .bind(id)
        .bind(salon_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Service", id));
        }

        Ok(())
    }
}

// =============================================================================
// Id Helpers
// =============================================================================

/// Generates a new entity id.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
