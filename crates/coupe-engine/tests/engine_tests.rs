//! End-to-end tests for the scheduling and settlement engines against an
//! in-memory SQLite database.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use coupe_core::{
    AppointmentStatus, Client, PaymentMethod, Salon, ServiceItem, Staff, StaffRole,
    TransactionStatus,
};
use coupe_db::{generate_id, Database, DbConfig};
use coupe_engine::{
    ConflictCode, CreateAppointmentRequest, CreateTransactionRequest, DateRange, EngineError,
    PaymentRequest, SchedulingEngine, SettlementEngine, TenantContext,
};

const DAY: &str = "2025-06-02";

struct Fixture {
    db: Database,
    scheduling: SchedulingEngine,
    settlement: SettlementEngine,
    ctx: TenantContext,
    other_ctx: TenantContext,
    barber_id: String,
    no_rate_barber_id: String,
    manager_id: String,
    client_id: String,
    cut_id: String,
    beard_id: String,
}

fn day() -> NaiveDate {
    DAY.parse().unwrap()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, minute, 0).unwrap()
}

async fn setup() -> Fixture {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let now = Utc::now();

    let salon_id = generate_id();
    db.salons()
        .insert(&Salon {
            id: salon_id.clone(),
            name: "Coupe Test Salon".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let barber_id = generate_id();
    db.staff()
        .insert(&Staff {
            id: barber_id.clone(),
            salon_id: salon_id.clone(),
            first_name: "Ana".to_string(),
            last_name: "Torres".to_string(),
            role: StaffRole::Barber,
            commission_rate_bps: Some(3333),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let no_rate_barber_id = generate_id();
    db.staff()
        .insert(&Staff {
            id: no_rate_barber_id.clone(),
            salon_id: salon_id.clone(),
            first_name: "Beto".to_string(),
            last_name: "Silva".to_string(),
            role: StaffRole::Barber,
            commission_rate_bps: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let manager_id = generate_id();
    db.staff()
        .insert(&Staff {
            id: manager_id.clone(),
            salon_id: salon_id.clone(),
            first_name: "Carla".to_string(),
            last_name: "Reyes".to_string(),
            role: StaffRole::Manager,
            commission_rate_bps: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let client_id = generate_id();
    db.clients()
        .insert(&Client {
            id: client_id.clone(),
            salon_id: salon_id.clone(),
            first_name: "Diego".to_string(),
            last_name: "Mora".to_string(),
            phone: None,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let cut_id = generate_id();
    db.services()
        .insert(&ServiceItem {
            id: cut_id.clone(),
            salon_id: salon_id.clone(),
            name: "Classic Cut".to_string(),
            duration_minutes: 30,
            price_cents: 150_000,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    let beard_id = generate_id();
    db.services()
        .insert(&ServiceItem {
            id: beard_id.clone(),
            salon_id: salon_id.clone(),
            name: "Beard Trim".to_string(),
            duration_minutes: 15,
            price_cents: 50_000,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();

    Fixture {
        scheduling: SchedulingEngine::new(db.clone()),
        settlement: SettlementEngine::new(db.clone()),
        db,
        ctx: TenantContext::new(salon_id).unwrap(),
        other_ctx: TenantContext::new(generate_id()).unwrap(),
        barber_id,
        no_rate_barber_id,
        manager_id,
        client_id,
        cut_id,
        beard_id,
    }
}

impl Fixture {
    fn booking(&self, hour: u32, minute: u32, service_ids: Vec<String>) -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            barber_id: self.barber_id.clone(),
            client_id: Some(self.client_id.clone()),
            start_time: at(hour, minute),
            service_ids,
            notes: None,
        }
    }

    /// Books and walks an appointment to `completed`.
    async fn completed_appointment(&self, hour: u32) -> String {
        let appt = self
            .scheduling
            .create_appointment(&self.ctx, self.booking(hour, 0, vec![self.cut_id.clone()]))
            .await
            .unwrap();
        self.scheduling
            .update_status(&self.ctx, &appt.id, AppointmentStatus::InProgress)
            .await
            .unwrap();
        self.scheduling
            .update_status(&self.ctx, &appt.id, AppointmentStatus::Completed)
            .await
            .unwrap();
        appt.id
    }
}

fn assert_conflict(err: EngineError, code: ConflictCode) {
    match err {
        EngineError::Conflict { code: got, .. } => assert_eq!(got, code),
        other => panic!("expected conflict {code}, got {other:?}"),
    }
}

fn assert_not_found(err: EngineError) {
    assert!(
        matches!(err, EngineError::NotFound { .. }),
        "expected NotFound, got {err:?}"
    );
}

// ============================================================================
// Scheduling
// ============================================================================

#[tokio::test]
async fn test_create_appointment_snapshots_services() {
    let fx = setup().await;

    let view = fx
        .scheduling
        .create_appointment(
            &fx.ctx,
            fx.booking(10, 0, vec![fx.cut_id.clone(), fx.beard_id.clone()]),
        )
        .await
        .unwrap();

    assert_eq!(view.status, AppointmentStatus::Scheduled);
    assert_eq!(view.start_time, at(10, 0));
    // 30 + 15 minutes of services
    assert_eq!(view.end_time, at(10, 45));
    assert_eq!(view.services.len(), 2);
    assert_eq!(view.services[0].name, "Classic Cut");
    assert_eq!(view.services[1].name, "Beard Trim");
    assert_eq!(view.total_cents, 200_000);
    assert_eq!(view.barber_name, "Ana Torres");
    assert_eq!(view.client_name.as_deref(), Some("Diego Mora"));

    // Catalog edits after booking must not leak into the snapshot.
    fx.db
        .services()
        .update_price(&fx.cut_id, fx.ctx.salon_id(), 999_999)
        .await
        .unwrap();
    let reread = fx.scheduling.get(&fx.ctx, &view.id).await.unwrap();
    assert_eq!(reread.services[0].price_cents, 150_000);
    assert_eq!(reread.total_cents, 200_000);
}

#[tokio::test]
async fn test_create_appointment_requires_services() {
    let fx = setup().await;
    let err = fx
        .scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)), "{err:?}");
}

#[tokio::test]
async fn test_create_appointment_unknown_barber() {
    let fx = setup().await;
    let mut req = fx.booking(10, 0, vec![fx.cut_id.clone()]);
    req.barber_id = generate_id();
    let err = fx
        .scheduling
        .create_appointment(&fx.ctx, req)
        .await
        .unwrap_err();
    assert_not_found(err);
}

#[tokio::test]
async fn test_create_appointment_manager_is_not_a_barber() {
    let fx = setup().await;
    let mut req = fx.booking(10, 0, vec![fx.cut_id.clone()]);
    req.barber_id = fx.manager_id.clone();
    let err = fx
        .scheduling
        .create_appointment(&fx.ctx, req)
        .await
        .unwrap_err();
    assert_not_found(err);
}

#[tokio::test]
async fn test_overlap_rejected_for_same_barber() {
    let fx = setup().await;
    fx.scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();

    // 10:20 falls inside the existing 10:00-10:30 booking.
    let err = fx
        .scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 20, vec![fx.cut_id.clone()]))
        .await
        .unwrap_err();
    assert_conflict(err, ConflictCode::AppointmentOverlap);

    // Back-to-back is fine: intervals are half-open.
    fx.scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 30, vec![fx.cut_id.clone()]))
        .await
        .unwrap();

    // Another barber can take the contested slot.
    let mut req = fx.booking(10, 20, vec![fx.cut_id.clone()]);
    req.barber_id = fx.no_rate_barber_id.clone();
    fx.scheduling
        .create_appointment(&fx.ctx, req)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancelled_appointment_frees_the_slot() {
    let fx = setup().await;
    let appt = fx
        .scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();
    fx.scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    fx.scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_show_appointment_frees_the_slot() {
    let fx = setup().await;
    let appt = fx
        .scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();
    fx.scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::NoShow)
        .await
        .unwrap();

    fx.scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_bookings_have_one_winner() {
    let fx = setup().await;

    let a = {
        let engine = fx.scheduling.clone();
        let ctx = fx.ctx.clone();
        let req = fx.booking(10, 0, vec![fx.cut_id.clone()]);
        tokio::spawn(async move { engine.create_appointment(&ctx, req).await })
    };
    let b = {
        let engine = fx.scheduling.clone();
        let ctx = fx.ctx.clone();
        let req = fx.booking(10, 15, vec![fx.cut_id.clone()]);
        tokio::spawn(async move { engine.create_appointment(&ctx, req).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one of two overlapping bookings may land");
    let loser = results.into_iter().find(|r| r.is_err()).unwrap();
    assert_conflict(loser.unwrap_err(), ConflictCode::AppointmentOverlap);
}

#[tokio::test]
async fn test_status_machine_edges() {
    let fx = setup().await;
    let appt = fx
        .scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();

    // scheduled -> completed skips in_progress and is rejected.
    let err = fx
        .scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::Completed)
        .await
        .unwrap_err();
    assert_conflict(err, ConflictCode::InvalidStatusTransition);

    let v1 = fx
        .scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(v1.status, AppointmentStatus::InProgress);

    // Same-status request is a no-op, not an error and not a write.
    let again = fx
        .scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::InProgress)
        .await
        .unwrap();
    assert_eq!(again.version, v1.version);

    let v2 = fx
        .scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::Completed)
        .await
        .unwrap();
    assert_eq!(v2.status, AppointmentStatus::Completed);
    assert!(v2.version > v1.version);

    // Terminal states accept nothing else.
    let err = fx
        .scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::Cancelled)
        .await
        .unwrap_err();
    assert_conflict(err, ConflictCode::InvalidStatusTransition);
}

#[tokio::test]
async fn test_list_by_day_range_and_barber() {
    let fx = setup().await;
    fx.scheduling
        .create_appointment(&fx.ctx, fx.booking(9, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();
    let mut other = fx.booking(9, 0, vec![fx.beard_id.clone()]);
    other.barber_id = fx.no_rate_barber_id.clone();
    fx.scheduling
        .create_appointment(&fx.ctx, other)
        .await
        .unwrap();

    let range = DateRange::single_day(day());
    let all = fx.scheduling.list(&fx.ctx, range, None).await.unwrap();
    assert_eq!(all.len(), 2);

    let mine = fx
        .scheduling
        .list(&fx.ctx, range, Some(&fx.barber_id))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].barber_id, fx.barber_id);

    // The day before is empty.
    let before = DateRange::single_day(day().pred_opt().unwrap());
    assert!(fx
        .scheduling
        .list(&fx.ctx, before, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_to_cash_queue_drains_on_settlement() {
    let fx = setup().await;
    let appt_id = fx.completed_appointment(10).await;
    let range = DateRange::single_day(day());

    let pending = fx.scheduling.list_to_cash(&fx.ctx, range).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, appt_id);

    fx.settlement
        .create_transaction(
            &fx.ctx,
            CreateTransactionRequest {
                appointment_id: appt_id,
                recorded_by: fx.manager_id.clone(),
                payments: vec![PaymentRequest {
                    method: PaymentMethod::Cash,
                    amount_cents: 150_000,
                }],
            },
        )
        .await
        .unwrap();

    assert!(fx
        .scheduling
        .list_to_cash(&fx.ctx, range)
        .await
        .unwrap()
        .is_empty());
}

// ============================================================================
// Settlement
// ============================================================================

#[tokio::test]
async fn test_settlement_computes_commission() {
    let fx = setup().await;
    let appt_id = fx.completed_appointment(10).await;

    let view = fx
        .settlement
        .create_transaction(
            &fx.ctx,
            CreateTransactionRequest {
                appointment_id: appt_id,
                recorded_by: fx.manager_id.clone(),
                payments: vec![
                    PaymentRequest {
                        method: PaymentMethod::Cash,
                        amount_cents: 100_000,
                    },
                    PaymentRequest {
                        method: PaymentMethod::Card,
                        amount_cents: 50_000,
                    },
                ],
            },
        )
        .await
        .unwrap();

    assert_eq!(view.status, TransactionStatus::Completed);
    assert_eq!(view.total_cents, 150_000);
    assert_eq!(view.payments.len(), 2);
    // 1500.00 at 33.33% rounds half-up to exactly 499.95.
    assert_eq!(view.commission_rate_bps, Some(3333));
    assert_eq!(view.commission_cents, Some(49_995));
}

#[tokio::test]
async fn test_settlement_without_rate_earns_zero() {
    let fx = setup().await;
    let mut req = fx.booking(10, 0, vec![fx.cut_id.clone()]);
    req.barber_id = fx.no_rate_barber_id.clone();
    let appt = fx
        .scheduling
        .create_appointment(&fx.ctx, req)
        .await
        .unwrap();
    fx.scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::InProgress)
        .await
        .unwrap();
    fx.scheduling
        .update_status(&fx.ctx, &appt.id, AppointmentStatus::Completed)
        .await
        .unwrap();

    let view = fx
        .settlement
        .create_transaction(
            &fx.ctx,
            CreateTransactionRequest {
                appointment_id: appt.id,
                recorded_by: fx.manager_id.clone(),
                payments: vec![PaymentRequest {
                    method: PaymentMethod::Transfer,
                    amount_cents: 150_000,
                }],
            },
        )
        .await
        .unwrap();

    assert_eq!(view.commission_rate_bps, Some(0));
    assert_eq!(view.commission_cents, Some(0));
}

#[tokio::test]
async fn test_settlement_rejects_uncompleted_appointment() {
    let fx = setup().await;
    let appt = fx
        .scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();

    let err = fx
        .settlement
        .create_transaction(
            &fx.ctx,
            CreateTransactionRequest {
                appointment_id: appt.id,
                recorded_by: fx.manager_id.clone(),
                payments: vec![PaymentRequest {
                    method: PaymentMethod::Cash,
                    amount_cents: 150_000,
                }],
            },
        )
        .await
        .unwrap_err();
    assert_conflict(err, ConflictCode::InvalidStatus);
}

#[tokio::test]
async fn test_settlement_rejects_off_by_one_cent() {
    let fx = setup().await;
    let appt_id = fx.completed_appointment(10).await;

    for cents in [149_999, 150_001] {
        let err = fx
            .settlement
            .create_transaction(
                &fx.ctx,
                CreateTransactionRequest {
                    appointment_id: appt_id.clone(),
                    recorded_by: fx.manager_id.clone(),
                    payments: vec![PaymentRequest {
                        method: PaymentMethod::Cash,
                        amount_cents: cents,
                    }],
                },
            )
            .await
            .unwrap_err();
        assert_conflict(err, ConflictCode::PaymentMismatch);
    }

    // A failed settlement leaves the appointment cashable.
    fx.settlement
        .create_transaction(
            &fx.ctx,
            CreateTransactionRequest {
                appointment_id: appt_id,
                recorded_by: fx.manager_id.clone(),
                payments: vec![PaymentRequest {
                    method: PaymentMethod::Cash,
                    amount_cents: 150_000,
                }],
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_settlement_is_once_per_appointment() {
    let fx = setup().await;
    let appt_id = fx.completed_appointment(10).await;
    let request = CreateTransactionRequest {
        appointment_id: appt_id,
        recorded_by: fx.manager_id.clone(),
        payments: vec![PaymentRequest {
            method: PaymentMethod::Cash,
            amount_cents: 150_000,
        }],
    };

    fx.settlement
        .create_transaction(&fx.ctx, request.clone())
        .await
        .unwrap();
    let err = fx
        .settlement
        .create_transaction(&fx.ctx, request)
        .await
        .unwrap_err();
    assert_conflict(err, ConflictCode::AlreadyCashed);
}

#[tokio::test]
async fn test_void_is_idempotent_and_preserves_commission() {
    let fx = setup().await;
    let appt_id = fx.completed_appointment(10).await;
    let tx = fx
        .settlement
        .create_transaction(
            &fx.ctx,
            CreateTransactionRequest {
                appointment_id: appt_id,
                recorded_by: fx.manager_id.clone(),
                payments: vec![PaymentRequest {
                    method: PaymentMethod::Cash,
                    amount_cents: 150_000,
                }],
            },
        )
        .await
        .unwrap();

    let commission_before = fx
        .db
        .settlements()
        .get_commission(&tx.id)
        .await
        .unwrap()
        .unwrap();

    let voided = fx.settlement.void_transaction(&fx.ctx, &tx.id).await.unwrap();
    assert_eq!(voided.status, TransactionStatus::Voided);

    // Voiding again: same terminal state, no version bump.
    let again = fx.settlement.void_transaction(&fx.ctx, &tx.id).await.unwrap();
    assert_eq!(again.status, TransactionStatus::Voided);
    assert_eq!(again.version, voided.version);

    // The commission row is untouched by the void.
    let commission_after = fx
        .db
        .settlements()
        .get_commission(&tx.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(commission_after.amount_cents, commission_before.amount_cents);
    assert_eq!(
        commission_after.rate_applied_bps,
        commission_before.rate_applied_bps
    );
    assert_eq!(commission_after.created_at, commission_before.created_at);
}

#[tokio::test]
async fn test_list_commissions_by_barber() {
    let fx = setup().await;
    let appt_id = fx.completed_appointment(10).await;
    fx.settlement
        .create_transaction(
            &fx.ctx,
            CreateTransactionRequest {
                appointment_id: appt_id,
                recorded_by: fx.manager_id.clone(),
                payments: vec![PaymentRequest {
                    method: PaymentMethod::Cash,
                    amount_cents: 150_000,
                }],
            },
        )
        .await
        .unwrap();

    let range = DateRange::single_day(Utc::now().date_naive());
    let all = fx
        .settlement
        .list_commissions(&fx.ctx, range, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].barber_name, "Ana Torres");
    assert_eq!(all[0].amount_cents, 49_995);

    let none = fx
        .settlement
        .list_commissions(&fx.ctx, range, Some(&fx.no_rate_barber_id))
        .await
        .unwrap();
    assert!(none.is_empty());
}

// ============================================================================
// Tenant isolation
// ============================================================================

#[tokio::test]
async fn test_cross_tenant_reads_are_not_found() {
    let fx = setup().await;
    let appt = fx
        .scheduling
        .create_appointment(&fx.ctx, fx.booking(10, 0, vec![fx.cut_id.clone()]))
        .await
        .unwrap();

    let err = fx.scheduling.get(&fx.other_ctx, &appt.id).await.unwrap_err();
    assert_not_found(err);

    let err = fx
        .scheduling
        .update_status(&fx.other_ctx, &appt.id, AppointmentStatus::Cancelled)
        .await
        .unwrap_err();
    assert_not_found(err);

    let range = DateRange::single_day(day());
    assert!(fx
        .scheduling
        .list(&fx.other_ctx, range, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_cross_tenant_settlement_is_not_found() {
    let fx = setup().await;
    let appt_id = fx.completed_appointment(10).await;
    let tx = fx
        .settlement
        .create_transaction(
            &fx.ctx,
            CreateTransactionRequest {
                appointment_id: appt_id.clone(),
                recorded_by: fx.manager_id.clone(),
                payments: vec![PaymentRequest {
                    method: PaymentMethod::Cash,
                    amount_cents: 150_000,
                }],
            },
        )
        .await
        .unwrap();

    let err = fx.settlement.get(&fx.other_ctx, &tx.id).await.unwrap_err();
    assert_not_found(err);
    let err = fx
        .settlement
        .void_transaction(&fx.other_ctx, &tx.id)
        .await
        .unwrap_err();
    assert_not_found(err);

    // Settling someone else's appointment also reads as nonexistent.
    let err = fx
        .settlement
        .create_transaction(
            &fx.other_ctx,
            CreateTransactionRequest {
                appointment_id: appt_id,
                recorded_by: fx.manager_id.clone(),
                payments: vec![PaymentRequest {
                    method: PaymentMethod::Cash,
                    amount_cents: 150_000,
                }],
            },
        )
        .await
        .unwrap_err();
    assert_not_found(err);
}

#[tokio::test]
async fn test_file_backed_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coupe.db");
    let now = Utc::now();

    let salon_id = generate_id();
    let appointment_id;
    {
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.salons()
            .insert(&Salon {
                id: salon_id.clone(),
                name: "Persistent Salon".to_string(),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        let barber_id = generate_id();
        db.staff()
            .insert(&Staff {
                id: barber_id.clone(),
                salon_id: salon_id.clone(),
                first_name: "Ana".to_string(),
                last_name: "Torres".to_string(),
                role: StaffRole::Barber,
                commission_rate_bps: Some(3333),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        let cut_id = generate_id();
        db.services()
            .insert(&ServiceItem {
                id: cut_id.clone(),
                salon_id: salon_id.clone(),
                name: "Classic Cut".to_string(),
                duration_minutes: 30,
                price_cents: 150_000,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let engine = SchedulingEngine::new(db.clone());
        let ctx = TenantContext::new(salon_id.clone()).unwrap();
        let view = engine
            .create_appointment(
                &ctx,
                CreateAppointmentRequest {
                    barber_id,
                    client_id: None,
                    start_time: at(10, 0),
                    service_ids: vec![cut_id],
                    notes: Some("walk-in".to_string()),
                },
            )
            .await
            .unwrap();
        appointment_id = view.id;
        db.close().await;
    }

    // Fresh pool over the same file; migrations are idempotent.
    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    let engine = SchedulingEngine::new(db);
    let ctx = TenantContext::new(salon_id).unwrap();
    let view = engine.get(&ctx, &appointment_id).await.unwrap();
    assert_eq!(view.total_cents, 150_000);
    assert_eq!(view.notes.as_deref(), Some("walk-in"));
}

#[tokio::test]
async fn test_blank_tenant_is_rejected() {
    let err = TenantContext::new("  ").unwrap_err();
    assert!(matches!(err, EngineError::MissingTenantContext));
}
