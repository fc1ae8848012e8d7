//! Repository-level tests for the dispatch registry and checklist recorder.
//!
//! Exercises the full workflow against a real database:
//! - Assignment creation and the order moving to `in_progress`
//! - Guarded checkpoint transitions
//! - Arrival cascading to the parent order, never past a closed one
//! - Driver list filtering and detail joins

use sqlx::PgPool;
use sisfun_core::dispatch::{
    CheckpointKind, DRIVER_LIST_STATUSES, DRIVER_LIST_STATUSES_WITH_PENDING, STATUS_COMPLETED,
    STATUS_IN_PROGRESS, STATUS_PENDING,
};
use sisfun_core::service_order::{STATUS_CANCELLED, STATUS_FINALIZED, STATUS_OPEN};
use sisfun_db::models::dispatch::{
    CreateDispatchAssignment, DispatchQuery, NewChecklist, UpdateDispatchAssignment,
};
use sisfun_db::models::driver::CreateDriver;
use sisfun_db::models::service_order::CreateServiceOrder;
use sisfun_db::repositories::{DispatchRepo, DriverRepo, ServiceOrderRepo, VehicleRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_order(number: &str) -> CreateServiceOrder {
    CreateServiceOrder {
        order_number: number.to_string(),
        deceased_name: "Maria da Silva".to_string(),
        requester_name: Some("João da Silva".to_string()),
        requester_phone: None,
        origin_address: Some("Hospital Municipal".to_string()),
        destination_address: Some("Cemitério São João".to_string()),
        scheduled_at: None,
        notes: None,
    }
}

fn new_driver(name: &str) -> CreateDriver {
    CreateDriver {
        user_id: None,
        name: name.to_string(),
        phone: None,
        license_number: None,
    }
}

fn photos(kind: CheckpointKind, assignment_id: i64) -> NewChecklist {
    NewChecklist {
        kind,
        dispatch_assignment_id: assignment_id,
        photos: [1, 2, 3, 4].map(|i| format!("checklist/{assignment_id}_{}_photo{i}.png", kind.label())),
        notes: Some("tudo certo".to_string()),
    }
}

/// Create an order, a driver, a vehicle and a pending assignment linking them.
async fn seed_assignment(pool: &PgPool, number: &str) -> (i64, i64, i64) {
    let order = ServiceOrderRepo::create(pool, &new_order(number), None)
        .await
        .unwrap();
    let driver = DriverRepo::create(pool, &new_driver("Carlos")).await.unwrap();
    let vehicle = VehicleRepo::create(pool, &format!("ABC{:04}", order.id % 10_000), Some("Rabecão"))
        .await
        .unwrap();
    let assignment = DispatchRepo::create(
        pool,
        &CreateDispatchAssignment {
            service_order_id: order.id,
            driver_id: driver.id,
            vehicle_id: Some(vehicle.id),
            notes: None,
        },
    )
    .await
    .unwrap();
    (order.id, driver.id, assignment.id)
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_assignment_starts_pending_and_opens_order(pool: PgPool) {
    let order = ServiceOrderRepo::create(&pool, &new_order("OS-1"), None)
        .await
        .unwrap();
    assert_eq!(order.status, STATUS_OPEN);

    let driver = DriverRepo::create(&pool, &new_driver("Ana")).await.unwrap();
    let assignment = DispatchRepo::create(
        &pool,
        &CreateDispatchAssignment {
            service_order_id: order.id,
            driver_id: driver.id,
            vehicle_id: None,
            notes: Some("retirar às 14h".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(assignment.status, STATUS_PENDING);
    assert!(assignment.departure_time.is_none());
    assert!(assignment.arrival_time.is_none());

    let order = ServiceOrderRepo::find_by_id(&pool, order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, "in_progress");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_assignment_unknown_driver_fails(pool: PgPool) {
    let order = ServiceOrderRepo::create(&pool, &new_order("OS-2"), None)
        .await
        .unwrap();
    let result = DispatchRepo::create(
        &pool,
        &CreateDispatchAssignment {
            service_order_id: order.id,
            driver_id: 999_999,
            vehicle_id: None,
            notes: None,
        },
    )
    .await;
    assert!(result.is_err(), "FK violation must surface as an error");

    // The failed transaction must not have touched the order.
    let order = ServiceOrderRepo::find_by_id(&pool, order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, STATUS_OPEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_joins_order_driver_and_vehicle(pool: PgPool) {
    let (order_id, _driver_id, assignment_id) = seed_assignment(&pool, "OS-3").await;

    let detail = DispatchRepo::find_detail(&pool, assignment_id)
        .await
        .unwrap()
        .expect("detail should exist");
    assert_eq!(detail.service_order_id, order_id);
    assert_eq!(detail.order_number, "OS-3");
    assert_eq!(detail.deceased_name, "Maria da Silva");
    assert_eq!(detail.driver_name, "Carlos");
    assert_eq!(detail.vehicle_model.as_deref(), Some("Rabecão"));
    assert!(detail.vehicle_plate.is_some());

    assert!(DispatchRepo::find_detail(&pool, 999_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_only_while_pending(pool: PgPool) {
    let (_, _, assignment_id) = seed_assignment(&pool, "OS-4").await;
    let patch = UpdateDispatchAssignment {
        vehicle_id: None,
        notes: Some("trocar viatura".to_string()),
    };

    let updated = DispatchRepo::update_pending(&pool, assignment_id, &patch)
        .await
        .unwrap()
        .expect("pending assignment is editable");
    assert_eq!(updated.notes.as_deref(), Some("trocar viatura"));

    DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Departure, assignment_id))
        .await
        .unwrap()
        .unwrap();

    let after_departure = DispatchRepo::update_pending(&pool, assignment_id, &patch)
        .await
        .unwrap();
    assert!(after_departure.is_none());
}

// ---------------------------------------------------------------------------
// Checklist recorder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_departure_moves_to_in_progress(pool: PgPool) {
    let (_, _, assignment_id) = seed_assignment(&pool, "OS-5").await;

    let record =
        DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Departure, assignment_id))
            .await
            .unwrap()
            .expect("pending assignment accepts departure");

    assert_eq!(record.assignment.status, STATUS_IN_PROGRESS);
    assert!(record.assignment.departure_time.is_some());
    assert!(record.assignment.arrival_time.is_none());
    assert_eq!(record.checklist.dispatch_assignment_id, assignment_id);
    assert!(record.checklist.photo1.ends_with("photo1.png"));
    assert_eq!(record.checklist.notes.as_deref(), Some("tudo certo"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_arrival_completes_and_finalizes_order(pool: PgPool) {
    let (order_id, _, assignment_id) = seed_assignment(&pool, "OS-6").await;

    DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Departure, assignment_id))
        .await
        .unwrap()
        .unwrap();
    let record =
        DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Arrival, assignment_id))
            .await
            .unwrap()
            .expect("in-progress assignment accepts arrival");

    assert_eq!(record.assignment.status, STATUS_COMPLETED);
    assert!(record.assignment.departure_time.is_some());
    assert!(record.assignment.arrival_time.is_some());

    let order = ServiceOrderRepo::find_by_id(&pool, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, STATUS_FINALIZED);

    let pair = DispatchRepo::checklists(&pool, assignment_id).await.unwrap();
    assert!(pair.departure.is_some());
    assert!(pair.arrival.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_arrival_before_departure_is_refused(pool: PgPool) {
    let (order_id, _, assignment_id) = seed_assignment(&pool, "OS-7").await;

    let record =
        DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Arrival, assignment_id))
            .await
            .unwrap();
    assert!(record.is_none());

    let assignment = DispatchRepo::find_by_id(&pool, assignment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.status, STATUS_PENDING);
    assert!(DispatchRepo::find_checklist(&pool, CheckpointKind::Arrival, assignment_id)
        .await
        .unwrap()
        .is_none());

    let order = ServiceOrderRepo::find_by_id(&pool, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(order.status, STATUS_FINALIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_arrival_on_cancelled_order_is_refused(pool: PgPool) {
    let (order_id, _, assignment_id) = seed_assignment(&pool, "OS-7b").await;
    DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Departure, assignment_id))
        .await
        .unwrap()
        .unwrap();

    sqlx::query("UPDATE service_orders SET status = $2 WHERE id = $1")
        .bind(order_id)
        .bind(STATUS_CANCELLED)
        .execute(&pool)
        .await
        .unwrap();

    let record =
        DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Arrival, assignment_id))
            .await
            .unwrap();
    assert!(record.is_none());

    let assignment = DispatchRepo::find_by_id(&pool, assignment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(assignment.status, STATUS_IN_PROGRESS);

    let order = ServiceOrderRepo::find_by_id(&pool, order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, STATUS_CANCELLED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repeated_departure_is_refused(pool: PgPool) {
    let (_, _, assignment_id) = seed_assignment(&pool, "OS-8").await;
    let input = photos(CheckpointKind::Departure, assignment_id);

    assert!(DispatchRepo::record_checkpoint(&pool, &input)
        .await
        .unwrap()
        .is_some());
    assert!(DispatchRepo::record_checkpoint(&pool, &input)
        .await
        .unwrap()
        .is_none());

    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM departure_checklists WHERE dispatch_assignment_id = $1",
    )
    .bind(assignment_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count.0, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_checklist_unique_per_assignment(pool: PgPool) {
    let (_, _, assignment_id) = seed_assignment(&pool, "OS-9").await;

    let insert = "INSERT INTO departure_checklists
        (dispatch_assignment_id, photo1, photo2, photo3, photo4) VALUES ($1, 'a', 'b', 'c', 'd')";
    sqlx::query(insert).bind(assignment_id).execute(&pool).await.unwrap();
    let err = sqlx::query(insert)
        .bind(assignment_id)
        .execute(&pool)
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_departure_checklists_assignment"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_driver_list_filters_by_status(pool: PgPool) {
    let driver = DriverRepo::create(&pool, &new_driver("Paulo")).await.unwrap();
    let mut ids = Vec::new();
    for n in 0..3 {
        let order = ServiceOrderRepo::create(&pool, &new_order(&format!("OS-L{n}")), None)
            .await
            .unwrap();
        let a = DispatchRepo::create(
            &pool,
            &CreateDispatchAssignment {
                service_order_id: order.id,
                driver_id: driver.id,
                vehicle_id: None,
                notes: None,
            },
        )
        .await
        .unwrap();
        ids.push(a.id);
    }
    // ids[0] stays pending, ids[1] in progress, ids[2] completed.
    DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Departure, ids[1]))
        .await
        .unwrap()
        .unwrap();
    DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Departure, ids[2]))
        .await
        .unwrap()
        .unwrap();
    DispatchRepo::record_checkpoint(&pool, &photos(CheckpointKind::Arrival, ids[2]))
        .await
        .unwrap()
        .unwrap();

    let default_list = DispatchRepo::list_for_driver(&pool, driver.id, DRIVER_LIST_STATUSES)
        .await
        .unwrap();
    let listed: Vec<i64> = default_list.iter().map(|d| d.id).collect();
    assert_eq!(listed.len(), 2);
    assert!(!listed.contains(&ids[0]), "pending must be hidden by default");
    assert!(listed.contains(&ids[1]));
    assert!(listed.contains(&ids[2]));

    let with_pending =
        DispatchRepo::list_for_driver(&pool, driver.id, DRIVER_LIST_STATUSES_WITH_PENDING)
            .await
            .unwrap();
    assert_eq!(with_pending.len(), 3);

    let other = DriverRepo::create(&pool, &new_driver("Outro")).await.unwrap();
    assert!(DispatchRepo::list_for_driver(&pool, other.id, DRIVER_LIST_STATUSES_WITH_PENDING)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_office_list_filters(pool: PgPool) {
    let (order_id, driver_id, assignment_id) = seed_assignment(&pool, "OS-10").await;
    seed_assignment(&pool, "OS-11").await;

    let by_order = DispatchRepo::list(
        &pool,
        &DispatchQuery {
            service_order_id: Some(order_id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_order.len(), 1);
    assert_eq!(by_order[0].id, assignment_id);

    let by_driver_and_status = DispatchRepo::list(
        &pool,
        &DispatchQuery {
            driver_id: Some(driver_id),
            status: Some(STATUS_COMPLETED.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(by_driver_and_status.is_empty());

    let all = DispatchRepo::list(&pool, &DispatchQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}
