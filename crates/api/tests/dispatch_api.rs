//! HTTP-level tests for assignment management (`/api/motoristas-ordem-servico`).

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_order, driver_login, get_auth, operator, post_json_auth, put_json_auth,
};
use sisfun_core::dispatch::CheckpointKind;
use sisfun_db::models::dispatch::NewChecklist;
use sisfun_db::repositories::{DispatchRepo, VehicleRepo};
use sqlx::PgPool;

const BASE: &str = "/api/motoristas-ordem-servico";

#[sqlx::test(migrations = "../../db/migrations")]
async fn assign_creates_pending_and_starts_order(pool: PgPool) {
    let (_op, token) = operator(&pool).await;
    let (driver, _) = driver_login(&pool, "carlos").await;
    let order = create_order(&pool, "OS-100").await;
    let vehicle = VehicleRepo::create(&pool, "ABC1D23", Some("Rabecão"))
        .await
        .unwrap();
    let test = common::build_test_app(pool).await;
    let mut events = test.event_bus.subscribe();

    let body = serde_json::json!({
        "service_order_id": order.id,
        "driver_id": driver.id,
        "vehicle_id": vehicle.id,
        "notes": "Retirar às 14h",
    });
    let response = post_json_auth(test.app(), BASE, body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "pending");
    assert_eq!(json["data"]["order_status"], "in_progress");
    assert_eq!(json["data"]["order_number"], "OS-100");
    assert_eq!(json["data"]["vehicle_plate"], "ABC1D23");

    let event = events.try_recv().expect("dispatch.assigned should be published");
    assert_eq!(event.event_type, "dispatch.assigned");
    assert_eq!(event.payload["service_order_id"], order.id);
    assert_eq!(event.payload["driver_user_id"], driver.user_id.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assign_unknown_driver_is_404(pool: PgPool) {
    let (_op, token) = operator(&pool).await;
    let order = create_order(&pool, "OS-101").await;
    let test = common::build_test_app(pool).await;

    let body = serde_json::json!({ "service_order_id": order.id, "driver_id": 999_999 });
    let response = post_json_auth(test.app(), BASE, body, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn assign_to_finalized_order_is_409(pool: PgPool) {
    let (_op, token) = operator(&pool).await;
    let (driver, _) = driver_login(&pool, "carlos").await;
    let order = create_order(&pool, "OS-102").await;
    sqlx::query("UPDATE service_orders SET status = 'finalized' WHERE id = $1")
        .bind(order.id)
        .execute(&pool)
        .await
        .unwrap();
    let test = common::build_test_app(pool).await;

    let body = serde_json::json!({ "service_order_id": order.id, "driver_id": driver.id });
    let response = post_json_auth(test.app(), BASE, body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn drivers_cannot_use_office_routes(pool: PgPool) {
    let (_driver, token) = driver_login(&pool, "carlos").await;
    let test = common::build_test_app(pool).await;

    let response = get_auth(test.app(), BASE, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_is_rejected_once_departed(pool: PgPool) {
    let (_op, token) = operator(&pool).await;
    let (driver, _) = driver_login(&pool, "carlos").await;
    let (_order_id, assignment_id) = common::create_assignment(&pool, "OS-103", driver.id).await;
    let test = common::build_test_app(pool.clone()).await;
    let uri = format!("{BASE}/{assignment_id}");

    let response = put_json_auth(
        test.app(),
        &uri,
        serde_json::json!({ "notes": "Trocar de carro" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["notes"], "Trocar de carro");

    DispatchRepo::record_checkpoint(
        &pool,
        &NewChecklist {
            kind: CheckpointKind::Departure,
            dispatch_assignment_id: assignment_id,
            photos: [1, 2, 3, 4].map(|i| format!("checklist/{assignment_id}_departure_photo{i}.png")),
            notes: None,
        },
    )
    .await
    .unwrap()
    .expect("departure should apply");

    let response = put_json_auth(
        test.app(),
        &uri,
        serde_json::json!({ "notes": "tarde demais" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_status_and_rejects_unknown_status(pool: PgPool) {
    let (_op, token) = operator(&pool).await;
    let (driver, _) = driver_login(&pool, "carlos").await;
    common::create_assignment(&pool, "OS-104", driver.id).await;
    common::create_assignment(&pool, "OS-105", driver.id).await;
    let test = common::build_test_app(pool).await;

    let response = get_auth(test.app(), &format!("{BASE}?status=pending"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let response = get_auth(test.app(), &format!("{BASE}?status=completed"), &token).await;
    let json = body_json(response).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let response = get_auth(test.app(), &format!("{BASE}?status=flying"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checklists_are_empty_before_departure(pool: PgPool) {
    let (_op, token) = operator(&pool).await;
    let (driver, _) = driver_login(&pool, "carlos").await;
    let (_order_id, assignment_id) = common::create_assignment(&pool, "OS-106", driver.id).await;
    let test = common::build_test_app(pool).await;

    let response = get_auth(
        test.app(),
        &format!("{BASE}/{assignment_id}/checklists"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["departure"].is_null());
    assert!(json["data"]["arrival"].is_null());

    let response = get_auth(test.app(), &format!("{BASE}/999999/checklists"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
