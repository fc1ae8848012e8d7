//! HTTP-level tests for chat messaging (`/api/chat`).

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, post_json_auth, token_for, ROLE_ID_DRIVER, ROLE_ID_OPERATOR};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn send_and_read_conversation(pool: PgPool) {
    let ana = create_user(&pool, "ana", ROLE_ID_OPERATOR).await;
    let beto = create_user(&pool, "beto", ROLE_ID_DRIVER).await;
    let test = common::build_test_app(pool).await;
    let ana_token = token_for(ana.id, "operador");
    let beto_token = token_for(beto.id, "motorista");
    let mut events = test.event_bus.subscribe();

    let body = serde_json::json!({ "recipient_id": beto.id, "body": "  Saída às 14h  " });
    let response = post_json_auth(test.app(), "/api/chat/messages", body, &ana_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["body"], "Saída às 14h");
    assert!(json["data"]["read_at"].is_null());

    let event = events.try_recv().expect("chat.message_sent should be published");
    assert_eq!(event.event_type, "chat.message_sent");
    assert_eq!(event.payload["recipient_id"], beto.id);

    let body = serde_json::json!({ "recipient_id": ana.id, "body": "Ok" });
    let response = post_json_auth(test.app(), "/api/chat/messages", body, &beto_token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Both sides see the same history, oldest first.
    for (other, token) in [(beto.id, &ana_token), (ana.id, &beto_token)] {
        let response =
            get_auth(test.app(), &format!("/api/chat/conversations/{other}"), token).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let bodies: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["body"].as_str().unwrap())
            .collect();
        assert_eq!(bodies, ["Saída às 14h", "Ok"]);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unread_counts_and_mark_read(pool: PgPool) {
    let ana = create_user(&pool, "ana", ROLE_ID_OPERATOR).await;
    let beto = create_user(&pool, "beto", ROLE_ID_DRIVER).await;
    let test = common::build_test_app(pool).await;
    let ana_token = token_for(ana.id, "operador");
    let beto_token = token_for(beto.id, "motorista");

    for text in ["um", "dois"] {
        let body = serde_json::json!({ "recipient_id": beto.id, "body": text });
        post_json_auth(test.app(), "/api/chat/messages", body, &ana_token).await;
    }

    let json = body_json(get_auth(test.app(), "/api/chat/unread", &beto_token).await).await;
    assert_eq!(json["data"][0]["sender_id"], ana.id);
    assert_eq!(json["data"][0]["count"], 2);

    let mut events = test.event_bus.subscribe();
    let response = post_json_auth(
        test.app(),
        &format!("/api/chat/conversations/{}/read", ana.id),
        serde_json::json!({}),
        &beto_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["updated"], 2);

    let event = events.try_recv().expect("chat.messages_read should be published");
    assert_eq!(event.payload["reader_id"], beto.id);
    assert_eq!(event.payload["sender_id"], ana.id);

    let json = body_json(get_auth(test.app(), "/api/chat/unread", &beto_token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_messages_are_rejected(pool: PgPool) {
    let ana = create_user(&pool, "ana", ROLE_ID_OPERATOR).await;
    let test = common::build_test_app(pool).await;
    let token = token_for(ana.id, "operador");

    let to_self = serde_json::json!({ "recipient_id": ana.id, "body": "oi" });
    let response = post_json_auth(test.app(), "/api/chat/messages", to_self, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let blank = serde_json::json!({ "recipient_id": 999_999, "body": "   " });
    let response = post_json_auth(test.app(), "/api/chat/messages", blank, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let unknown = serde_json::json!({ "recipient_id": 999_999, "body": "oi" });
    let response = post_json_auth(test.app(), "/api/chat/messages", unknown, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contacts_carry_presence(pool: PgPool) {
    let ana = create_user(&pool, "ana", ROLE_ID_OPERATOR).await;
    let beto = create_user(&pool, "beto", ROLE_ID_DRIVER).await;
    create_user(&pool, "caio", ROLE_ID_DRIVER).await;
    let test = common::build_test_app(pool).await;

    let _beto_socket = test.ws_manager.add("conn-beto".to_string(), Some(beto.id)).await;

    let response = get_auth(test.app(), "/api/chat/contacts", &token_for(ana.id, "operador")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let contacts = json["data"].as_array().unwrap();

    assert_eq!(contacts.len(), 2, "the caller is not listed");
    assert_eq!(contacts[0]["username"], "beto");
    assert_eq!(contacts[0]["role"], "motorista");
    assert_eq!(contacts[0]["online"], true);
    assert_eq!(contacts[1]["username"], "caio");
    assert_eq!(contacts[1]["online"], false);
}
