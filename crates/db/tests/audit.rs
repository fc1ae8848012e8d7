//! Repository-level tests for the audit trail.

use sqlx::PgPool;
use sisfun_core::audit::{action_types, entity_types};
use sisfun_db::models::audit::{AuditQuery, CreateAuditLog};
use sisfun_db::models::user::CreateUser;
use sisfun_db::repositories::{AuditLogRepo, UserRepo};

async fn create_admin(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@funeraria.test"),
            password_hash: "not-a-real-hash".to_string(),
            role_id: 1,
        },
    )
    .await
    .unwrap()
    .id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_audit_query_filters_and_count(pool: PgPool) {
    let admin = create_admin(&pool, "central").await;

    for action in [action_types::LOGIN, action_types::ENTITY_CREATE, action_types::LOGIN] {
        AuditLogRepo::insert(
            &pool,
            &CreateAuditLog {
                user_id: Some(admin),
                action_type: action.to_string(),
                entity_type: Some(entity_types::USER.to_string()),
                entity_id: Some(admin),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let params = AuditQuery {
        action_type: Some(action_types::LOGIN.to_string()),
        ..Default::default()
    };
    let items = AuditLogRepo::query(&pool, &params).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.action_type == action_types::LOGIN));
    assert_eq!(AuditLogRepo::count(&pool, &params).await.unwrap(), 2);
    assert_eq!(
        AuditLogRepo::count(&pool, &AuditQuery::default()).await.unwrap(),
        3
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_audit_query_filters_by_user_and_entity(pool: PgPool) {
    let ana = create_admin(&pool, "ana").await;
    let beto = create_admin(&pool, "beto").await;

    for (user, entity_id) in [(ana, 10), (beto, 10), (ana, 11)] {
        AuditLogRepo::insert(
            &pool,
            &CreateAuditLog {
                user_id: Some(user),
                action_type: action_types::ENTITY_UPDATE.to_string(),
                entity_type: Some(entity_types::SERVICE_ORDER.to_string()),
                entity_id: Some(entity_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    }

    let by_user = AuditQuery {
        user_id: Some(ana),
        ..Default::default()
    };
    assert_eq!(AuditLogRepo::count(&pool, &by_user).await.unwrap(), 2);

    let by_entity = AuditQuery {
        entity_type: Some(entity_types::SERVICE_ORDER.to_string()),
        entity_id: Some(10),
        ..Default::default()
    };
    let items = AuditLogRepo::query(&pool, &by_entity).await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.entity_id == Some(10)));
}
