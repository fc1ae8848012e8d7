//! Audit trail writer used by handlers.
//!
//! Entries are written after the audited action succeeded. A failed write is
//! logged and never turns a successful request into an error.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sisfun_core::audit::redact_sensitive_fields;
use sisfun_core::types::DbId;
use sisfun_db::models::audit::CreateAuditLog;
use sisfun_db::repositories::AuditLogRepo;
use sisfun_db::DbPool;

/// Client address and user agent of the current request.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        // First hop of X-Forwarded-For is the original client.
        let ip_address = header("x-forwarded-for")
            .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .or_else(|| header("x-real-ip"));
        Ok(ClientInfo {
            ip_address,
            user_agent: header("user-agent"),
        })
    }
}

/// One audit entry under construction.
pub struct AuditEntry {
    inner: CreateAuditLog,
}

impl AuditEntry {
    pub fn new(action_type: &str) -> Self {
        Self {
            inner: CreateAuditLog {
                action_type: action_type.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn user(mut self, user_id: DbId) -> Self {
        self.inner.user_id = Some(user_id);
        self
    }

    pub fn entity(mut self, entity_type: &str, entity_id: DbId) -> Self {
        self.inner.entity_type = Some(entity_type.to_string());
        self.inner.entity_id = Some(entity_id);
        self
    }

    /// Attach details; sensitive keys are redacted before storage.
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.inner.details_json = Some(redact_sensitive_fields(&details));
        self
    }

    pub fn client(mut self, client: &ClientInfo) -> Self {
        self.inner.ip_address = client.ip_address.clone();
        self.inner.user_agent = client.user_agent.clone();
        self
    }

    /// Write the entry, logging (not returning) any failure.
    pub async fn record(self, pool: &DbPool) {
        if let Err(e) = AuditLogRepo::insert(pool, &self.inner).await {
            tracing::error!(
                error = %e,
                action_type = %self.inner.action_type,
                "Failed to write audit log"
            );
        }
    }
}
