//! Access-token authentication.
//!
//! REST handlers take [`AuthUser`] as an extractor (header
//! `Authorization: Bearer <jwt>`); the WebSocket upgrade passes the token in
//! the query string and goes through [`AuthUser::from_token`] directly.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use sisfun_core::error::CoreError;
use sisfun_core::types::DbId;

use crate::auth::jwt::JwtConfig;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role name as issued at login (`admin`, `operador`, `motorista`).
    pub role: String,
}

impl AuthUser {
    /// Validate an access token. Refresh tokens are opaque and never pass.
    pub fn from_token(token: &str, jwt: &JwtConfig) -> Result<Self, AppError> {
        let claims = jwt.verify_access_token(token).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// The token part of a `Bearer` authorization header. The scheme is
/// matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        AuthUser::from_token(token, &state.config.jwt)
    }
}
