//! Token issuing for the dispatch API.
//!
//! Access tokens are HS256 JWTs carrying the user id and role name, issued
//! by `sisfun` and checked for that issuer. Refresh tokens are opaque
//! strings; the server keeps only their SHA-256 digest in `user_sessions`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sisfun_core::types::DbId;
use uuid::Uuid;

/// `iss` claim of every access token.
pub const ISSUER: &str = "sisfun";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: DbId,
    /// Role name (`admin`, `operador`, `motorista`).
    pub role: String,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 signing secret.
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty), `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15) and `JWT_REFRESH_EXPIRY_DAYS` (default 7).
    ///
    /// # Panics
    ///
    /// On a missing secret or a non-numeric expiry.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_i64("JWT_ACCESS_EXPIRY_MINS", 15),
            refresh_token_expiry_days: env_i64("JWT_REFRESH_EXPIRY_DAYS", 7),
        }
    }

    /// Lifetime of an access token, as reported in `expires_in`.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }

    /// Expiry stamped on a session created at `now`.
    pub fn refresh_expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::days(self.refresh_token_expiry_days)
    }

    pub fn issue_access_token(
        &self,
        user_id: DbId,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            role: role.to_string(),
            iss: ISSUER.to_string(),
            exp: now + self.access_ttl_secs(),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Check signature, expiry and issuer.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        // `sub` is numeric; jsonwebtoken only counts a string `sub` as present.
        validation.set_required_spec_claims(&["exp", "iss"]);
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a whole number")),
        Err(_) => default,
    }
}

/// A new refresh token as `(plaintext, sha256_hex)`. The plaintext goes to
/// the client once.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let hash = hash_refresh_token(&plaintext);
    (plaintext, hash)
}

pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    fn sign(claims: &Claims, config: &JwtConfig) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn issued_token_round_trips_claims() {
        let config = config();
        let token = config
            .issue_access_token(42, "motorista")
            .expect("token generation should succeed");

        let claims = config
            .verify_access_token(&token)
            .expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "motorista");
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, config.access_ttl_secs());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config();
        // Past the default 60-second leeway.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "operador".to_string(),
            iss: ISSUER.to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        assert!(config.verify_access_token(&sign(&claims, &config)).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let config = config();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            role: "admin".to_string(),
            iss: "someone-else".to_string(),
            exp: now + 300,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };
        assert!(config.verify_access_token(&sign(&claims, &config)).is_err());
    }

    #[test]
    fn other_secret_is_rejected() {
        let token = config().issue_access_token(1, "admin").unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            ..config()
        };
        assert!(other.verify_access_token(&token).is_err());
    }

    #[test]
    fn refresh_token_hash_matches_plaintext() {
        let (plaintext, hash) = generate_refresh_token();
        assert_eq!(plaintext.len(), 64);
        assert_eq!(hash, hash_refresh_token(&plaintext));
        assert_ne!(plaintext, hash);
    }

    #[test]
    fn session_expiry_uses_refresh_days() {
        let now = Utc::now();
        assert_eq!(config().refresh_expires_at(now) - now, Duration::days(7));
    }
}
