use std::time::Duration;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};

use crate::{auth::dto::Role, config::JwtConfig, error::ApiError, state::AppState};

/// Token payload: identity, role and the 1-hour expiry window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

/// Signing/verification keys derived once from config, never from ambient
/// process state.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i32, role: Role) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, role = ?role, "jwt signed");
        Ok(token)
    }

    /// Rejects malformed, expired and wrong-secret tokens alike.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// Authorization gate for every mutating endpoint: no credential and a bad
/// credential are distinct 401s, a non-admin credential is a 403.
pub struct AdminUser(pub Claims);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthenticated)?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::InvalidToken
        })?;

        if claims.role != Role::Admin {
            warn!(user_id = claims.sub, "admin route refused for non-admin");
            return Err(ApiError::InsufficientPrivilege);
        }

        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request, StatusCode};

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::from_secs(3600),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(42, Role::Admin).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = make_keys("secret-a").sign(1, Role::User).expect("sign");
        assert!(make_keys("secret-b").verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(make_keys("dev-secret").verify("not.a.jwt").is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let keys = make_keys("dev-secret");
        let now = OffsetDateTime::now_utc().unix_timestamp();
        // Issued two hours ago with a one-hour lifetime, well past leeway.
        let claims = Claims {
            sub: 7,
            role: Role::Admin,
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    async fn gate(state: &AppState, header_value: Option<&str>) -> Result<AdminUser, ApiError> {
        let mut builder = Request::builder().uri("/api/clubs");
        if let Some(v) = header_value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AdminUser::from_request_parts(&mut parts, state).await
    }

    #[tokio::test]
    async fn gate_rejects_missing_header() {
        let state = AppState::fake();
        let err = gate(&state, None).await.err().expect("rejection");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "No token provided");
    }

    #[tokio::test]
    async fn gate_rejects_non_bearer_scheme() {
        let state = AppState::fake();
        let err = gate(&state, Some("Basic abc")).await.err().expect("rejection");
        assert_eq!(err.to_string(), "No token provided");
    }

    #[tokio::test]
    async fn gate_rejects_invalid_token() {
        let state = AppState::fake();
        let err = gate(&state, Some("Bearer garbage"))
            .await
            .err()
            .expect("rejection");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[tokio::test]
    async fn gate_rejects_user_role() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign(7, Role::User).expect("sign");
        let err = gate(&state, Some(&format!("Bearer {token}")))
            .await
            .err()
            .expect("rejection");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Admin access required");
    }

    #[tokio::test]
    async fn gate_admits_admin_role() {
        let state = AppState::fake();
        let token = JwtKeys::from_ref(&state).sign(7, Role::Admin).expect("sign");
        let AdminUser(claims) = gate(&state, Some(&format!("Bearer {token}")))
            .await
            .expect("admitted");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, Role::Admin);
    }
}
