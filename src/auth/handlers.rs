use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest, Role, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_lowercase();
    if email.is_empty() {
        return Err(ApiError::MissingField("email"));
    }
    let password = payload.password.as_deref().unwrap_or("");
    if password.is_empty() {
        return Err(ApiError::MissingField("password"));
    }
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(ApiError::InvalidEmail);
    }
    if password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::WeakPassword);
    }

    let role = payload.role.unwrap_or(Role::User);
    let hash = hash_password(password)?;
    let user = User::create(&state.db, &email, &hash, role).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.user_id, user.role)?;

    info!(user_id = user.user_id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Unknown email and wrong password answer identically so the endpoint
/// cannot be used to enumerate accounts.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = payload
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or("")
        .to_lowercase();
    if email.is_empty() {
        return Err(ApiError::MissingField("email"));
    }
    let password = payload.password.as_deref().unwrap_or("");
    if password.is_empty() {
        return Err(ApiError::MissingField("password"));
    }

    let user = match User::find_by_email(&state.db, &email).await? {
        Some(u) => u,
        None => {
            warn!(%email, "login unknown email");
            return Err(ApiError::InvalidCredential);
        }
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(%email, user_id = user.user_id, "login invalid password");
        return Err(ApiError::InvalidCredential);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.user_id, user.role)?;

    info!(user_id = user.user_id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse { token }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("coach.k@club.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a @x.com"));
        assert!(!is_valid_email("a@x"));
    }
}
