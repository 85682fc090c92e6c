use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every failure a request can end with. Validation variants are raised at
/// the boundary before any storage access; storage failures fold into
/// `Internal` except the registration unique-violation, which the auth repo
/// maps to `DuplicateEmail`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Password too short")]
    WeakPassword,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("No token provided")]
    Unauthenticated,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Admin access required")]
    InsufficientPrivilege,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_)
            | ApiError::InvalidEmail
            | ApiError::WeakPassword
            | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredential | ApiError::Unauthenticated | ApiError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InsufficientPrivilege => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(e) = &self {
            tracing::error!(error = %e, "internal error");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::MissingField("name").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::InsufficientPrivilege.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound("Club").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_match_the_wire_contract() {
        assert_eq!(
            ApiError::MissingField("first_name").to_string(),
            "Missing required field: first_name"
        );
        assert_eq!(ApiError::NotFound("Club").to_string(), "Club not found");
        assert_eq!(ApiError::Unauthenticated.to_string(), "No token provided");
        assert_eq!(ApiError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(
            ApiError::InsufficientPrivilege.to_string(),
            "Admin access required"
        );
    }
}
