use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use crate::{auth::jwt::AdminUser, error::ApiError, state::AppState};

use super::Entity;

/// Confirmation payload for a successful delete, distinct from the record.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
}

/// Reads are public; create/update/delete sit behind the admin gate.
pub fn resource_router<E: Entity>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<E>).post(create::<E>))
        .route(
            "/:id",
            get(fetch::<E>).put(update::<E>).delete(remove::<E>),
        )
}

#[instrument(skip(state))]
pub async fn list<E: Entity>(State(state): State<AppState>) -> Result<Json<Vec<E>>, ApiError> {
    Ok(Json(super::list::<E>(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn fetch<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<E>, ApiError> {
    Ok(Json(super::get::<E>(&state.db, id).await?))
}

#[instrument(skip(state, _admin, payload))]
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(payload): Json<E::Payload>,
) -> Result<(StatusCode, Json<E>), ApiError> {
    let row = super::create::<E>(&state.db, &payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[instrument(skip(state, _admin, payload))]
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i32>,
    Json(payload): Json<E::Payload>,
) -> Result<Json<E>, ApiError> {
    Ok(Json(super::update::<E>(&state.db, id, &payload).await?))
}

#[instrument(skip(state, _admin))]
pub async fn remove<E: Entity>(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i32>,
) -> Result<Json<Deleted>, ApiError> {
    super::delete::<E>(&state.db, id).await?;
    Ok(Json(Deleted {
        message: format!("{} deleted", E::NAME),
    }))
}
