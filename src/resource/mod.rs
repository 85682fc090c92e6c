//! Generic resource plumbing: one parameterized repository instantiated per
//! domain entity instead of seven copies of the same CRUD pattern.

pub mod dates;
pub mod handlers;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres};

use crate::error::ApiError;

pub type EntityQuery<'q, E> = QueryAs<'q, Postgres, E, PgArguments>;

/// How `update` treats fields absent from the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Every column is written from the payload; an absent field becomes NULL.
    Replace,
    /// Absent fields keep their stored value (`col = COALESCE($n, col)`).
    Coalesce,
}

/// A row type backed by one table with a serial primary key and a fixed set
/// of mutable columns. The update policy is a per-entity contract: Coach is
/// the one coalescing updater, everything else is full-replace.
pub trait Entity:
    Sized + for<'r> FromRow<'r, PgRow> + Serialize + Send + Unpin + 'static
{
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Display name used in "{Name} not found" / "{Name} deleted" payloads.
    const NAME: &'static str;
    const UPDATE_POLICY: UpdatePolicy;

    type Payload: DeserializeOwned + Send + Sync + 'static;

    /// First create-required field missing from the payload, if any.
    fn missing_field(payload: &Self::Payload) -> Option<&'static str>;

    /// Bind payload values in `COLUMNS` order.
    fn bind_columns<'q>(
        payload: &'q Self::Payload,
        query: EntityQuery<'q, Self>,
    ) -> EntityQuery<'q, Self>;
}

/// A string field counts as missing when it is absent or blank, matching the
/// original service's falsy checks.
pub fn absent(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

pub fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders = (1..=columns.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders}) RETURNING *",
        columns.join(", ")
    )
}

pub fn update_sql(table: &str, id_column: &str, columns: &[&str], policy: UpdatePolicy) -> String {
    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, col)| match policy {
            UpdatePolicy::Replace => format!("{col} = ${}", i + 1),
            UpdatePolicy::Coalesce => format!("{col} = COALESCE(${}, {col})", i + 1),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {table} SET {assignments} WHERE {id_column} = ${} RETURNING *",
        columns.len() + 1
    )
}

pub async fn list<E: Entity>(db: &PgPool) -> Result<Vec<E>, ApiError> {
    let sql = format!("SELECT * FROM {}", E::TABLE);
    Ok(sqlx::query_as::<_, E>(&sql).fetch_all(db).await?)
}

pub async fn get<E: Entity>(db: &PgPool, id: i32) -> Result<E, ApiError> {
    let sql = format!("SELECT * FROM {} WHERE {} = $1", E::TABLE, E::ID_COLUMN);
    sqlx::query_as::<_, E>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::NotFound(E::NAME))
}

/// Validates required fields before any storage access, so a rejected create
/// never leaves a partial write behind.
pub async fn create<E: Entity>(db: &PgPool, payload: &E::Payload) -> Result<E, ApiError> {
    if let Some(field) = E::missing_field(payload) {
        return Err(ApiError::MissingField(field));
    }
    let sql = insert_sql(E::TABLE, E::COLUMNS);
    let row = E::bind_columns(payload, sqlx::query_as::<_, E>(&sql))
        .fetch_one(db)
        .await?;
    Ok(row)
}

pub async fn update<E: Entity>(db: &PgPool, id: i32, payload: &E::Payload) -> Result<E, ApiError> {
    let sql = update_sql(E::TABLE, E::ID_COLUMN, E::COLUMNS, E::UPDATE_POLICY);
    E::bind_columns(payload, sqlx::query_as::<_, E>(&sql))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::NotFound(E::NAME))
}

/// Deleting an id twice is an idempotent failure: the second call is a plain
/// `NotFound`, storage is untouched.
pub async fn delete<E: Entity>(db: &PgPool, id: i32) -> Result<(), ApiError> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = $1 RETURNING {}",
        E::TABLE,
        E::ID_COLUMN,
        E::ID_COLUMN
    );
    sqlx::query_scalar::<_, i32>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::NotFound(E::NAME))?;
    Ok(())
}
