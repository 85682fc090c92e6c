use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    error::ApiError,
    resource::{handlers, Entity, EntityQuery, UpdatePolicy},
    state::AppState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Finished,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Match {
    pub match_id: i32,
    pub team1_id: i32,
    pub team2_id: i32,
    pub tournament_id: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub match_date: OffsetDateTime,
    pub score_team1: Option<i32>,
    pub score_team2: Option<i32>,
    pub status: Option<MatchStatus>,
    pub venue: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchPayload {
    pub team1_id: Option<i32>,
    pub team2_id: Option<i32>,
    pub tournament_id: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub match_date: Option<OffsetDateTime>,
    pub score_team1: Option<i32>,
    pub score_team2: Option<i32>,
    pub status: Option<MatchStatus>,
    pub venue: Option<String>,
}

impl Entity for Match {
    const TABLE: &'static str = "matches";
    const ID_COLUMN: &'static str = "match_id";
    const COLUMNS: &'static [&'static str] = &[
        "team1_id",
        "team2_id",
        "tournament_id",
        "match_date",
        "score_team1",
        "score_team2",
        "status",
        "venue",
    ];
    const NAME: &'static str = "Match";
    const UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Replace;

    type Payload = MatchPayload;

    fn missing_field(payload: &MatchPayload) -> Option<&'static str> {
        if payload.team1_id.is_none() {
            Some("team1_id")
        } else if payload.team2_id.is_none() {
            Some("team2_id")
        } else if payload.tournament_id.is_none() {
            Some("tournament_id")
        } else if payload.match_date.is_none() {
            Some("match_date")
        } else {
            None
        }
    }

    fn bind_columns<'q>(
        payload: &'q MatchPayload,
        query: EntityQuery<'q, Self>,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(payload.team1_id)
            .bind(payload.team2_id)
            .bind(payload.tournament_id)
            .bind(payload.match_date)
            .bind(payload.score_team1)
            .bind(payload.score_team2)
            .bind(payload.status)
            .bind(payload.venue.as_deref())
    }
}

// --- paginated listing ---

#[derive(Debug, Deserialize)]
pub struct MatchListQuery {
    pub status: Option<MatchStatus>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct MatchPage {
    pub matches: Vec<Match>,
    pub pagination: Pagination,
}

/// Non-positive paging inputs are clamped rather than handed to storage as
/// negative offsets. The clamped values are echoed in the response.
fn clamp_paging(page: i64, limit: i64) -> (i64, i64) {
    (page.max(1), limit.clamp(1, 100))
}

fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

fn list_sql(with_status: bool) -> &'static str {
    if with_status {
        "SELECT * FROM matches WHERE status = $1 ORDER BY match_date LIMIT $2 OFFSET $3"
    } else {
        "SELECT * FROM matches ORDER BY match_date LIMIT $1 OFFSET $2"
    }
}

fn count_sql(with_status: bool) -> &'static str {
    if with_status {
        "SELECT COUNT(*) FROM matches WHERE status = $1"
    } else {
        "SELECT COUNT(*) FROM matches"
    }
}

/// The count runs under the same filter as the page query so `total` and
/// `totalPages` describe exactly the filtered set.
pub async fn list_matches(db: &PgPool, query: &MatchListQuery) -> Result<MatchPage, ApiError> {
    let (page, limit) = clamp_paging(query.page, query.limit);
    let offset = (page - 1) * limit;

    let matches = match query.status {
        Some(status) => {
            sqlx::query_as::<_, Match>(list_sql(true))
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await?
        }
        None => {
            sqlx::query_as::<_, Match>(list_sql(false))
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await?
        }
    };

    let total: i64 = match query.status {
        Some(status) => {
            sqlx::query_scalar::<_, i64>(count_sql(true))
                .bind(status)
                .fetch_one(db)
                .await?
        }
        None => {
            sqlx::query_scalar::<_, i64>(count_sql(false))
                .fetch_one(db)
                .await?
        }
    };

    Ok(MatchPage {
        matches,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total_pages(total, limit),
        },
    })
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<MatchListQuery>,
) -> Result<Json<MatchPage>, ApiError> {
    Ok(Json(list_matches(&state.db, &query).await?))
}

/// Same shape as `resource_router`, with the paginated list swapped in.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(handlers::create::<Match>))
        .route(
            "/:id",
            get(handlers::fetch::<Match>)
                .put(handlers::update::<Match>)
                .delete(handlers::remove::<Match>),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn paging_defaults_and_clamps() {
        assert_eq!(clamp_paging(1, 10), (1, 10));
        assert_eq!(clamp_paging(0, 10), (1, 10));
        assert_eq!(clamp_paging(-3, 0), (1, 1));
        assert_eq!(clamp_paging(2, 1000), (2, 100));
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(9, 5), 2);
    }

    #[test]
    fn page_two_limit_five_covers_rows_six_to_ten() {
        let (page, limit) = clamp_paging(2, 5);
        let offset = (page - 1) * limit;
        assert_eq!(offset, 5);
    }

    #[test]
    fn status_filter_changes_both_queries_identically() {
        assert_eq!(
            list_sql(true),
            "SELECT * FROM matches WHERE status = $1 ORDER BY match_date LIMIT $2 OFFSET $3"
        );
        assert_eq!(count_sql(true), "SELECT COUNT(*) FROM matches WHERE status = $1");
        assert!(!list_sql(false).contains("WHERE"));
        assert!(!count_sql(false).contains("WHERE"));
    }

    #[test]
    fn query_string_defaults_apply() {
        let uri: Uri = "/api/matches".parse().unwrap();
        let Query(q) = Query::<MatchListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 10);
        assert!(q.status.is_none());

        let uri: Uri = "/api/matches?status=in_progress&page=2&limit=5".parse().unwrap();
        let Query(q) = Query::<MatchListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(q.status, Some(MatchStatus::InProgress));
        assert_eq!(q.page, 2);
        assert_eq!(q.limit, 5);
    }

    #[test]
    fn unknown_status_is_rejected_at_the_boundary() {
        let uri: Uri = "/api/matches?status=postponed".parse().unwrap();
        assert!(Query::<MatchListQuery>::try_from_uri(&uri).is_err());
    }

    #[test]
    fn pagination_serializes_camel_case_total_pages() {
        let p = Pagination {
            page: 2,
            limit: 5,
            total: 11,
            total_pages: 3,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert!(json.get("total_pages").is_none());
    }
}
