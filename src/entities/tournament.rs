use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::resource::{absent, dates, Entity, EntityQuery, UpdatePolicy};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tournament {
    pub tournament_id: i32,
    pub name: String,
    #[serde(with = "dates")]
    pub start_date: Date,
    #[serde(with = "dates")]
    pub end_date: Date,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TournamentPayload {
    pub name: Option<String>,
    #[serde(default, with = "dates::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "dates::option")]
    pub end_date: Option<Date>,
    pub location: Option<String>,
}

impl Entity for Tournament {
    const TABLE: &'static str = "tournaments";
    const ID_COLUMN: &'static str = "tournament_id";
    const COLUMNS: &'static [&'static str] = &["name", "start_date", "end_date", "location"];
    const NAME: &'static str = "Tournament";
    const UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Replace;

    type Payload = TournamentPayload;

    fn missing_field(payload: &TournamentPayload) -> Option<&'static str> {
        if absent(&payload.name) {
            Some("name")
        } else if payload.start_date.is_none() {
            Some("start_date")
        } else if payload.end_date.is_none() {
            Some("end_date")
        } else {
            None
        }
    }

    fn bind_columns<'q>(
        payload: &'q TournamentPayload,
        query: EntityQuery<'q, Self>,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(payload.name.as_deref())
            .bind(payload.start_date)
            .bind(payload.end_date)
            .bind(payload.location.as_deref())
    }
}
