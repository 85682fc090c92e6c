use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::resource::{absent, dates, Entity, EntityQuery, UpdatePolicy};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Coach {
    pub coach_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "dates::option")]
    pub birth_date: Option<Date>,
    pub team_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct CoachPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, with = "dates::option")]
    pub birth_date: Option<Date>,
    pub team_id: Option<i32>,
}

impl Entity for Coach {
    const TABLE: &'static str = "coaches";
    const ID_COLUMN: &'static str = "coach_id";
    const COLUMNS: &'static [&'static str] = &["first_name", "last_name", "birth_date", "team_id"];
    const NAME: &'static str = "Coach";
    /// Coach updates are partial: a field left out of the body keeps its
    /// stored value. The other entities full-replace.
    const UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Coalesce;

    type Payload = CoachPayload;

    fn missing_field(payload: &CoachPayload) -> Option<&'static str> {
        if absent(&payload.first_name) {
            Some("first_name")
        } else if absent(&payload.last_name) {
            Some("last_name")
        } else if payload.team_id.is_none() {
            Some("team_id")
        } else {
            None
        }
    }

    fn bind_columns<'q>(
        payload: &'q CoachPayload,
        query: EntityQuery<'q, Self>,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(payload.first_name.as_deref())
            .bind(payload.last_name.as_deref())
            .bind(payload.birth_date)
            .bind(payload.team_id)
    }
}
