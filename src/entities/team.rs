use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::resource::{absent, Entity, EntityQuery, UpdatePolicy};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Team {
    pub team_id: i32,
    pub club_id: i32,
    pub name: String,
    pub age_category: String,
}

#[derive(Debug, Deserialize)]
pub struct TeamPayload {
    pub club_id: Option<i32>,
    pub name: Option<String>,
    pub age_category: Option<String>,
}

impl Entity for Team {
    const TABLE: &'static str = "teams";
    const ID_COLUMN: &'static str = "team_id";
    const COLUMNS: &'static [&'static str] = &["club_id", "name", "age_category"];
    const NAME: &'static str = "Team";
    const UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Replace;

    type Payload = TeamPayload;

    fn missing_field(payload: &TeamPayload) -> Option<&'static str> {
        if payload.club_id.is_none() {
            Some("club_id")
        } else if absent(&payload.name) {
            Some("name")
        } else if absent(&payload.age_category) {
            Some("age_category")
        } else {
            None
        }
    }

    fn bind_columns<'q>(
        payload: &'q TeamPayload,
        query: EntityQuery<'q, Self>,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(payload.club_id)
            .bind(payload.name.as_deref())
            .bind(payload.age_category.as_deref())
    }
}
