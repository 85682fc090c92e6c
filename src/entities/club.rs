use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::resource::{absent, Entity, EntityQuery, UpdatePolicy};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Club {
    pub club_id: i32,
    pub name: String,
    pub logo_url: Option<String>,
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct ClubPayload {
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub city: Option<String>,
}

impl Entity for Club {
    const TABLE: &'static str = "clubs";
    const ID_COLUMN: &'static str = "club_id";
    const COLUMNS: &'static [&'static str] = &["name", "logo_url", "city"];
    const NAME: &'static str = "Club";
    const UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Replace;

    type Payload = ClubPayload;

    fn missing_field(payload: &ClubPayload) -> Option<&'static str> {
        if absent(&payload.name) {
            Some("name")
        } else if absent(&payload.city) {
            Some("city")
        } else {
            None
        }
    }

    fn bind_columns<'q>(
        payload: &'q ClubPayload,
        query: EntityQuery<'q, Self>,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(payload.name.as_deref())
            .bind(payload.logo_url.as_deref())
            .bind(payload.city.as_deref())
    }
}
