use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

use crate::resource::{absent, dates, Entity, EntityQuery, UpdatePolicy};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Player {
    pub player_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(with = "dates")]
    pub birth_date: Date,
    pub position: String,
    pub team_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct PlayerPayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, with = "dates::option")]
    pub birth_date: Option<Date>,
    pub position: Option<String>,
    pub team_id: Option<i32>,
}

impl Entity for Player {
    const TABLE: &'static str = "players";
    const ID_COLUMN: &'static str = "player_id";
    const COLUMNS: &'static [&'static str] =
        &["first_name", "last_name", "birth_date", "position", "team_id"];
    const NAME: &'static str = "Player";
    const UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Replace;

    type Payload = PlayerPayload;

    fn missing_field(payload: &PlayerPayload) -> Option<&'static str> {
        if absent(&payload.first_name) {
            Some("first_name")
        } else if absent(&payload.last_name) {
            Some("last_name")
        } else if payload.birth_date.is_none() {
            Some("birth_date")
        } else if absent(&payload.position) {
            Some("position")
        } else if payload.team_id.is_none() {
            Some("team_id")
        } else {
            None
        }
    }

    fn bind_columns<'q>(
        payload: &'q PlayerPayload,
        query: EntityQuery<'q, Self>,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(payload.first_name.as_deref())
            .bind(payload.last_name.as_deref())
            .bind(payload.birth_date)
            .bind(payload.position.as_deref())
            .bind(payload.team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_player_field_is_required() {
        let body = r#"{
            "first_name": "Jamie",
            "last_name": "Vard",
            "birth_date": "2011-03-04",
            "position": "forward",
            "team_id": 3
        }"#;
        let full: PlayerPayload = serde_json::from_str(body).unwrap();
        assert_eq!(Player::missing_field(&full), None);

        let missing: PlayerPayload =
            serde_json::from_str(r#"{"first_name":"Jamie","last_name":"Vard"}"#).unwrap();
        assert_eq!(Player::missing_field(&missing), Some("birth_date"));
    }
}
