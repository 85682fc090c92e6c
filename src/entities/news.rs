use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::resource::{absent, Entity, EntityQuery, UpdatePolicy};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct News {
    pub news_id: i32,
    pub title: String,
    pub content: String,
    pub author: Option<String>,
    /// Filled by the schema default at insert time; updates never touch it.
    #[serde(with = "time::serde::rfc3339")]
    pub publish_date: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct NewsPayload {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl Entity for News {
    const TABLE: &'static str = "news";
    const ID_COLUMN: &'static str = "news_id";
    const COLUMNS: &'static [&'static str] = &["title", "content", "author"];
    const NAME: &'static str = "News";
    const UPDATE_POLICY: UpdatePolicy = UpdatePolicy::Replace;

    type Payload = NewsPayload;

    fn missing_field(payload: &NewsPayload) -> Option<&'static str> {
        if absent(&payload.title) {
            Some("title")
        } else if absent(&payload.content) {
            Some("content")
        } else {
            None
        }
    }

    fn bind_columns<'q>(
        payload: &'q NewsPayload,
        query: EntityQuery<'q, Self>,
    ) -> EntityQuery<'q, Self> {
        query
            .bind(payload.title.as_deref())
            .bind(payload.content.as_deref())
            .bind(payload.author.as_deref())
    }
}
