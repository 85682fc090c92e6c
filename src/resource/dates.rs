//! Serde helpers for `time::Date` fields so dates travel as `YYYY-MM-DD`
//! strings on the wire. Timestamps use `time::serde::rfc3339` directly.

use serde::{Deserialize, Deserializer, Serializer};
use time::{format_description::FormatItem, macros::format_description, Date};

const FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
    let s = date.format(FORMAT).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&s)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
    let s = String::deserialize(deserializer)?;
    Date::parse(&s, FORMAT).map_err(serde::de::Error::custom)
}

pub mod option {
    use super::FORMAT;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(
        date: &Option<Date>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => {
                let s = d.format(FORMAT).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&s)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Date>, D::Error> {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| Date::parse(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
