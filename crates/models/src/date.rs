//! Serde adapter for calendar dates.
//!
//! Dates go out as `YYYY-MM-DD`. Coming in, a browser usually sends a
//! serialized `Date` (`2025-03-14T03:00:00.000Z`), so an RFC 3339 timestamp is
//! accepted too and its date part (in the timestamp's own offset) is kept.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer, de};

const FORMAT: &str = "%Y-%m-%d";

pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
}

pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(FORMAT))
}

pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    parse(&raw).map_err(|e| de::Error::custom(format!("invalid date '{raw}': {e}")))
}

/// Same as the parent module, for `Option<NaiveDate>` fields.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_some(&d.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| parse(&raw).map_err(|e| de::Error::custom(format!("invalid date '{raw}': {e}"))))
            .transpose()
    }
}
