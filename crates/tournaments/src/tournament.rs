//! Tournament model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tournament the player takes part in.
///
/// `id` and `tournament_end_time` must be present when decoding; title and
/// payload are optional. Wrongly typed fields fail decoding. Only decoded
/// tournaments round-trip: [`Tournament::new`] leaves the end time unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    #[serde(rename = "id")]
    pub identifier: String,
    #[serde(
        rename = "tournament_end_time",
        with = "end_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(
        rename = "tournament_title",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        rename = "tournament_payload",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub payload: Option<String>,
}

impl Tournament {
    /// A tournament known only by ID.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            end_time: None,
            title: None,
            payload: None,
        }
    }

    /// The tournament created from `config`.
    pub fn from_config(identifier: impl Into<String>, config: &TournamentConfig) -> Self {
        Self {
            identifier: identifier.into(),
            end_time: config.end_time,
            title: config.title.clone(),
            payload: config.payload.clone(),
        }
    }
}

/// `2021-09-24T18:03:47+0000`
mod end_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_str(&raw, FORMAT)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

/// How scores are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreType {
    #[default]
    Numeric,
    Time,
}

impl ScoreType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "NUMERIC",
            Self::Time => "TIME",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HigherIsBetter => "HIGHER_IS_BETTER",
            Self::LowerIsBetter => "LOWER_IS_BETTER",
        }
    }
}

/// Settings for a tournament created from the share dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TournamentConfig {
    pub title: Option<String>,
    pub end_time: Option<DateTime<Utc>>,
    pub score_type: Option<ScoreType>,
    pub sort_order: Option<SortOrder>,
    pub payload: Option<String>,
}
