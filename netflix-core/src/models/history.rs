//! Rating and viewing history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which rating scale a record uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingKind {
    /// Thumbs up / down.
    Thumb,
    /// Legacy five-star scale.
    Star,
    /// A scale this client does not know about.
    #[serde(other)]
    Unknown,
}

/// One entry of the account's rating history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    /// Rating scale.
    #[serde(default)]
    pub rating_type: Option<RatingKind>,
    /// Title name.
    #[serde(default)]
    pub title: String,
    /// Numeric title identifier.
    #[serde(rename = "movieID")]
    pub movie_id: u64,
    /// Rating given by the profile.
    #[serde(default)]
    pub your_rating: Option<i64>,
    /// Human readable date as rendered upstream.
    #[serde(default)]
    pub date: Option<String>,
    /// Rating time in milliseconds since the epoch.
    #[serde(default)]
    pub timestamp: Option<i64>,
    /// Every field not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RatingRecord {
    /// Returns when the rating was given, if the payload carried a timestamp.
    pub fn rated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(DateTime::from_timestamp_millis)
    }
}

/// One entry of the profile's viewing activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingHistoryItem {
    /// Title name (episode name for series).
    #[serde(default)]
    pub title: String,
    /// Numeric title identifier.
    #[serde(rename = "movieID")]
    pub movie_id: u64,
    /// Series name, if the title is an episode.
    #[serde(default)]
    pub series_title: Option<String>,
    /// Series identifier, if the title is an episode.
    #[serde(default)]
    pub series: Option<u64>,
    /// Watch time in milliseconds since the epoch.
    #[serde(default)]
    pub date: Option<i64>,
    /// Title duration in seconds.
    #[serde(default)]
    pub duration: Option<u64>,
    /// Playback position in seconds.
    #[serde(default)]
    pub bookmark: Option<u64>,
    /// Every field not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ViewingHistoryItem {
    /// Returns when the title was watched.
    pub fn watched_at(&self) -> Option<DateTime<Utc>> {
        self.date.and_then(DateTime::from_timestamp_millis)
    }

    /// Returns true if the entry is an episode of a series.
    pub fn is_episode(&self) -> bool {
        self.series.is_some()
    }
}
