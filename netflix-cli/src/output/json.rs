//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use netflix_core::{Profile, RatingKind, RatingRecord, ViewingHistoryItem};
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for a profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOutput {
    pub guid: String,
    pub name: String,
    pub active: bool,
    pub kids: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&Profile> for ProfileOutput {
    fn from(profile: &Profile) -> Self {
        Self {
            guid: profile.guid.clone(),
            name: profile.display_name.clone(),
            active: profile.is_active,
            kids: profile.is_kids,
            avatar: profile.avatar_name.clone(),
        }
    }
}

/// JSON output for a rating.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOutput {
    pub movie_id: u64,
    pub title: String,
    pub scale: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub rated_at: Option<DateTime<Utc>>,
}

impl From<&RatingRecord> for RatingOutput {
    fn from(record: &RatingRecord) -> Self {
        Self {
            movie_id: record.movie_id,
            title: record.title.clone(),
            scale: scale_name(record.rating_type),
            rating: record.your_rating,
            rated_at: record.rated_at(),
        }
    }
}

/// JSON output for a viewing history entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOutput {
    pub movie_id: u64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub watched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u64>,
}

impl From<&ViewingHistoryItem> for HistoryOutput {
    fn from(item: &ViewingHistoryItem) -> Self {
        Self {
            movie_id: item.movie_id,
            title: item.title.clone(),
            series_title: item.series_title.clone(),
            series_id: item.series,
            watched_at: item.watched_at(),
            duration_secs: item.duration,
        }
    }
}

fn scale_name(kind: Option<RatingKind>) -> &'static str {
    match kind {
        Some(RatingKind::Thumb) => "thumb",
        Some(RatingKind::Star) => "star",
        Some(RatingKind::Unknown) | None => "unknown",
    }
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}

// ============================================================================
// Tests
// ============================================================================
