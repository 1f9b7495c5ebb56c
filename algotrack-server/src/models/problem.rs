//! Problem record and the caller-supplied payload used to write it

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Maximum length of `description` and `notes`, enforced by the schema.
pub const MAX_TEXT_LEN: usize = 2000;

/// Persisted problem row.
///
/// `title`, `difficulty` and `platform` are NOT NULL in every backend, so a
/// row read back always carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub platform: String,
    pub url: Option<String>,
    pub last_reviewed: Option<NaiveDate>,
    pub next_review: Option<NaiveDate>,
    pub review_count: Option<i32>,
    pub notes: Option<String>,
}

/// Field values for insert and full-record update.
///
/// Every field is optional on the wire. An `id` in the body is ignored: ids
/// come from the store. Required columns left as `None` are rejected by the
/// database, not here.
///
/// `review_count` keeps an absent key (`None`) apart from an explicit
/// `null` (`Some(None)`): only an absent key gets the insert default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProblemFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<String>,
    pub platform: Option<String>,
    pub url: Option<String>,
    pub last_reviewed: Option<NaiveDate>,
    pub next_review: Option<NaiveDate>,
    #[serde(deserialize_with = "present")]
    pub review_count: Option<Option<i32>>,
    pub notes: Option<String>,
}

/// Wraps whatever the key holds, `null` included, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProblemFields {
    /// Shorthand for the three required columns.
    pub fn new(
        title: impl Into<String>,
        difficulty: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            difficulty: Some(difficulty.into()),
            platform: Some(platform.into()),
            ..Self::default()
        }
    }

    pub fn with_review_count(mut self, count: Option<i32>) -> Self {
        self.review_count = Some(count);
        self
    }

    /// Review count to store on insert. An omitted key starts at zero, an
    /// explicit null is kept.
    pub fn insert_review_count(&self) -> Option<i32> {
        self.review_count.unwrap_or(Some(0))
    }

    /// Review count to store on update. Omitted and null both overwrite
    /// with NULL.
    pub fn update_review_count(&self) -> Option<i32> {
        self.review_count.flatten()
    }
}
