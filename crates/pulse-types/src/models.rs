use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Author name used for records synthesized by the feed itself.
pub const SYSTEM_AUTHOR: &str = "System";

/// A single bulletin message.
///
/// The serialized shape is shared by the local cache, the remote collection
/// and the HTTP API: `{id, content, author, ai_enhanced, timestamp}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub content: String,
    pub author: String,
    #[serde(rename = "ai_enhanced", default, deserialize_with = "null_as_false")]
    pub enhanced: bool,
    #[serde(rename = "timestamp")]
    pub created_at_millis: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRecord {
    #[error("message content is empty")]
    EmptyContent,
    #[error("author name is empty")]
    EmptyAuthor,
}

impl Record {
    /// Build a new record for submission, stamping a fresh id and the current time.
    pub fn new(
        content: impl Into<String>,
        author: impl Into<String>,
        enhanced: bool,
    ) -> Result<Self, InvalidRecord> {
        let content = content.into();
        let author = author.into();

        if content.trim().is_empty() {
            return Err(InvalidRecord::EmptyContent);
        }
        if author.trim().is_empty() {
            return Err(InvalidRecord::EmptyAuthor);
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            content,
            author,
            enhanced,
            created_at_millis: Utc::now().timestamp_millis(),
        })
    }

    /// Placeholder shown when the feed has nothing else to display.
    pub fn system(id: &str, content: impl Into<String>, created_at_millis: i64) -> Self {
        Self {
            id: id.to_string(),
            content: content.into(),
            author: SYSTEM_AUTHOR.to_string(),
            enhanced: false,
            created_at_millis,
        }
    }
}

// Remote rows may carry `"ai_enhanced": null`.
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sort newest first. Stable, so records sharing a timestamp keep their
/// relative order.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| b.created_at_millis.cmp(&a.created_at_millis));
}
