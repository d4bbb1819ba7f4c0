use serde::{Deserialize, Serialize};

use crate::events::ConnectionMode;
use crate::models::Record;

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostMessageRequest {
    pub content: String,
    pub author: String,
    /// Run the content through the text enhancer before posting.
    #[serde(default)]
    pub polish: bool,
    /// Content was already polished through `POST /polish` and kept unedited.
    #[serde(default)]
    pub enhanced: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub mode: ConnectionMode,
    pub messages: Vec<Record>,
}

// -- Polish --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolishRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolishResponse {
    pub content: String,
}

// -- Health --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub mode: ConnectionMode,
}

// -- Quote --

#[derive(Debug, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub quote: String,
}
