use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{debug, info};

use pulse_sync::RewriteBackend;
use pulse_types::api::{
    FeedResponse, PolishRequest, PolishResponse, PostMessageRequest, QuoteResponse,
};
use pulse_types::models::Record;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Fetch now instead of serving the last scheduled refresh.
    #[serde(default)]
    pub refresh: bool,
}

/// The board as currently displayed. Never fails: a remote outage only
/// shows up as the `mode` field.
pub async fn get_messages<B: RewriteBackend>(
    State(state): State<AppState<B>>,
    Query(query): Query<FeedQuery>,
) -> Json<FeedResponse> {
    let feed = if query.refresh {
        state.feed.refresh_now(&state.sync).await
    } else {
        state.feed.latest()
    };

    Json(FeedResponse {
        mode: feed.mode,
        messages: feed.present(),
    })
}

pub async fn post_message<B: RewriteBackend + 'static>(
    State(state): State<AppState<B>>,
    Json(req): Json<PostMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let enhanced = req.polish || req.enhanced;
    let mut record = Record::new(req.content, req.author, enhanced).map_err(|e| {
        debug!("Rejected post: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    if req.polish {
        record.content = state.enhancer.polish(&record.content).await;
    }

    // Local commit happens here; the remote attempt continues in the background.
    let submission = state.sync.submit(record.clone()).await;
    state.feed.publish_optimistic(record.clone());
    info!("Posted message {} by {}", record.id, record.author);

    let feed = state.feed.clone();
    tokio::spawn(async move {
        submission.outcome().await;
        feed.trigger();
    });

    Ok((StatusCode::CREATED, Json(record)))
}

/// Rewrite a draft without posting it, so the author can review or edit the
/// result first.
pub async fn polish_preview<B: RewriteBackend>(
    State(state): State<AppState<B>>,
    Json(req): Json<PolishRequest>,
) -> Result<Json<PolishResponse>, StatusCode> {
    if req.content.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(Json(PolishResponse {
        content: state.enhancer.polish(&req.content).await,
    }))
}

pub async fn daily_quote<B: RewriteBackend>(State(state): State<AppState<B>>) -> Json<QuoteResponse> {
    Json(QuoteResponse {
        quote: state.enhancer.daily_quote().await,
    })
}
