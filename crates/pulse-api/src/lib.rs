pub mod health;
pub mod messages;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use pulse_sync::{Enhancer, FeedHandle, RewriteBackend, SyncCoordinator};

pub type AppState<B> = Arc<AppStateInner<B>>;

pub struct AppStateInner<B> {
    pub sync: SyncCoordinator,
    pub feed: FeedHandle,
    pub enhancer: Enhancer<B>,
}

pub fn router<B: RewriteBackend + 'static>(state: AppState<B>) -> Router {
    Router::new()
        .route(
            "/messages",
            get(messages::get_messages::<B>).post(messages::post_message::<B>),
        )
        .route("/polish", post(messages::polish_preview::<B>))
        .route("/quote", get(messages::daily_quote::<B>))
        .route("/health", get(health::health::<B>))
        .with_state(state)
}
