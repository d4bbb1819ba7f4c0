use std::future::Future;

use anyhow::{Result, anyhow};
use tracing::warn;

/// Returned by `daily_quote` when no backend is available.
pub const FALLBACK_QUOTE: &str = "Every day is a new opportunity to grow together.";

/// Returned by `daily_quote` when the backend call fails.
pub const ERROR_QUOTE: &str = "Community is the heart of every great achievement.";

const POLISH_PROMPT: &str = "I want to post a daily message on a community bulletin. \
Please polish this message to make it sound inspiring, clear, and professional yet warm. \
Keep it concise. Original message: ";

const QUOTE_PROMPT: &str = "Generate a short, inspiring, and unique one-sentence quote for a \
daily community bulletin. Do not use quotes from famous people, create something fresh and \
relevant for a modern community.";

/// A text-generation service. Allowed to fail; [`Enhancer`] absorbs failures.
pub trait RewriteBackend: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Backend used when nothing is configured. Always fails, so the enhancer
/// passes text through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackend;

impl RewriteBackend for NoBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(anyhow!("no text enhancement backend configured"))
    }
}

/// Optional text rewrite with graceful degradation: `polish` never fails and
/// hands back the input whenever the backend is missing or misbehaves.
pub struct Enhancer<B> {
    backend: Option<B>,
}

impl Enhancer<NoBackend> {
    pub fn disabled() -> Self {
        Self { backend: None }
    }
}

impl<B: RewriteBackend> Enhancer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    pub async fn polish(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let Some(backend) = &self.backend else {
            return text.to_string();
        };

        match backend.generate(&format!("{}\"{}\"", POLISH_PROMPT, text)).await {
            Ok(polished) if !polished.trim().is_empty() => polished.trim().to_string(),
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!("Error polishing message: {}", e);
                text.to_string()
            }
        }
    }

    pub async fn daily_quote(&self) -> String {
        let Some(backend) = &self.backend else {
            return FALLBACK_QUOTE.to_string();
        };

        match backend.generate(QUOTE_PROMPT).await {
            Ok(quote) if !quote.trim().is_empty() => quote.trim().to_string(),
            Ok(_) => FALLBACK_QUOTE.to_string(),
            Err(e) => {
                warn!("Error generating quote: {}", e);
                ERROR_QUOTE.to_string()
            }
        }
    }
}
