//! Text analytics service adapter.
//!
//! [`TextAnalytics`] is the seam the annotator talks to; [`LanguageClient`]
//! implements it against the cloud `language/:analyze-text` REST endpoint.

mod client;
pub mod types;

pub use client::*;

use async_trait::async_trait;

use crate::models::{KeyPhraseResult, SentimentResult};

/// Batch sentiment and key phrase extraction.
///
/// Both operations return exactly one result per input text, in input order.
/// A per-text failure is an `Err` item in the returned vector; an `Err` from
/// the call itself means the whole batch failed.
#[async_trait]
pub trait TextAnalytics: Send + Sync {
    async fn analyze_sentiment(&self, texts: &[String]) -> Result<Vec<SentimentResult>, ClientError>;

    async fn extract_key_phrases(
        &self,
        texts: &[String],
    ) -> Result<Vec<KeyPhraseResult>, ClientError>;
}
