//! HTTP client for the cloud text analytics service.
//!
//! Every call is a synchronous `analyze-text` task. Batches larger than the
//! configured size are split into consecutive requests, throttling and server
//! errors are retried with exponential backoff, and results are put back in
//! input order by document id.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::*;
use super::TextAnalytics;
use crate::config::Settings;
use crate::models::*;

pub const API_VERSION: &str = "2023-04-01";
const ANALYZE_TEXT_PATH: &str = "/language/:analyze-text";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
/// Upper bound on a server-requested `Retry-After` wait.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Batch-level client errors. Per-document failures are [`DocumentError`]s.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Text analytics is not configured: {0} is missing")]
    NotConfigured(&'static str),

    #[error("Unauthorized: API key missing or invalid")]
    Unauthorized,

    #[error("Rate limited: {message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
    },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Server(_) => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Wait the service asked for before the next attempt, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Client for the `language/:analyze-text` endpoint.
#[derive(Debug, Clone)]
pub struct LanguageClient {
    endpoint: Option<String>,
    api_key: String,
    language: String,
    max_batch_size: usize,
    retry: RetryPolicy,
    client: Client,
}

impl LanguageClient {
    /// Create with explicit configuration. Credentials are not checked here.
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            endpoint: settings
                .endpoint
                .as_ref()
                .map(|e| e.trim_end_matches('/').to_string()),
            api_key: settings.api_key.clone().unwrap_or_default(),
            language: settings.language.clone(),
            max_batch_size: settings.max_batch_size.max(1),
            retry: RetryPolicy {
                max_retries: settings.max_retries,
                backoff: settings.retry_backoff(),
            },
            client,
        })
    }

    fn url(&self) -> Result<String, ClientError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(ClientError::NotConfigured("endpoint"))?;
        Ok(format!("{}{}", endpoint, ANALYZE_TEXT_PATH))
    }

    /// Run one task kind over all `texts`, chunked and realigned.
    async fn analyze<D>(
        &self,
        kind: TaskKind,
        texts: &[String],
    ) -> Result<Vec<Result<D::Output, DocumentError>>, ClientError>
    where
        D: ResultDocument + DeserializeOwned,
    {
        let mut results = Vec::with_capacity(texts.len());
        if texts.is_empty() {
            return Ok(results);
        }

        let url = self.url()?;
        for (chunk_idx, chunk) in texts.chunks(self.max_batch_size).enumerate() {
            let offset = chunk_idx * self.max_batch_size;
            let request = AnalyzeTextRequest::new(kind, &self.language, offset, chunk);
            let task: TaskResults<D> = self.post_with_retry(&url, &request).await?;
            tracing::debug!(
                kind = kind.as_str(),
                offset,
                documents = task.documents.len(),
                errors = task.errors.len(),
                model_version = task.model_version.as_deref().unwrap_or("unknown"),
                "Received task results"
            );
            results.extend(align(task, offset, chunk.len())?);
        }
        Ok(results)
    }

    async fn post_with_retry<D: DeserializeOwned>(
        &self,
        url: &str,
        request: &AnalyzeTextRequest<'_>,
    ) -> Result<TaskResults<D>, ClientError> {
        let mut attempt = 0;
        loop {
            match self.post(url, request).await {
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    let delay = e
                        .retry_after()
                        .unwrap_or_else(|| self.retry.delay(attempt));
                    tracing::warn!(
                        kind = request.kind.as_str(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "Transient failure, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn post<D: DeserializeOwned>(
        &self,
        url: &str,
        request: &AnalyzeTextRequest<'_>,
    ) -> Result<TaskResults<D>, ClientError> {
        tracing::debug!(
            kind = request.kind.as_str(),
            documents = request.analysis_input.documents.len(),
            "Posting analyze-text task"
        );
        let response = self
            .client
            .post(url)
            .query(&[("api-version", API_VERSION)])
            .header(KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle response, converting HTTP errors to ClientError.
    async fn handle_response<D: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<TaskResults<D>, ClientError> {
        let status = response.status();
        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await?;
        if status.is_success() {
            let parsed: AnalyzeTextResponse<D> = serde_json::from_str(&body)
                .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
            return Ok(parsed.results);
        }

        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| format!("{}: {}", e.error.code, e.error.message))
            .unwrap_or(body);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ClientError::Unauthorized),
            StatusCode::TOO_MANY_REQUESTS => Err(ClientError::RateLimited {
                message,
                retry_after,
            }),
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(message)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(message)),
            s if s.is_server_error() => Err(ClientError::Server(format!("{}: {}", s, message))),
            s => Err(ClientError::BadRequest(format!("{}: {}", s, message))),
        }
    }
}

/// `Retry-After` in its delta-seconds form, capped at [`MAX_RETRY_AFTER`].
/// HTTP-date values are ignored and fall back to the backoff policy.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let seconds: u64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(seconds).min(MAX_RETRY_AFTER))
}

/// Put a chunk's results back in request order.
///
/// Every id in `offset..offset + len` must appear exactly once across the
/// successful documents and the errors.
fn align<D: ResultDocument>(
    task: TaskResults<D>,
    offset: usize,
    len: usize,
) -> Result<Vec<Result<D::Output, DocumentError>>, ClientError> {
    let mut slots: Vec<Option<Result<D::Output, DocumentError>>> =
        std::iter::repeat_with(|| None).take(len).collect();

    let mut place = |id: &str, value: Result<D::Output, DocumentError>| {
        let idx = id
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(offset))
            .filter(|&i| i < len)
            .ok_or_else(|| ClientError::MalformedResponse(format!("unexpected document id '{}'", id)))?;
        if slots[idx].replace(value).is_some() {
            return Err(ClientError::MalformedResponse(format!(
                "duplicate document id '{}'",
                id
            )));
        }
        Ok(())
    };

    for doc in task.documents {
        let id = doc.id().to_string();
        place(&id, Ok(doc.into_output()))?;
    }
    for entry in task.errors {
        place(&entry.id, Err(entry.error.into()))?;
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| {
            slot.ok_or_else(|| {
                ClientError::MalformedResponse(format!("no result for document '{}'", offset + i))
            })
        })
        .collect()
}

#[async_trait]
impl TextAnalytics for LanguageClient {
    async fn analyze_sentiment(&self, texts: &[String]) -> Result<Vec<SentimentResult>, ClientError> {
        self.analyze::<SentimentDocument>(TaskKind::SentimentAnalysis, texts)
            .await
    }

    async fn extract_key_phrases(
        &self,
        texts: &[String],
    ) -> Result<Vec<KeyPhraseResult>, ClientError> {
        self.analyze::<KeyPhraseDocument>(TaskKind::KeyPhraseExtraction, texts)
            .await
    }
}
