//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use comment_annotator::analytics::{ClientError, TextAnalytics};
use comment_annotator::models::*;

/// How the fake answers a batch.
#[derive(Clone)]
enum Mode {
    /// Return these results regardless of input.
    Canned {
        sentiments: Vec<SentimentResult>,
        phrases: Vec<KeyPhraseResult>,
    },
    /// Derive one result per input text.
    PerText,
    /// Fail the whole call.
    Unauthorized,
}

/// In-process stand-in for the text analytics service.
#[derive(Clone)]
pub struct FakeAnalytics {
    mode: Mode,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeAnalytics {
    pub fn canned(sentiments: Vec<SentimentResult>, phrases: Vec<KeyPhraseResult>) -> Self {
        Self::with_mode(Mode::Canned {
            sentiments,
            phrases,
        })
    }

    /// Texts containing "great" are positive (0.9), everything else negative
    /// (0.1); the key phrase is the text's first word.
    pub fn per_text() -> Self {
        Self::with_mode(Mode::PerText)
    }

    pub fn unauthorized() -> Self {
        Self::with_mode(Mode::Unauthorized)
    }

    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every batch received so far, sentiment and key phrase calls alike.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    fn record(&self, texts: &[String]) {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(texts.to_vec());
    }
}

pub fn positive(confidence: f64) -> SentimentResult {
    Ok(SentimentScore {
        polarity: Polarity::Positive,
        positive_confidence: confidence,
    })
}

pub fn negative(confidence: f64) -> SentimentResult {
    Ok(SentimentScore {
        polarity: Polarity::Negative,
        positive_confidence: confidence,
    })
}

pub fn phrases(words: &[&str]) -> KeyPhraseResult {
    Ok(words.iter().map(|w| w.to_string()).collect())
}

pub fn item_error() -> DocumentError {
    DocumentError::new("InvalidDocument", "Document text is empty.")
}

#[async_trait]
impl TextAnalytics for FakeAnalytics {
    async fn analyze_sentiment(&self, texts: &[String]) -> Result<Vec<SentimentResult>, ClientError> {
        self.record(texts);
        match &self.mode {
            Mode::Canned { sentiments, .. } => Ok(sentiments.clone()),
            Mode::PerText => Ok(texts
                .iter()
                .map(|t| {
                    if t.to_lowercase().contains("great") {
                        positive(0.9)
                    } else {
                        negative(0.1)
                    }
                })
                .collect()),
            Mode::Unauthorized => Err(ClientError::Unauthorized),
        }
    }

    async fn extract_key_phrases(
        &self,
        texts: &[String],
    ) -> Result<Vec<KeyPhraseResult>, ClientError> {
        self.record(texts);
        match &self.mode {
            Mode::Canned { phrases, .. } => Ok(phrases.clone()),
            Mode::PerText => Ok(texts
                .iter()
                .map(|t| Ok(t.split_whitespace().take(1).map(String::from).collect()))
                .collect()),
            Mode::Unauthorized => Err(ClientError::Unauthorized),
        }
    }
}
