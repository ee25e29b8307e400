use serde::{Deserialize, Serialize};

/// Document-level sentiment as reported by the service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Polarity {
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Positive)
    }
}

/// Successful sentiment analysis of one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub polarity: Polarity,
    /// Confidence of the positive class, in `[0, 1]`.
    pub positive_confidence: f64,
}

/// The service could not process one text of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentError {
    pub code: String,
    pub message: String,
}

impl DocumentError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Per-item outcome of a sentiment batch.
pub type SentimentResult = Result<SentimentScore, DocumentError>;

/// Per-item outcome of a key phrase batch, phrases in service order.
pub type KeyPhraseResult = Result<Vec<String>, DocumentError>;
