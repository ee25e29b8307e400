//! Wire types for the `language/:analyze-text` endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{DocumentError, Polarity, SentimentScore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskKind {
    SentimentAnalysis,
    KeyPhraseExtraction,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SentimentAnalysis => "SentimentAnalysis",
            Self::KeyPhraseExtraction => "KeyPhraseExtraction",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest<'a> {
    pub kind: TaskKind,
    pub analysis_input: AnalysisInput<'a>,
    pub parameters: TaskParameters,
}

#[derive(Debug, Serialize)]
pub struct AnalysisInput<'a> {
    pub documents: Vec<InputDocument<'a>>,
}

/// One text of a batch. `id` is the text's index in the caller's batch.
#[derive(Debug, Serialize)]
pub struct InputDocument<'a> {
    pub id: String,
    pub language: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskParameters {
    pub model_version: &'static str,
}

impl<'a> AnalyzeTextRequest<'a> {
    /// Build a request for `texts`, numbering documents from `offset`.
    pub fn new(kind: TaskKind, language: &'a str, offset: usize, texts: &'a [String]) -> Self {
        let documents = texts
            .iter()
            .enumerate()
            .map(|(i, text)| InputDocument {
                id: (offset + i).to_string(),
                language,
                text,
            })
            .collect();
        Self {
            kind,
            analysis_input: AnalysisInput { documents },
            parameters: TaskParameters {
                model_version: "latest",
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextResponse<D> {
    pub results: TaskResults<D>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResults<D> {
    pub documents: Vec<D>,
    #[serde(default)]
    pub errors: Vec<DocumentErrorEntry>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentErrorEntry {
    pub id: String,
    pub error: ServiceError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub innererror: Option<Box<ServiceError>>,
}

impl From<ServiceError> for DocumentError {
    /// The inner error carries the specific reason (e.g. `InvalidDocument`).
    fn from(error: ServiceError) -> Self {
        match error.innererror {
            Some(inner) => DocumentError::new(inner.code, inner.message),
            None => DocumentError::new(error.code, error.message),
        }
    }
}

/// Body of a failed request, e.g. `{"error": {"code": "401", "message": ...}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ServiceError,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentDocument {
    pub id: String,
    pub sentiment: Polarity,
    pub confidence_scores: ConfidenceScores,
}

#[derive(Debug, Deserialize)]
pub struct ConfidenceScores {
    pub positive: f64,
    #[serde(default)]
    pub neutral: f64,
    #[serde(default)]
    pub negative: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPhraseDocument {
    pub id: String,
    pub key_phrases: Vec<String>,
}

/// A successful per-document result, convertible to its domain value.
pub trait ResultDocument {
    type Output;

    fn id(&self) -> &str;
    fn into_output(self) -> Self::Output;
}

impl ResultDocument for SentimentDocument {
    type Output = SentimentScore;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_output(self) -> SentimentScore {
        SentimentScore {
            polarity: self.sentiment,
            positive_confidence: self.confidence_scores.positive,
        }
    }
}

impl ResultDocument for KeyPhraseDocument {
    type Output = Vec<String>;

    fn id(&self) -> &str {
        &self.id
    }

    fn into_output(self) -> Vec<String> {
        self.key_phrases
    }
}
