use serde::{Deserialize, Serialize};

use super::{KeyPhraseResult, SentimentResult, SentimentScore};

/// The label written for each analyzed comment.
///
/// - `Positive`: the service classified the comment as positive
/// - `Negative`: any other classification (negative, neutral, mixed)
/// - `Error`: the service could not analyze this particular comment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Error,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positivo",
            Self::Negative => "Negativo",
            Self::Error => "Error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Positivo" => Some(Self::Positive),
            "Negativo" => Some(Self::Negative),
            "Error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The derived values for one comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub sentiment: SentimentLabel,
    /// Positive confidence as a percentage, rounded to 2 decimals. Zero on error.
    pub affinity_percent: f64,
    /// Key phrases joined with `", "`. Empty on error or when none were found.
    pub tags: String,
}

impl Annotation {
    /// Build the annotation from the two independent per-item service results.
    pub fn from_results(sentiment: &SentimentResult, phrases: &KeyPhraseResult) -> Self {
        let (label, affinity_percent) = match sentiment {
            Ok(score) => (score.label(), to_percent(score.positive_confidence)),
            Err(_) => (SentimentLabel::Error, 0.0),
        };
        let tags = match phrases {
            Ok(phrases) => phrases.join(", "),
            Err(_) => String::new(),
        };
        Self {
            sentiment: label,
            affinity_percent,
            tags,
        }
    }
}

impl SentimentScore {
    pub fn label(&self) -> SentimentLabel {
        if self.polarity.is_positive() {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        }
    }
}

/// Scale a `[0, 1]` confidence to a percentage rounded to 2 decimals.
pub fn to_percent(confidence: f64) -> f64 {
    (confidence * 100.0 * 100.0).round() / 100.0
}

/// One row of the comment table as seen by the results view.
///
/// `annotation` is `None` until the table has been analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRow {
    pub comment: String,
    pub annotation: Option<Annotation>,
}
