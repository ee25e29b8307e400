//! Annotate a loaded table with sentiment, affinity and tags.

use thiserror::Error;

use crate::analytics::{ClientError, TextAnalytics};
use crate::models::*;
use crate::store::{Cell, StoreError, Table};

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("No table has been loaded")]
    NoDataLoaded,

    #[error("The table has no '{0}' column")]
    MissingCommentColumn(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(#[source] AnalysisFailure),
}

/// Underlying cause of [`AnnotateError::AnalysisFailed`].
#[derive(Debug, Error)]
pub enum AnalysisFailure {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("service returned {actual} {kind} results for {expected} comments")]
    ResultCount {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AnalysisFailure> for AnnotateError {
    fn from(e: AnalysisFailure) -> Self {
        Self::AnalysisFailed(e)
    }
}

impl From<ClientError> for AnnotateError {
    fn from(e: ClientError) -> Self {
        Self::AnalysisFailed(e.into())
    }
}

impl From<StoreError> for AnnotateError {
    fn from(e: StoreError) -> Self {
        Self::AnalysisFailed(e.into())
    }
}

/// Counts from a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisReport {
    pub rows: usize,
    pub positive: usize,
    pub negative: usize,
    pub sentiment_errors: usize,
    pub key_phrase_errors: usize,
}

/// Runs the analysis pass over a [`Table`].
pub struct Annotator {
    analytics: Box<dyn TextAnalytics>,
    comment_column: String,
}

impl Annotator {
    pub fn new(analytics: Box<dyn TextAnalytics>) -> Self {
        Self::with_comment_column(analytics, COMMENT_COLUMN)
    }

    pub fn with_comment_column(analytics: Box<dyn TextAnalytics>, column: impl Into<String>) -> Self {
        Self {
            analytics,
            comment_column: column.into(),
        }
    }

    pub fn comment_column(&self) -> &str {
        &self.comment_column
    }

    /// Analyze every comment of `table` and write the derived columns.
    ///
    /// The table is only modified once all results are in hand; any failure
    /// leaves it exactly as it was.
    pub async fn run(&self, table: Option<&mut Table>) -> Result<AnalysisReport, AnnotateError> {
        let table = table.ok_or(AnnotateError::NoDataLoaded)?;
        let comments: Vec<String> = table
            .column(&self.comment_column)
            .ok_or_else(|| AnnotateError::MissingCommentColumn(self.comment_column.clone()))?
            .map(Cell::to_text)
            .collect();

        tracing::info!(rows = comments.len(), "Analyzing comments");

        let sentiments = self.analytics.analyze_sentiment(&comments).await?;
        check_count("sentiment", comments.len(), sentiments.len())?;
        let phrases = self.analytics.extract_key_phrases(&comments).await?;
        check_count("key phrase", comments.len(), phrases.len())?;

        let mut report = AnalysisReport {
            rows: comments.len(),
            ..Default::default()
        };
        let mut labels = Vec::with_capacity(comments.len());
        let mut affinities = Vec::with_capacity(comments.len());
        let mut tags = Vec::with_capacity(comments.len());

        for (sentiment, keys) in sentiments.iter().zip(&phrases) {
            let annotation = Annotation::from_results(sentiment, keys);
            match annotation.sentiment {
                SentimentLabel::Positive => report.positive += 1,
                SentimentLabel::Negative => report.negative += 1,
                SentimentLabel::Error => report.sentiment_errors += 1,
            }
            if keys.is_err() {
                report.key_phrase_errors += 1;
            }
            labels.push(Cell::from(annotation.sentiment.as_str()));
            affinities.push(Cell::Number(annotation.affinity_percent));
            tags.push(Cell::Text(annotation.tags));
        }

        // All three have one value per row; none of these can fail half-way.
        table.set_column(SENTIMENT_COLUMN, labels)?;
        table.set_column(AFFINITY_COLUMN, affinities)?;
        table.set_column(TAGS_COLUMN, tags)?;

        tracing::info!(
            rows = report.rows,
            positive = report.positive,
            negative = report.negative,
            sentiment_errors = report.sentiment_errors,
            key_phrase_errors = report.key_phrase_errors,
            "Analysis complete"
        );
        Ok(report)
    }
}

fn check_count(kind: &'static str, expected: usize, actual: usize) -> Result<(), AnalysisFailure> {
    if expected == actual {
        Ok(())
    } else {
        Err(AnalysisFailure::ResultCount {
            kind,
            expected,
            actual,
        })
    }
}
