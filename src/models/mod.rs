//! Domain models for comment annotation.
//!
//! # Core Concepts
//!
//! - [`CommentRow`]: one comment of the loaded table together with its derived
//!   annotation, if the table has been analyzed.
//! - [`SentimentLabel`]: the label written to the `Sentimiento` column.
//! - [`SentimentScore`] / [`DocumentError`]: what the text analytics service
//!   returns for a single input text. Per-item failures are values, not errors
//!   of the whole call.

mod analysis;
mod comment;

pub use analysis::*;
pub use comment::*;

/// Column that must be present in a loaded table (unless overridden in settings).
pub const COMMENT_COLUMN: &str = "comment";

/// Derived column holding the [`SentimentLabel`].
pub const SENTIMENT_COLUMN: &str = "Sentimiento";

/// Derived column holding the positive confidence as a percentage.
pub const AFFINITY_COLUMN: &str = "Afinidad (%)";

/// Derived column holding the comma-joined key phrases.
pub const TAGS_COLUMN: &str = "Etiquetas";

/// All derived columns, in the order they are appended to a table.
pub const DERIVED_COLUMNS: [&str; 3] = [SENTIMENT_COLUMN, AFFINITY_COLUMN, TAGS_COLUMN];
