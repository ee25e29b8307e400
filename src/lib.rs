//! Annotate spreadsheets of free-text comments with sentiment and key phrases.
//!
//! - [`store`] loads and saves the comment table
//! - [`analytics`] talks to the cloud text analytics service
//! - [`annotate`] merges service results back into the table
//! - [`shell`] is the interactive load / analyze / save surface

pub mod analytics;
pub mod annotate;
pub mod config;
pub mod models;
pub mod shell;
pub mod store;
