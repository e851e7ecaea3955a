//! Error types for precis.
//!
//! Only configuration and input problems surface as [`Error`]. Failures of a
//! single LLM call are [`LlmError`](crate::LlmError)s and are absorbed by the
//! summarization driver.

use std::path::PathBuf;

/// Errors that abort a summarization run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// A required configuration value is absent.
    #[error("configuration error: {0} is not set")]
    MissingConfig(&'static str),

    /// A ratio selector could not be parsed.
    #[error("unknown ratio '{0}' (expected one of 5, 10, 20, 50, 100, all)")]
    InvalidRatio(String),

    /// No instruction template exists for a requested ratio.
    #[error("no prompt template for ratio {ratio} at {}", .path.display())]
    TemplateNotFound {
        /// The ratio label, e.g. `1:20`.
        ratio: String,
        /// Where the template was expected.
        path: PathBuf,
    },

    /// The template file exists but could not be read.
    #[error("failed to read prompt template {}: {source}", .path.display())]
    TemplateUnreadable {
        /// The template path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The template has nowhere to put the chunk text.
    #[error("prompt template {} has no {{text}} placeholder", .path.display())]
    TemplateMissingPlaceholder {
        /// The template path.
        path: PathBuf,
    },

    /// A ratio was summarized without its template having been resolved.
    #[error("prompt template for ratio {0} was not loaded")]
    TemplateNotResolved(String),

    /// The HTTP client for the LLM service could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    /// The input document does not exist.
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The PDF could not be read.
    #[error("failed to extract text from {}: {message}", .path.display())]
    Extraction {
        /// The input document.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The PDF contained no extractable text.
    #[error("no text could be extracted from {}", .0.display())]
    EmptyText(PathBuf),

    /// Chunking produced nothing to summarize.
    #[error("text chunking produced zero chunks")]
    NoChunks,

    /// Summarization produced nothing to report.
    #[error("summarization produced no results")]
    NoSummaries,

    /// The report could not be rendered.
    #[error("failed to render report: {0}")]
    Render(String),

    /// Writing the output file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for precis operations.
pub type Result<T> = std::result::Result<T, Error>;
