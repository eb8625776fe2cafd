//! Error types for the docrag pipeline.
//!
//! Build-time per-chunk embedding failures are recovered inside the index
//! store (chunk skipped with a warning) and never surface here. Everything
//! else propagates as a [`RagError`]; the HTTP layer collapses all variants
//! into a single generic 500 response.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the index or answering a query.
#[derive(Debug, Error)]
pub enum RagError {
    /// The configured corpus document does not exist.
    #[error("document not found: {}", .0.display())]
    DocumentNotFound(PathBuf),

    /// The corpus document produced zero chunks.
    #[error("no chunks generated from the document")]
    EmptyCorpus,

    /// Every chunk failed to embed during a rebuild.
    #[error("no valid embeddings generated")]
    NoValidEmbeddings,

    /// A query vector's dimension does not match the index dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension the index was built with.
        expected: usize,
        /// Dimension of the offending vector.
        got: usize,
    },

    /// A remote embedding or completion call failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// Filesystem error while reading the corpus or persisting artifacts.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization error while persisting the chunk mapping.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience result alias for docrag operations.
pub type Result<T> = std::result::Result<T, RagError>;
