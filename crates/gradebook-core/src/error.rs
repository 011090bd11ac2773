//! Input error types.
//!
//! The grading pipeline itself never fails on malformed domain data; these
//! errors belong to the boundary where raw documents are decoded and a
//! branch is selected.

use thiserror::Error;

use crate::model::Branch;

/// Errors that can occur while turning raw input into pipeline values.
#[derive(Debug, Error)]
pub enum InputError {
    /// The document is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The branch name matches neither recognized program.
    #[error("unknown branch '{0}' (expected \"general\" or \"software-engineering\")")]
    UnknownBranch(String),

    /// The curriculum document has no section for the requested branch.
    #[error("curriculum for branch '{0}' not found")]
    MissingCurriculum(Branch),

    /// The transcript document is neither an object nor an array.
    #[error("unsupported transcript document: expected an object or array, found {0}")]
    UnsupportedFormat(&'static str),
}
