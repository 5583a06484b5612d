//! Rich diagnostic error types for the sebayt engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers know exactly what went wrong
//! and how to fix it. Heuristic classification never fails and therefore has no
//! error type of its own.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the sebayt engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text, sources) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum SebaytError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors from validating an incoming search-result record at the boundary.
///
/// These are soft failures: the caller decides whether to surface them to the
/// user. No node is ever created from a record that fails validation.
#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("result url is not parseable: {url}")]
    #[diagnostic(
        code(sebayt::input::invalid_url),
        help(
            "The search result's `url` field must be an absolute, parseable URL \
             (e.g. `https://example.com/page`). The record was rejected and no \
             knowledge node was created."
        )
    )]
    InvalidUrl { url: String },

    #[error("result is missing required field `{field}`")]
    #[diagnostic(
        code(sebayt::input::missing_field),
        help(
            "Search-result records require non-empty `title`, `url`, `domain`, \
             and `snippet` fields. Check the upstream search collaborator's output."
        )
    )]
    MissingField { field: &'static str },
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from the persistence layer.
///
/// At the engine level these are logged and swallowed: in-memory state keeps
/// operating and a failed load simply starts from an empty store.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(sebayt::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("redb transaction error: {message}")]
    #[diagnostic(
        code(sebayt::store::redb),
        help(
            "The embedded database encountered a transaction error. \
             This may indicate corruption — try a fresh data directory."
        )
    )]
    Redb { message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(sebayt::store::serde),
        help(
            "Failed to serialize or deserialize a persisted blob. This usually \
             means the stored format changed between versions; the affected blob \
             is skipped and its store starts empty."
        )
    )]
    Serialization { message: String },
}

/// Convenience alias for functions returning sebayt results.
pub type SebaytResult<T> = std::result::Result<T, SebaytError>;
