//! Repository error types

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by the repositories
///
/// Nothing here is retried or recovered from; callers translate each kind
/// into their own error response.
#[derive(Debug, Error, Diagnostic)]
pub enum RepoError {
    /// The store rejected or failed to run the statement
    #[error("query failed: {0}")]
    #[diagnostic(code(trackside::repo::query))]
    Query(#[source] rusqlite::Error),

    /// A result row could not be scanned or converted
    #[error("failed to read {resource} row: {source}")]
    #[diagnostic(code(trackside::repo::materialize))]
    Materialize {
        resource: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("no {resource} with id: {id}")]
    #[diagnostic(
        code(trackside::repo::not_found),
        help("list without filters to see which ids exist")
    )]
    NotFound { resource: &'static str, id: i64 },

    #[error("{count} {resource} rows share id {id}")]
    #[diagnostic(code(trackside::repo::ambiguous))]
    Ambiguous {
        resource: &'static str,
        id: i64,
        count: usize,
    },

    /// Initialisation failed; repeated on every later `init` call
    #[error("failed to initialise {resource} repository: {message}")]
    #[diagnostic(code(trackside::repo::init))]
    Init {
        resource: &'static str,
        message: String,
    },

    #[error("database connection lock poisoned")]
    #[diagnostic(code(trackside::repo::poisoned))]
    Poisoned,

    #[error("failed to open database: {0}")]
    #[diagnostic(
        code(trackside::repo::open),
        help("check the --database path or the TRACKSIDE_DATABASE variable")
    )]
    Open(#[source] rusqlite::Error),
}
