//! Failure taxonomy for one pipeline turn.

use std::time::Duration;
use thiserror::Error;

/// Every way a turn can fail, as a typed value the retry loop can branch on.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Provider-signaled throttling on a model call. Carries the provider's
    /// suggested delay when a `Retry-After` header was present.
    #[error("model provider rate limited the request")]
    RateLimited { retry_after: Option<Duration> },

    /// The database could not be reached at all.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// The statement ran and the driver rejected it (malformed SQL,
    /// constraint violation, unknown table).
    #[error("statement execution failed: {0}")]
    Execution(String),

    /// The model call failed for a non-throttling reason.
    #[error("model request failed: {0}")]
    Model(String),

    /// Anything else. Logged and surfaced, never swallowed.
    #[error("{0}")]
    Unexpected(String),
}

impl PipelineError {
    /// The string the chat surface shows for a terminal failure. The chat
    /// surface only ever handles plain text, so every variant maps to one.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Connection(_) => "Failed to connect to the database.".to_string(),
            PipelineError::Execution(msg) => format!("Error executing query: {}", msg),
            other => format!("Error generating response: {}", other),
        }
    }

    /// True when the retry controller should back off and rerun the turn.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, PipelineError::RateLimited { .. })
    }
}
