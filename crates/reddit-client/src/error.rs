//! Error types for reddit-client

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, RedditError>;

/// Errors from the Reddit API transport and envelope parsing.
#[derive(Debug, Error)]
pub enum RedditError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reddit returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("reddit rejected the request ({code}): {message}")]
    Rejected { code: String, message: String },
}

/// Failure classes for the reply primitive.
///
/// Pre-classified so the watcher can pick a policy per class: retry once
/// with fallback text, drop with a warning, or drop with an error.
#[derive(Debug, Error)]
pub enum ReplyError {
    /// The bot may not post in this context (banned, locked, quarantined).
    #[error("replying is forbidden in this context")]
    Forbidden,

    /// The reply body exceeds Reddit's comment length limit.
    #[error("reply body exceeds the comment length limit")]
    ContentTooLong,

    /// Account-level rate limit; the message carries Reddit's cooldown hint.
    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error(transparent)]
    Api(#[from] RedditError),
}
