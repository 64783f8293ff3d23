use thiserror::Error;

/// Failure of the event stream itself. Cloned so a single failure can be
/// handed to every caller waiting on the stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("event stream transport failed: {0}")]
    Transport(String),

    #[error("malformed event payload: {message}")]
    Malformed { message: String },
}

/// Failure of a scan or interrupt request.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },
}
