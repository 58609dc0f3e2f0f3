use thiserror::Error;

/// Failures crossing the API boundary.
///
/// `Network` covers transport problems and non-2xx statuses; `Format` covers
/// payloads the client cannot make sense of (wrong envelope, non-success
/// status, unparseable body); `Rejected` is the server explicitly declining a
/// request with a message (failed login, refused mutation).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected payload: {0}")]
    Format(String),
    #[error("{0}")]
    Rejected(String),
}
