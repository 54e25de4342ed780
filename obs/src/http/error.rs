use http::StatusCode;
use thiserror::Error;

use crate::BoxedError;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-success status whose body is not a service error document.
    #[error("unexpected response status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },
    #[error("no transport configured and the default transport is not compiled in")]
    NoTransport,
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] http::Error),
    #[cfg(feature = "tokio-http")]
    #[error("reqwest transport error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Other(#[from] BoxedError),
}
