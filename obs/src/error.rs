use http::StatusCode;
use thiserror::Error;

use crate::{credential::AuthorizeError, http::HttpError};

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] HttpError),
    #[error("authorize error: {0}")]
    Authorize(#[from] AuthorizeError),
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::DeError),
    #[error(
        "service error, status: {status}, code: {code}, message: {message}, request id: \
         {request_id}"
    )]
    Service {
        status: StatusCode,
        code: String,
        message: String,
        request_id: String,
    },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("invalid configuration: {message}")]
    Config { message: String },
    #[error(transparent)]
    Other(#[from] BoxedError),
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Error code reported by the storage service, if this is a service error.
    pub fn service_code(&self) -> Option<&str> {
        match self {
            Error::Service { code, .. } => Some(code),
            _ => None,
        }
    }
}
