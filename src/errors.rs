//! Error kinds surfaced by the fragments client and the commands built on it.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single request against the fragments service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-2xx status. The body is never read.
    #[error("{status} {status_text}")]
    Http { status: u16, status_text: String },

    /// Connection, DNS or body transfer failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body did not match the shape expected for the request.
    #[error("unable to decode response: {0}")]
    Decode(String),

    /// A token or content type could not be turned into a header value.
    #[error("invalid header value for {0}")]
    InvalidHeader(String),

    #[error("invalid API url `{0}`")]
    InvalidUrl(String),

    /// `.` and `..` cannot be sent as a path segment; URL parsing folds them away.
    #[error("invalid fragment id `{0}`")]
    InvalidId(String),

    /// The local HTTP transport could not be built; no request was attempted.
    #[error("unable to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
}

impl ClientError {
    /// Build an `Http` error from a response status.
    pub fn http(status: StatusCode) -> Self {
        Self::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// HTTP status carried by the error, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// User input rejected before any request is made.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("No id entered")]
    NoId,
    #[error("Id cannot be `.` or `..`")]
    DotSegmentId,
    #[error("No data entered")]
    NoData,
}

/// Failure of a user-facing command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type CommandResult<T> = Result<T, CommandError>;
