//! Minimal transport-agnostic contract for fetching one page of results.
//!
//! This crate defines only the single-shot request/response capability that a
//! paginated session consumes. It excludes HTTP details, TLS, retries and
//! response decoding.

use std::fmt;
use std::sync::Arc;

/// Error returned by a [`PageFetcher`] when no usable body could be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (connect, TLS, timeout, ...).
    Transport(String),
    /// The endpoint answered with a non-success status.
    Status { status: u16, message: String },
    /// A response arrived but its body could not be interpreted.
    MalformedBody(String),
}

impl FetchError {
    /// Creates a transport error from any displayable cause.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a malformed-body error from any displayable cause.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedBody(message.into())
    }

    /// Returns the HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport error: {message}"),
            Self::Status { status, message } => write!(f, "HTTP {status} {message}"),
            Self::MalformedBody(message) => write!(f, "malformed response body: {message}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Single-shot request/response primitive returning the response body.
///
/// Implementations are called serially by one session; they are never asked to
/// serve overlapping requests for the same session.
pub trait PageFetcher {
    /// Stable identifier for logs and diagnostics.
    fn fetcher_id(&self) -> &str;

    /// Fetches `url` and returns the full response body as text.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetcher_id(&self) -> &str {
        (**self).fetcher_id()
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    fn fetcher_id(&self) -> &str {
        (**self).fetcher_id()
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    fn fetcher_id(&self) -> &str {
        (**self).fetcher_id()
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}
