use page_fetch::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid value for {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("unrecognized option(s): {}", tokens.join(","))]
    InvalidCommand { tokens: Vec<String> },

    #[error("failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },
}

impl SessionError {
    #[must_use]
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn fetch_failed(url: impl Into<String>, source: FetchError) -> Self {
        Self::FetchFailed {
            url: url.into(),
            source,
        }
    }
}
