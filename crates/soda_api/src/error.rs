use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug)]
pub enum SodaApiError {
    InvalidUrl(String),
    InvalidHeader(String),
    Request(reqwest::Error),
    Status(StatusCode, String),
    Runtime(String),
}

/// Error body returned by the resource endpoint for rejected queries.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl ErrorPayload {
    pub fn message_or_fallback(&self) -> Option<String> {
        let explicit = self.message.as_deref().and_then(non_empty_string)?;
        match self.code.as_deref().and_then(non_empty_string) {
            Some(code) => Some(format!("{explicit} ({code})")),
            None => Some(explicit.to_owned()),
        }
    }
}

impl fmt::Display for SodaApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(value) => write!(f, "invalid resource URL: {value}"),
            Self::InvalidHeader(message) => write!(f, "invalid header: {message}"),
            Self::Request(error) => write!(f, "request error: {error}"),
            Self::Status(status, message) => write!(f, "HTTP {status} {message}"),
            Self::Runtime(message) => write!(f, "runtime error: {message}"),
        }
    }
}

impl std::error::Error for SodaApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Request(error) => Some(error),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SodaApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

/// Extract a human-readable message from a non-success response body.
pub fn parse_error_message(status: StatusCode, body: &str) -> String {
    let fallback = || {
        if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.trim().to_string()
        }
    };

    match serde_json::from_str::<ErrorPayload>(body) {
        Ok(payload) => payload.message_or_fallback().unwrap_or_else(fallback),
        Err(_) => fallback(),
    }
}

fn non_empty_string(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
