//! Transport-only client primitives for Socrata-style tabular resources.
//!
//! This crate owns request building, header assembly and error-body parsing
//! for the resource endpoint only. It contains no pagination state, no
//! response decoding beyond error bodies, and no retry policy: callers decide
//! what to do with a failed request.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod url;

pub use client::SodaApiClient;
pub use config::SodaApiConfig;
pub use error::SodaApiError;
pub use crate::url::{normalize_resource_url, DEFAULT_SODA_ENDPOINT};

/// Status type carried by [`SodaApiError::Status`].
pub use reqwest::StatusCode;
