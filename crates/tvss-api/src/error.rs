//! Error taxonomy for TVSS API calls.

use std::fmt;

use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Status reported by an [`ApiError::HttpStatus`] failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// A response arrived with this status code.
    Code(u16),
    /// No response object was available at all.
    NoResponse,
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::NoResponse => write!(f, "no response"),
        }
    }
}

/// Failure of a TVSS API operation.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum ApiError {
    /// The HTTP call itself failed (DNS, connection refused, reset, body read).
    #[error("TVSS request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// A response was received but its status was not 200.
    #[error("TVSS API error (HTTP {status})")]
    HttpStatus {
        /// Status code, or [`ResponseStatus::NoResponse`].
        status: ResponseStatus,
    },

    /// Status was 200 but the body did not decode.
    #[error("failed to decode TVSS JSON response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The endpoint returned `null` or a non-object where a record was expected.
    #[error("TVSS returned an empty result for {endpoint}")]
    EmptyResult {
        /// Name of the endpoint method.
        endpoint: &'static str,
    },

    /// The configured base URL cannot have path segments appended.
    #[error("invalid TVSS base URL: {0}")]
    InvalidBaseUrl(String),

    /// The API key is not a valid HTTP header value.
    #[error("invalid API key: {0}")]
    InvalidApiKey(#[source] InvalidHeaderValue),
}

impl ApiError {
    /// Returns the HTTP status code for [`ApiError::HttpStatus`] failures.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus {
                status: ResponseStatus::Code(code),
            } => Some(*code),
            _ => None,
        }
    }
}
