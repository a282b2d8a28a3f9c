//! Client library for the PBS TV Schedule Service (TVSS).
//!
//! Provides [`tvss::TvssClient`] for broadcast day schedules, upcoming
//! listings, callsign-by-ZIP lookup, the program catalog and IP-to-ZIP
//! geolocation, with async and callback calling conventions.

/// Callback-style adapters.
pub mod callback;

/// Client configuration.
pub mod config;

/// Error types.
pub mod error;

/// Injectable logger.
pub mod logger;

/// TVSS API client.
pub mod tvss;

pub use callback::TvssApiCallbackExt;
pub use config::ClientConfig;
pub use error::{ApiError, ResponseStatus};
pub use logger::{LogLevel, Logger, NoopLogger, TracingLogger};
pub use tvss::{Document, LocalTvssApi, RequestOptions, TvssApi, TvssClient, TvssClientBuilder};
