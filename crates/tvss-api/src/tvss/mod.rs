//! TVSS API client module.
//!
//! Handles HTTP requests to the PBS TV Schedule Service and the related
//! callsign and ZIP-code lookup services on the same host.

mod api;
mod client;
mod types;
mod util;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTvssApi, TvssApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{API_KEY_HEADER, DEFAULT_BASE_URL, RequestOptions, TvssClient, TvssClientBuilder};
pub use types::{Document, StationLink, ZipCallsignsResponse, ZipStation};
pub use util::{DATESTRING_FORMAT, extract_callsigns, today_datestring};
