//! `TvssApi` trait definition.
#![allow(clippy::future_not_send)]

use serde_json::Value;

use super::types::Document;
use crate::error::ApiError;

/// TVSS API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TvssApi: Send)]
pub trait LocalTvssApi {
    /// Fetches one broadcast day of listings for a callsign.
    ///
    /// The callsign is lowercased. `datestring` is `YYYYMMDD`; when absent or
    /// empty it defaults to today. The result is annotated with `callsign`
    /// and `datestring`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or [`ApiError::EmptyResult`]
    /// if the body is not a JSON object.
    async fn day_schedule(
        &self,
        callsign: &str,
        datestring: Option<&str>,
    ) -> Result<Document, ApiError>;

    /// Lists upcoming airings of a program on a callsign. Requires an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or [`ApiError::EmptyResult`]
    /// if the body is not a JSON object.
    async fn upcoming_by_program_id(
        &self,
        callsign: &str,
        program_id: &str,
    ) -> Result<Document, ApiError>;

    /// Lists upcoming airings of a show (episode) on a callsign. Requires an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, or [`ApiError::EmptyResult`]
    /// if the body is not a JSON object.
    async fn upcoming_by_show_id(
        &self,
        callsign: &str,
        show_id: &str,
    ) -> Result<Document, ApiError>;

    /// Resolves the callsigns serving a ZIP code.
    ///
    /// `min_confidence` defaults to 0.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no `$items` list.
    async fn callsigns_by_zip(
        &self,
        zip: &str,
        min_confidence: Option<u32>,
    ) -> Result<Vec<String>, ApiError>;

    /// Fetches the full program catalog. Slow upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn programs(&self) -> Result<Value, ApiError>;

    /// Geolocates an IP address to a ZIP code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn zip_from_ip(&self, ip_address: &str) -> Result<Value, ApiError>;
}
