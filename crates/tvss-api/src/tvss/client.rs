//! `TvssClient` - TVSS API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::TvssApi;
use super::types::{Document, ZipCallsignsResponse};
use super::util::{annotate, extract_callsigns, today_datestring};
use crate::callback::deliver;
use crate::config::ClientConfig;
use crate::error::{ApiError, ResponseStatus};
use crate::logger::{LogLevel, Logger, TracingLogger};

/// Default base URL (PBS production services host).
pub const DEFAULT_BASE_URL: &str = "https://services.pbs.org/";

/// Header carrying the API key (`X-PBSAUTH`).
pub const API_KEY_HEADER: &str = "x-pbsauth";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Options for a single [`TvssClient::perform_request`] call.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method.
    pub method: Method,
    /// Absolute request URL.
    pub url: Url,
    /// Request headers, sent as given.
    pub headers: HeaderMap,
}

impl RequestOptions {
    /// Creates a GET request with no headers.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
        }
    }

    /// Replaces the request headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// TVSS API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TvssClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL, always ending in `/`.
    base_url: Url,
    /// API key sent as `X-PBSAUTH`.
    api_key: Option<String>,
    /// Headers attached to every endpoint request.
    base_headers: HeaderMap,
    /// Failure sink.
    logger: Arc<dyn Logger>,
}

/// Builder for `TvssClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TvssClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    logger: Option<Arc<dyn Logger>>,
    log_level: Option<LogLevel>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TvssClientBuilder {
    /// Creates a new builder.
    fn new() -> Self {
        Self::default()
    }

    /// Overrides the base URL (staging hosts, wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key sent with every request.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Injects a logger (default: [`TracingLogger`] at `info`).
    #[must_use]
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets the logger's verbosity at build time.
    #[must_use]
    pub const fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Sets the User-Agent (default: `tvss-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets a transport timeout. Without one, only the transport's defaults apply.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Applies every option present in `config`.
    #[must_use]
    pub fn config(mut self, config: &ClientConfig) -> Self {
        if let Some(ref url) = config.base_url {
            self.base_url = Some(url.clone());
        }
        if let Some(ref key) = config.api_key {
            self.api_key = Some(key.clone());
        }
        if let Some(level) = config.log_level {
            self.log_level = Some(level);
        }
        if let Some(ref ua) = config.user_agent {
            self.user_agent = Some(ua.clone());
        }
        if let Some(secs) = config.timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - The base URL cannot carry a path.
    /// - `api_key` is not a valid header value.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TvssClient> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };
        let base_url = normalize_base_url(base_url)?;

        let logger: Arc<dyn Logger> = match self.logger {
            Some(logger) => logger,
            None => Arc::new(TracingLogger::default()),
        };
        if let Some(level) = self.log_level {
            logger.set_level(level);
        }

        let base_headers =
            build_headers(self.api_key.as_deref()).context("api_key is not a valid header value")?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));
        let mut http_builder = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http_client = http_builder
            .build()
            .context("failed to build HTTP client")?;

        Ok(TvssClient {
            http_client,
            base_url,
            api_key: self.api_key,
            base_headers,
            logger,
        })
    }
}

/// Ensures the base URL can be joined and ends with `/`.
fn normalize_base_url(mut url: Url) -> Result<Url> {
    if url.cannot_be_a_base() {
        bail!("base URL cannot carry a path: {url}");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Builds the header map for an optional API key.
fn build_headers(api_key: Option<&str>) -> std::result::Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::new();
    if let Some(key) = api_key {
        let mut value = HeaderValue::from_str(key)?;
        value.set_sensitive(true);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
    }
    Ok(headers)
}

impl TvssClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> TvssClientBuilder {
        TvssClientBuilder::new()
    }

    /// Creates a client from a [`ClientConfig`] with the default logger.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`TvssClientBuilder::build`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the current API key.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the headers attached to every endpoint request.
    #[must_use]
    pub const fn base_headers(&self) -> &HeaderMap {
        &self.base_headers
    }

    /// Replaces the API key and regenerates the request headers.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidApiKey`] if `key` is not a valid header
    /// value. The previous key stays in effect.
    pub fn set_api_key(&mut self, key: impl Into<String>) -> std::result::Result<(), ApiError> {
        let key = key.into();
        let headers = build_headers(Some(&key))
            .map_err(|e| self.fail("TvssClient.set_api_key", ApiError::InvalidApiKey(e)))?;
        self.api_key = Some(key);
        self.base_headers = headers;
        Ok(())
    }

    /// Removes the API key; subsequent requests carry no `X-PBSAUTH` header.
    pub fn clear_api_key(&mut self) {
        self.api_key = None;
        self.base_headers = HeaderMap::new();
    }

    /// Appends path segments (percent-encoded) to the base URL.
    ///
    /// An empty final segment yields a trailing `/`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if the base URL cannot carry a path.
    pub fn endpoint_url(&self, segments: &[&str]) -> std::result::Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                self.fail(
                    "TvssClient.endpoint_url",
                    ApiError::InvalidBaseUrl(self.base_url.to_string()),
                )
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    /// Issues one HTTP request and parses the JSON body.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] if the request or body read fails.
    /// - [`ApiError::HttpStatus`] if the status is not 200.
    /// - [`ApiError::Decode`] if the body is not JSON.
    #[instrument(skip_all, fields(method = %options.method, url = %options.url))]
    pub async fn perform_request(
        &self,
        options: RequestOptions,
    ) -> std::result::Result<Value, ApiError> {
        let RequestOptions {
            method,
            url,
            headers,
        } = options;

        tracing::debug!("TVSS API request");

        let send_result = self
            .http_client
            .request(method, url)
            .headers(headers)
            .send()
            .await;
        let response = match send_result {
            Ok(r) => r,
            Err(e) => {
                return Err(self.fail("TvssClient.perform_request", ApiError::Transport(e)));
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Err(self.fail(
                "TvssClient.perform_request",
                ApiError::HttpStatus {
                    status: ResponseStatus::Code(status.as_u16()),
                },
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.fail("TvssClient.perform_request", ApiError::Transport(e)))?;
        tracing::debug!(body_len = body.len(), "TVSS API response received");

        serde_json::from_str(&body)
            .map_err(|e| self.fail("TvssClient.perform_request", ApiError::Decode(e)))
    }

    /// Callback-style [`perform_request`](Self::perform_request).
    pub async fn perform_request_with_callback<F, R>(&self, options: RequestOptions, callback: F) -> R
    where
        F: FnOnce(std::result::Result<Value, ApiError>) -> R,
    {
        deliver(self.perform_request(options), callback).await
    }

    /// GET options for `url` carrying the current base headers.
    fn authorized_get(&self, url: Url) -> RequestOptions {
        RequestOptions::get(url).headers(self.base_headers.clone())
    }

    /// Fetches a JSON object and merges `fields` into it.
    async fn get_annotated(
        &self,
        endpoint: &'static str,
        segments: &[&str],
        fields: &[(&str, &str)],
    ) -> std::result::Result<Document, ApiError> {
        let url = self.endpoint_url(segments)?;
        let result = self.perform_request(self.authorized_get(url)).await?;
        annotate(result, fields).ok_or_else(|| {
            self.fail(
                &format!("TvssClient.{endpoint}"),
                ApiError::EmptyResult { endpoint },
            )
        })
    }

    /// Reports `err` to the logger and hands it back.
    fn fail(&self, context: &str, err: ApiError) -> ApiError {
        self.logger.error(context, &err);
        err
    }
}

impl TvssApi for TvssClient {
    #[instrument(skip(self))]
    async fn day_schedule(
        &self,
        callsign: &str,
        datestring: Option<&str>,
    ) -> std::result::Result<Document, ApiError> {
        let callsign = callsign.to_lowercase();
        let datestring = datestring
            .filter(|d| !d.is_empty())
            .map_or_else(today_datestring, String::from);

        self.get_annotated(
            "day_schedule",
            &["tvss", callsign.as_str(), "day", datestring.as_str(), ""],
            &[("callsign", callsign.as_str()), ("datestring", datestring.as_str())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn upcoming_by_program_id(
        &self,
        callsign: &str,
        program_id: &str,
    ) -> std::result::Result<Document, ApiError> {
        let callsign = callsign.to_lowercase();

        self.get_annotated(
            "upcoming_by_program_id",
            &["tvss", callsign.as_str(), "upcoming", "program", program_id, ""],
            &[("callsign", callsign.as_str())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn upcoming_by_show_id(
        &self,
        callsign: &str,
        show_id: &str,
    ) -> std::result::Result<Document, ApiError> {
        let callsign = callsign.to_lowercase();

        self.get_annotated(
            "upcoming_by_show_id",
            &["tvss", callsign.as_str(), "upcoming", "show", show_id, ""],
            &[("callsign", callsign.as_str())],
        )
        .await
    }

    #[instrument(skip(self))]
    async fn callsigns_by_zip(
        &self,
        zip: &str,
        min_confidence: Option<u32>,
    ) -> std::result::Result<Vec<String>, ApiError> {
        let file = format!("{zip}.json");
        let url = self.endpoint_url(&["callsigns", "zip", file.as_str()])?;
        let data = self.perform_request(self.authorized_get(url)).await?;

        let response: ZipCallsignsResponse = serde_json::from_value(data)
            .map_err(|e| self.fail("TvssClient.callsigns_by_zip", ApiError::Decode(e)))?;
        let callsigns = extract_callsigns(&response, min_confidence.unwrap_or(0));
        tracing::debug!(count = callsigns.len(), "callsigns resolved");
        Ok(callsigns)
    }

    #[instrument(skip_all)]
    async fn programs(&self) -> std::result::Result<Value, ApiError> {
        let url = self.endpoint_url(&["tvss", "programs"])?;
        self.perform_request(self.authorized_get(url)).await
    }

    #[instrument(skip(self))]
    async fn zip_from_ip(&self, ip_address: &str) -> std::result::Result<Value, ApiError> {
        let file = format!("{ip_address}.json");
        let url = self.endpoint_url(&["zipcodes", "ip", file.as_str()])?;
        self.perform_request(self.authorized_get(url)).await
    }
}
