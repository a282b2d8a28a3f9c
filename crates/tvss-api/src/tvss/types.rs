//! TVSS response types.
//!
//! Schedule, upcoming and catalog records are passed through untyped; only
//! the callsign-by-ZIP response is interpreted by the client.

use serde::Deserialize;

/// Loosely-typed JSON record returned by TVSS.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Response of `callsigns/zip/{zip}.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZipCallsignsResponse {
    /// Stations serving the ZIP code, in upstream order. Entries may be `null`.
    #[serde(rename = "$items")]
    pub items: Vec<Option<ZipStation>>,
}

/// A station entry in a [`ZipCallsignsResponse`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ZipStation {
    /// Certainty that the station serves the ZIP code.
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Linked callsign records. `None` when absent or `null`.
    #[serde(rename = "$links", default)]
    pub links: Option<Vec<StationLink>>,
}

/// A callsign link inside a [`ZipStation`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StationLink {
    /// Broadcast callsign, e.g. `KQED`.
    #[serde(default)]
    pub callsign: Option<String>,
}
