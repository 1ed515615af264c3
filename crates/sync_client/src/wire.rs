//! Wire protocol structures
//!
//! Request: `{"lat": <f64>, "lng": <f64>, "roomId": "<string>"}`
//! Response: `{"data": {"arrivedInFifty": <bool?>, "distance": <number?>}}`

use serde::{Deserialize, Serialize};

/// POST body for one location report
#[derive(Debug, Serialize)]
pub struct ReportRequest<'a> {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "roomId")]
    pub room_id: &'a str,
}

/// Top-level 2xx response envelope
///
/// Every field is optional: a 2xx with any other shape degrades to a plain
/// delivery with no hints.
#[derive(Debug, Default, Deserialize)]
pub struct ReportEnvelope {
    #[serde(default)]
    pub data: Option<ReportData>,
}

/// Server feedback nested under `data`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// Arrival-within-range assertion; absent means false
    #[serde(default)]
    pub arrived_in_fifty: bool,

    /// Suggested displacement threshold (meters)
    #[serde(default)]
    pub distance: Option<f64>,
}
