//! Remote map client.
//!
//! One GET against the map generation endpoint per call, bounded by a
//! timeout, with the JSON envelope translated into a [`MapSummary`]. There is
//! no retry: any failure ends that call.
//!
//! The HTTP exchange goes through [`MapTransport`] so the request building
//! and envelope handling can be exercised without a network.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{info, warn};

use super::Arguments;
use crate::core::error::MapError;

pub const DEFAULT_ENDPOINT: &str =
    "https://dcujcwokb9.execute-api.us-east-1.amazonaws.com/prod/generate-map";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_RADIUS: i64 = 50;
pub const DEFAULT_CLUSTERS: i64 = 50;

/// Performs the HTTP GET and hands back the undecoded body.
#[async_trait]
pub trait MapTransport: Send + Sync {
    async fn fetch(&self, url: &str, query: &[(&'static str, String)]) -> Result<String, MapError>;
}

/// [`MapTransport`] over a shared `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, MapError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MapError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MapTransport for HttpTransport {
    async fn fetch(&self, url: &str, query: &[(&'static str, String)]) -> Result<String, MapError> {
        // The status code is not checked; the envelope says whether it worked.
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| MapError::Network(e.to_string()))?;
        response.text().await.map_err(|e| MapError::Read(e.to_string()))
    }
}

/// Parameters of one map generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRequest {
    pub points: i64,
    pub radius: i64,
    pub clusters: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl MapRequest {
    /// Query string pairs, in a fixed order. `api_key` is only sent when one
    /// is configured.
    pub fn query(&self, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("points", self.points.to_string()),
            ("radius", self.radius.to_string()),
            ("clusters", self.clusters.to_string()),
        ];
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            query.push(("api_key", key.to_string()));
        }
        if let Some(lat) = self.lat {
            query.push(("lat", format!("{lat:.6}")));
        }
        if let Some(lon) = self.lon {
            query.push(("lon", format!("{lon:.6}")));
        }
        query
    }
}

/// Successful map generation as reported by the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSummary {
    pub url: String,
    pub points: i64,
    pub radius_miles: i64,
    pub clusters_generated: i64,
    pub center_lat: String,
    pub center_lon: String,
}

impl MapSummary {
    /// Interpret a decoded response envelope.
    ///
    /// Parameters missing from the response fall back to what was requested;
    /// `clusters_generated` has no request-side counterpart and reads as 0.
    pub fn from_envelope(envelope: &Map<String, Value>, request: &MapRequest) -> Result<Self, MapError> {
        let body = Arguments::from(envelope.clone());
        if envelope.get("success") != Some(&Value::Bool(true)) {
            let reason = match body.string("error") {
                "" => "Unknown error",
                reason => reason,
            };
            return Err(MapError::Rejected(reason.to_string()));
        }

        let parameters = envelope.get("parameters").map(Arguments::from).unwrap_or_default();
        Ok(Self {
            url: body.string("url").to_string(),
            points: parameters.integer_or("points", request.points),
            radius_miles: parameters.integer_or("radius_miles", request.radius),
            clusters_generated: parameters.integer("clusters_generated"),
            center_lat: coordinate(&parameters, "center_lat", request.lat),
            center_lon: coordinate(&parameters, "center_lon", request.lon),
        })
    }
}

/// Centre coordinates come back as strings or numbers depending on the
/// endpoint version.
fn coordinate(parameters: &Arguments, key: &str, requested: Option<f64>) -> String {
    match parameters.raw(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => requested
            .map(|v| format!("{v:.6}"))
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

impl fmt::Display for MapSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "📍 **Physician Distribution Map Created!**\n\n\
             🔗 **MAP LINK: {url}**\n\n\
             **{points} Physicians** in a **{radius} mile radius**\n\n\
             📊 **Map Details:**\n\
             • Generated {clusters} clusters\n\
             • Center: {lat}, {lon}\n\
             • Interactive map with physician concentration visualization\n\n\
             🚨 **IMPORTANT: Click this link to view your map:** {url}\n\n\
             The map shows physician distribution with clustering and is ready for analysis.",
            url = self.url,
            points = format_thousands(self.points),
            radius = self.radius_miles,
            clusters = self.clusters_generated,
            lat = self.center_lat,
            lon = self.center_lon,
        )
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Client for the map generation endpoint.
#[derive(Clone)]
pub struct MapClient {
    endpoint: String,
    transport: Arc<dyn MapTransport>,
}

impl MapClient {
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn MapTransport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }

    pub async fn generate(&self, request: &MapRequest, api_key: Option<&str>) -> Result<MapSummary, MapError> {
        let query = request.query(api_key);
        info!(
            endpoint = %self.endpoint,
            points = request.points,
            radius = request.radius,
            clusters = request.clusters,
            "requesting physician map"
        );

        let outcome = self.fetch_summary(request, &query).await;
        if let Err(e) = &outcome {
            warn!(error = %e, "map generation failed");
        }
        outcome
    }

    async fn fetch_summary(
        &self,
        request: &MapRequest,
        query: &[(&'static str, String)],
    ) -> Result<MapSummary, MapError> {
        let body = self.transport.fetch(&self.endpoint, query).await?;
        let envelope: Map<String, Value> = serde_json::from_str(&body)?;
        MapSummary::from_envelope(&envelope, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    enum Reply {
        Body(&'static str),
        Network(&'static str),
        Unreadable,
    }

    struct FakeTransport {
        reply: Reply,
        calls: Mutex<Vec<(String, Vec<(&'static str, String)>)>>,
    }

    impl FakeTransport {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl MapTransport for FakeTransport {
        async fn fetch(&self, url: &str, query: &[(&'static str, String)]) -> Result<String, MapError> {
            self.calls.lock().unwrap().push((url.to_string(), query.to_vec()));
            match self.reply {
                Reply::Body(body) => Ok(body.to_string()),
                Reply::Network(msg) => Err(MapError::Network(msg.to_string())),
                Reply::Unreadable => Err(MapError::Read("invalid utf-8".to_string())),
            }
        }
    }

    fn request() -> MapRequest {
        MapRequest {
            points: 1000,
            radius: 50,
            clusters: 50,
            lat: None,
            lon: None,
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(10005), "10,005");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(-4500), "-4,500");
    }

    #[test]
    fn test_query_order_and_optional_fields() {
        let mut req = request();
        assert_eq!(
            req.query(None),
            vec![
                ("points", "1000".to_string()),
                ("radius", "50".to_string()),
                ("clusters", "50".to_string()),
            ]
        );

        req.lat = Some(29.4241);
        req.lon = Some(-98.4936);
        let query = req.query(Some("1234"));
        assert!(query.contains(&("api_key", "1234".to_string())));
        assert!(query.contains(&("lat", "29.424100".to_string())));
        assert!(query.contains(&("lon", "-98.493600".to_string())));
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let transport = FakeTransport::new(Reply::Body(
            r#"{"success": true, "url": "http://x", "parameters": {"points": 1000, "radius_miles": 50, "clusters_generated": 12, "center_lat": "29.4", "center_lon": "-98.5"}}"#,
        ));
        let client = MapClient::new("http://maps.test/generate", transport.clone());

        let summary = client.generate(&request(), Some("1234")).await.unwrap();
        assert_eq!(
            summary,
            MapSummary {
                url: "http://x".into(),
                points: 1000,
                radius_miles: 50,
                clusters_generated: 12,
                center_lat: "29.4".into(),
                center_lon: "-98.5".into(),
            }
        );

        let text = summary.to_string();
        assert_eq!(text.matches("http://x").count(), 2);
        assert!(text.contains("1,000 Physicians"));
        assert!(text.contains("50 mile radius"));
        assert!(text.contains("12 clusters"));
        assert!(text.contains("Center: 29.4, -98.5"));

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://maps.test/generate");
    }

    #[tokio::test]
    async fn test_missing_parameters_fall_back_to_request() {
        let transport = FakeTransport::new(Reply::Body(r#"{"success": true, "url": "http://x"}"#));
        let client = MapClient::new("http://maps.test", transport);
        let mut req = request();
        req.points = 250;
        req.radius = 20;
        req.lat = Some(30.0);

        let summary = client.generate(&req, None).await.unwrap();
        assert_eq!(summary.points, 250);
        assert_eq!(summary.radius_miles, 20);
        assert_eq!(summary.clusters_generated, 0);
        assert_eq!(summary.center_lat, "30.000000");
        assert_eq!(summary.center_lon, "unknown");
    }

    #[tokio::test]
    async fn test_numeric_center_coordinates() {
        let transport = FakeTransport::new(Reply::Body(
            r#"{"success": true, "url": "u", "parameters": {"center_lat": 29.4, "center_lon": -98.5}}"#,
        ));
        let summary = MapClient::new("e", transport).generate(&request(), None).await.unwrap();
        assert_eq!(summary.center_lat, "29.4");
        assert_eq!(summary.center_lon, "-98.5");
    }

    #[tokio::test]
    async fn test_rejected_envelope() {
        let transport = FakeTransport::new(Reply::Body(r#"{"success": false, "error": "bad region"}"#));
        let err = MapClient::new("e", transport).generate(&request(), None).await.unwrap_err();
        assert!(matches!(err, MapError::Rejected(ref r) if r == "bad region"));
    }

    #[tokio::test]
    async fn test_rejected_without_reason() {
        for body in [r#"{"success": false}"#, r#"{"url": "u"}"#, r#"{"success": "true"}"#] {
            let transport = FakeTransport::new(Reply::Body(body));
            let err = MapClient::new("e", transport).generate(&request(), None).await.unwrap_err();
            assert_eq!(err.to_string(), "Error creating map: Unknown error", "body {body}");
        }
    }

    #[tokio::test]
    async fn test_non_json_body() {
        for body in ["<html>502 Bad Gateway</html>", "[1, 2]", ""] {
            let transport = FakeTransport::new(Reply::Body(body));
            let err = MapClient::new("e", transport).generate(&request(), None).await.unwrap_err();
            assert!(matches!(err, MapError::Parse(_)), "body {body:?}");
        }
    }

    #[tokio::test]
    async fn test_transport_failures_pass_through() {
        let transport = FakeTransport::new(Reply::Network("operation timed out"));
        let err = MapClient::new("e", transport).generate(&request(), None).await.unwrap_err();
        assert_eq!(err.to_string(), "Network error calling map API: operation timed out");

        let transport = FakeTransport::new(Reply::Unreadable);
        let err = MapClient::new("e", transport).generate(&request(), None).await.unwrap_err();
        assert!(err.to_string().starts_with("Error reading API response"));
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).is_ok());
    }

    #[test]
    fn test_success_check_ignores_other_fields() {
        let envelope = json!({"success": true, "error": "ignored", "url": "u"});
        let summary = MapSummary::from_envelope(envelope.as_object().unwrap(), &request()).unwrap();
        assert_eq!(summary.url, "u");
    }
}
