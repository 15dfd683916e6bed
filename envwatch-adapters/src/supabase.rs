//! Supabase adapter using the PostgREST HTTP API.
//!
//! Supabase exposes every table under `/rest/v1/<table>`, with filtering,
//! ordering and limits expressed as query parameters. This adapter asks for
//! the newest rows of the measurements table since a given instant.
//!
//! Responses are never cached: each request carries `Cache-Control: no-cache`
//! so a refresh always reflects the latest row written by the sensor node.
//!
//! ## Example
//!
//! ```rust,no_run
//! use envwatch_adapters::supabase::SupabaseAdapter;
//! use chrono::{Duration, Utc};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = SupabaseAdapter::builder()
//!         .endpoint("https://project.supabase.co")
//!         .api_key("anon-key")
//!         .table("measurements")
//!         .build()?;
//!
//!     let rows = adapter.fetch(Utc::now() - Duration::days(7), 5000).await?;
//!
//!     for row in rows.iter().take(5) {
//!         println!("{}: {:?} °C", row.measured_at, row.temperature);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CACHE_CONTROL};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use envwatch_types::RawMeasurement;

use crate::{AdapterError, COLUMNS};

/// Supabase adapter for fetching measurement rows.
#[derive(Debug, Clone)]
pub struct SupabaseAdapter {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    table: String,
}

impl SupabaseAdapter {
    /// Create a new builder for configuring the adapter.
    pub fn builder() -> SupabaseAdapterBuilder {
        SupabaseAdapterBuilder::default()
    }

    /// Fetch at most `limit` rows measured at or after `since`, newest first.
    pub async fn fetch(
        &self,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RawMeasurement>, AdapterError> {
        let url = self.table_url();
        let params = query_params(since, limit);

        debug!(%url, since = %params[1].1, limit, "fetching measurements");

        let response = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AdapterError::Auth(error_message(&body, status)));
        }

        if !status.is_success() {
            return Err(AdapterError::Http(error_message(&body, status)));
        }

        let rows: Vec<RawMeasurement> = serde_json::from_str(&body)?;
        debug!(rows = rows.len(), "fetched measurements");

        Ok(rows)
    }

    /// Returns the REST URL of the measurements table.
    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.endpoint, self.table)
    }

    fn headers(&self) -> Result<HeaderMap, AdapterError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        if let Some(ref key) = self.api_key {
            let invalid = |_| AdapterError::Config("API key is not a valid header value".to_string());
            headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid)?,
            );
        }

        Ok(headers)
    }
}

/// Builder for SupabaseAdapter.
#[derive(Debug, Default)]
pub struct SupabaseAdapterBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    table: Option<String>,
    timeout: Option<Duration>,
}

impl SupabaseAdapterBuilder {
    /// Set the project URL (e.g., "https://project.supabase.co").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the API key sent as `apikey` and bearer token.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the table to query (default: "measurements").
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the adapter.
    pub fn build(self) -> Result<SupabaseAdapter, AdapterError> {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:54321".to_string());

        Ok(SupabaseAdapter {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: self.api_key.filter(|k| !k.is_empty()),
            table: self.table.unwrap_or_else(|| "measurements".to_string()),
        })
    }
}

/// PostgREST query parameters for "rows since `since`, newest first".
fn query_params(since: DateTime<Utc>, limit: usize) -> Vec<(&'static str, String)> {
    vec![
        ("select", COLUMNS.join(",")),
        (
            "measured_at",
            format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Micros, true)),
        ),
        ("order", "measured_at.desc".to_string()),
        ("limit", limit.to_string()),
    ]
}

/// Extract a readable message from a PostgREST error body.
fn error_message(body: &str, status: StatusCode) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => match err.hint {
            Some(hint) => format!("{} ({}; hint: {})", err.message, status, hint),
            None => format!("{} ({})", err.message, status),
        },
        Err(_) => format!("API returned status {}", status),
    }
}

/// Error body returned by PostgREST.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: String,
    #[serde(default)]
    hint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_defaults() {
        let adapter = SupabaseAdapter::builder().build().unwrap();
        assert_eq!(adapter.endpoint, "http://localhost:54321");
        assert_eq!(adapter.table, "measurements");
        assert!(adapter.api_key.is_none());
    }

    #[test]
    fn test_builder_custom() {
        let adapter = SupabaseAdapter::builder()
            .endpoint("https://office.supabase.co/")
            .api_key("secret")
            .table("office_measurements")
            .build()
            .unwrap();

        assert_eq!(adapter.endpoint, "https://office.supabase.co");
        assert_eq!(adapter.api_key.as_deref(), Some("secret"));
        assert_eq!(
            adapter.table_url(),
            "https://office.supabase.co/rest/v1/office_measurements"
        );
    }

    #[test]
    fn test_empty_api_key_is_ignored() {
        let adapter = SupabaseAdapter::builder().api_key("").build().unwrap();
        assert!(adapter.api_key.is_none());
        assert!(adapter.headers().unwrap().get("apikey").is_none());
    }

    #[test]
    fn test_headers_disable_caching() {
        let adapter = SupabaseAdapter::builder().api_key("k").build().unwrap();
        let headers = adapter.headers().unwrap();
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-cache");
        assert_eq!(headers.get("apikey").unwrap(), "k");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer k");
    }

    #[test]
    fn test_query_params() {
        let since = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let params = query_params(since, 5000);

        assert_eq!(params[0], ("select", "measured_at,temperature,humidity,lightness".to_string()));
        assert_eq!(params[1], ("measured_at", "gte.2024-03-01T12:00:00.000000Z".to_string()));
        assert_eq!(params[2], ("order", "measured_at.desc".to_string()));
        assert_eq!(params[3], ("limit", "5000".to_string()));
    }

    #[test]
    fn test_error_message_from_postgrest_body() {
        let body = r#"{"code":"42P01","details":null,"hint":"Check the table name","message":"relation does not exist"}"#;
        let msg = error_message(body, StatusCode::NOT_FOUND);
        assert!(msg.contains("relation does not exist"));
        assert!(msg.contains("Check the table name"));

        let msg = error_message("<html>", StatusCode::BAD_GATEWAY);
        assert_eq!(msg, "API returned status 502 Bad Gateway");
    }

    /// Serve one canned HTTP response on a local port and hand back the
    /// request head the adapter sent.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (endpoint, server)
    }

    fn adapter(endpoint: &str) -> SupabaseAdapter {
        SupabaseAdapter::builder()
            .endpoint(endpoint)
            .api_key("anon-key")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    fn since() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_decodes_rows() {
        let body = r#"[
            {"measured_at":"2024-03-08T11:50:00+00:00","temperature":21.5,"humidity":40.2,"lightness":null},
            {"measured_at":"2024-03-08T11:40:00+00:00","temperature":21.4,"humidity":40.0,"lightness":180.0}
        ]"#;
        let (endpoint, server) = serve_once("200 OK", body).await;

        let rows = adapter(&endpoint).fetch(since(), 25).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].measured_at, "2024-03-08T11:50:00+00:00");
        assert_eq!(rows[0].temperature, Some(21.5));
        assert_eq!(rows[0].lightness, None);
        assert_eq!(rows[1].lightness, Some(180.0));

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /rest/v1/measurements?"));
        assert!(request_line.contains("order=measured_at.desc"));
        assert!(request_line.contains("limit=25"));
        assert!(request_line.contains("measured_at=gte.2024-03-01T12"));

        let head = request.to_ascii_lowercase();
        assert!(head.contains("cache-control: no-cache"));
        assert!(head.contains("apikey: anon-key"));
        assert!(head.contains("authorization: bearer anon-key"));
    }

    #[tokio::test]
    async fn test_fetch_unauthorized_is_auth_error() {
        let body = r#"{"message":"Invalid API key","hint":"Double check your Supabase `anon` or `service_role` API key."}"#;
        let (endpoint, server) = serve_once("401 Unauthorized", body).await;

        let err = adapter(&endpoint).fetch(since(), 25).await.unwrap_err();
        match err {
            AdapterError::Auth(msg) => assert!(msg.contains("Invalid API key")),
            other => panic!("expected Auth, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_forbidden_is_auth_error() {
        let (endpoint, server) = serve_once("403 Forbidden", "").await;

        let err = adapter(&endpoint).fetch(since(), 25).await.unwrap_err();
        assert!(matches!(err, AdapterError::Auth(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_missing_table_is_http_error() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.measurements\" does not exist"}"#;
        let (endpoint, server) = serve_once("404 Not Found", body).await;

        let err = adapter(&endpoint).fetch(since(), 25).await.unwrap_err();
        match err {
            AdapterError::Http(msg) => {
                assert!(msg.contains("does not exist"));
                assert!(msg.contains("404"));
            }
            other => panic!("expected Http, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_error() {
        let (endpoint, server) = serve_once("200 OK", "not json").await;

        let err = adapter(&endpoint).fetch(since(), 25).await.unwrap_err();
        assert!(matches!(err, AdapterError::Parse(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_unreachable_endpoint() {
        let adapter = SupabaseAdapter::builder()
            .endpoint("http://127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let since = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let err = adapter.fetch(since, 10).await.unwrap_err();
        assert!(matches!(
            err,
            AdapterError::Connection(_) | AdapterError::Timeout
        ));
    }
}
