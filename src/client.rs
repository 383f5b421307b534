//! Client for a deployed analyzer service
//!
//! Mirrors what the browser extension does: one GET against `/api/analyze`,
//! with connectivity problems kept apart from errors the service reports.
use crate::api::models::AnalyzeResponse;
use crate::error::{AnalyzerError, Result};
use crate::playlist::Range;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Check connectivity and try again.";
const GENERIC_FAILURE_MESSAGE: &str = "Failed to analyze playlist.";

pub struct AnalyzerClient {
    endpoint: Url,
    client: reqwest::Client,
}

impl AnalyzerClient {
    pub fn new(base: &str, timeout_seconds: u64) -> Result<Self> {
        let base = base.trim_end_matches('/');
        let endpoint = Url::parse(&format!("{}/api/analyze", base))
            .map_err(|e| AnalyzerError::Configuration(format!("Invalid service URL {}: {}", base, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Request an analysis from the service
    pub async fn analyze(&self, playlist_url: &str, range: Range) -> Result<AnalyzeResponse> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("url", playlist_url)
            .append_pair("start", &range.start.to_string())
            .append_pair("end", &range.end.to_string());

        debug!("Calling {}", self.endpoint);

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Analyzer service unreachable: {}", e);
            AnalyzerError::Network(NETWORK_ERROR_MESSAGE.to_string())
        })?;

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                warn!("Unreadable analyzer response: {}", e);
                return Err(AnalyzerError::Network(NETWORK_ERROR_MESSAGE.to_string()));
            }
            Err(_) => Value::Null,
        };

        interpret(status, body)
    }
}

/// Turn a service reply into a response or the error it reports.
///
/// Only client-side rejections are bad input; a server fault stays upstream
/// even when it carries an `error` message.
fn interpret(status: StatusCode, body: Value) -> Result<AnalyzeResponse> {
    let message = body.get("error").and_then(Value::as_str);

    if status.is_server_error() {
        warn!("Analyzer service failed with {}", status);
        let message = message.unwrap_or(GENERIC_FAILURE_MESSAGE);
        return Err(AnalyzerError::Upstream(message.to_string()));
    }
    if let Some(message) = message {
        return Err(AnalyzerError::InvalidInput(message.to_string()));
    }
    if !status.is_success() {
        return Err(AnalyzerError::Upstream(GENERIC_FAILURE_MESSAGE.to_string()));
    }
    Ok(serde_json::from_value(body)?)
}
