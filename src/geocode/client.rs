use super::{select_candidate, GeocodeResponse, PlaceQuery, ResolvedLocation};
use crate::config::GeocodingConfig;
use crate::error::UpstreamError;
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

pub const SERVICE: &str = "geocoding";

/// HTTP client for the geocoding service.
pub struct GeocodeClient {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GeocodeClient {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        Self::with_base_url(
            config.base_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Create a client against a custom base URL (for testing with a mock server).
    pub fn with_base_url(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent("birdfetcher/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build geocoding HTTP client")?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Resolve `query` to a single location. One request, no retry.
    pub async fn resolve_place(&self, query: &PlaceQuery) -> Result<ResolvedLocation, UpstreamError> {
        let response = self.geocode(&query.address()).await?;

        match response.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") => {}
            Some(other) => {
                let reason = match response.error_message {
                    Some(message) => format!("{}: {}", other, message),
                    None => other.to_string(),
                };
                return Err(UpstreamError::Rejected { service: SERVICE, reason });
            }
        }

        tracing::debug!(
            address = %query.address(),
            candidates = response.results.len(),
            "Geocoding candidates received"
        );

        select_candidate(query, &response.results)
            .ok_or_else(|| UpstreamError::AmbiguousOrNotFound(query.address()))
    }

    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, UpstreamError> {
        let mut url = format!(
            "{}/maps/api/geocode/json?address={}",
            self.base_url,
            urlencoding::encode(address)
        );
        if let Some(key) = &self.api_key {
            url.push_str("&key=");
            url.push_str(&urlencoding::encode(key));
        }

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Request { service: SERVICE, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status { service: SERVICE, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| UpstreamError::Request { service: SERVICE, source })?;

        serde_json::from_str(&body).map_err(|e| UpstreamError::Parse {
            service: SERVICE,
            reason: e.to_string(),
        })
    }
}
