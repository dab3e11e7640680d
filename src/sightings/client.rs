use super::{parse_observation_time, SightingRecord};
use crate::config::ObservationConfig;
use crate::error::UpstreamError;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const SERVICE: &str = "observations";

/// Raw observation as returned by the recent-observations endpoint.
#[derive(Debug, Deserialize)]
struct Observation {
    #[serde(rename = "comName")]
    com_name: String,
    #[serde(rename = "obsDt")]
    obs_dt: String,
}

/// HTTP client for the recent-observations-near-a-point endpoint.
pub struct ObservationClient {
    http_client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ObservationClient {
    pub fn new(config: &ObservationConfig) -> Result<Self> {
        Self::with_base_url(
            config.base_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    /// Create a client against a custom base URL (for testing with a mock server).
    pub fn with_base_url(
        base_url: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent("birdfetcher/0.1")
            .timeout(timeout)
            .build()
            .context("Failed to build observation HTTP client")?;
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    /// Fetch up to `max_results` recent sightings around a point, in the
    /// order the service returns them. Truncation is left to the service.
    pub async fn fetch_recent_sightings(
        &self,
        latitude: f64,
        longitude: f64,
        max_results: u32,
    ) -> Result<Vec<SightingRecord>, UpstreamError> {
        let url = format!(
            "{}/v2/data/obs/geo/recent?lat={:.6}&lng={:.6}&maxResults={}&fmt=json",
            self.base_url, latitude, longitude, max_results
        );

        tracing::debug!(latitude, longitude, max_results, "Fetching recent sightings");

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.header("X-eBirdApiToken", token);
        }

        let response = request
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

        parse_observations(&body)
    }
}

fn parse_observations(body: &str) -> Result<Vec<SightingRecord>, UpstreamError> {
    let observations: Vec<Observation> =
        serde_json::from_str(body).map_err(|e| UpstreamError::Parse {
            service: SERVICE,
            reason: e.to_string(),
        })?;

    observations
        .into_iter()
        .map(|obs| {
            let observed_at = parse_observation_time(&obs.obs_dt).map_err(|e| {
                UpstreamError::Parse {
                    service: SERVICE,
                    reason: format!("bad obsDt '{}': {}", obs.obs_dt, e),
                }
            })?;
            Ok(SightingRecord {
                common_name: obs.com_name,
                observed_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    const PATH: &str = "/v2/data/obs/geo/recent";

    fn client_for(server: &ServerGuard, token: Option<&str>) -> ObservationClient {
        ObservationClient::with_base_url(
            server.url(),
            token.map(str::to_string),
            Duration::from_secs(2),
        )
        .unwrap()
    }

    /// Accepts connections and never answers them.
    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{}", addr)
    }

    fn point_query(lat: &str, lng: &str, max: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("lat".into(), lat.into()),
            Matcher::UrlEncoded("lng".into(), lng.into()),
            Matcher::UrlEncoded("maxResults".into(), max.into()),
            Matcher::UrlEncoded("fmt".into(), "json".into()),
        ])
    }

    #[tokio::test]
    async fn test_fetch_recent_sightings() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(point_query("42.000000", "-75.900000", "10"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"speciesCode": "blujay", "comName": "Blue Jay", "sciName": "Cyanocitta cristata", "obsDt": "2024-05-02 10:00", "howMany": 2},
                    {"speciesCode": "amerob", "comName": "American Robin", "sciName": "Turdus migratorius", "obsDt": "2024-05-01"}
                ]"#,
            )
            .create_async()
            .await;

        let client = client_for(&server, None);
        let records = client.fetch_recent_sightings(42.0, -75.9, 10).await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].common_name, "Blue Jay");
        assert_eq!(records[1].common_name, "American Robin");
        assert_eq!(records[1].observed_at.format("%Y-%m-%d").to_string(), "2024-05-01");
    }

    #[tokio::test]
    async fn test_sends_api_token_and_max_results() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", PATH)
            .match_query(point_query("40.712800", "-74.006000", "3"))
            .match_header("X-eBirdApiToken", "secret-token")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = client_for(&server, Some("secret-token"));
        let records = client.fetch_recent_sightings(40.7128, -74.006, 3).await.unwrap();

        mock.assert_async().await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("Forbidden")
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_recent_sightings(1.0, 2.0, 10).await.unwrap_err();
        match err {
            UpstreamError::Status { service, status } => {
                assert_eq!(service, SERVICE);
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"errors": "not a list"}"#)
            .create_async()
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_recent_sightings(1.0, 2.0, 10).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Parse { .. }));
    }

    #[test]
    fn test_bad_observation_date_is_parse_error() {
        let err = parse_observations(r#"[{"comName": "Blue Jay", "obsDt": "yesterday"}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("bad obsDt 'yesterday'"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_request_error() {
        // Nothing listens on port 9 of localhost in the test environment
        let client = ObservationClient::with_base_url(
            "http://127.0.0.1:9".to_string(),
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        let err = client.fetch_recent_sightings(1.0, 2.0, 10).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Request { .. }));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let client = ObservationClient::with_base_url(
            silent_server().await,
            None,
            Duration::from_millis(200),
        )
        .unwrap();
        let err = client.fetch_recent_sightings(1.0, 2.0, 10).await.unwrap_err();
        match err {
            UpstreamError::Request { source, .. } => assert!(source.is_timeout()),
            other => panic!("expected request timeout, got {:?}", other),
        }
    }
}
