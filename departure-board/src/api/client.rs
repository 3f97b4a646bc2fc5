//! HTTP departure repository.
//!
//! Talks to the departure service's v1 API. One GET per operation; the
//! transport timeout is the only timeout in the system.

use std::time::Duration;

use reqwest::Url;
use tracing::debug;

use crate::domain::{BoardSnapshot, Station};

use super::convert::convert_stations;
use super::error::RepositoryError;
use super::repository::{DepartureRepository, decode_snapshot};
use super::types::StationsResponse;

/// Default base URL for the departure service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the HTTP repository.
#[derive(Debug, Clone)]
pub struct RepositoryConfig {
    /// Base URL of the service, without the `/v1` prefix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RepositoryConfig {
    /// Create a config pointing at the given service.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Departure repository backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDepartureRepository {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpDepartureRepository {
    /// Create a new repository with the given configuration.
    pub fn new(config: RepositoryConfig) -> Result<Self, RepositoryError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RepositoryError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(RepositoryError::InvalidBaseUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// List the stations the service has timetables for.
    pub async fn available_stations(&self) -> Result<Vec<Station>, RepositoryError> {
        let body = self.get(&["v1", "available_stations"]).await?;

        let response: StationsResponse =
            serde_json::from_str(&body).map_err(|e| RepositoryError::json(e, &body))?;

        Ok(convert_stations(&response))
    }

    /// Check that the service is up.
    pub async fn health(&self) -> Result<(), RepositoryError> {
        self.get(&["v1", "health"]).await.map(|_| ())
    }

    /// Build an endpoint URL, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, RepositoryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepositoryError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET an endpoint and return the body of a successful response.
    async fn get(&self, segments: &[&str]) -> Result<String, RepositoryError> {
        let url = self.endpoint(segments)?;

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

impl DepartureRepository for HttpDepartureRepository {
    async fn fetch(&self, station_id: &str) -> Result<BoardSnapshot, RepositoryError> {
        debug!(station = %station_id, "GET departures");

        let body = self.get(&["v1", "departures", station_id]).await?;
        let snapshot = decode_snapshot(&body)?;

        debug!(
            station = %station_id,
            departures = snapshot.len(),
            "Fetched departures"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = RepositoryConfig::new("http://board.example")
            .with_base_url("http://localhost:9000")
            .with_timeout(5);

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = RepositoryConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn reject_invalid_base_url() {
        let err = HttpDepartureRepository::new(RepositoryConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidBaseUrl(_)));

        let err = HttpDepartureRepository::new(RepositoryConfig::new("mailto:a@b.c")).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidBaseUrl(_)));
    }

    #[test]
    fn endpoint_encodes_station_id() {
        let repo = HttpDepartureRepository::new(RepositoryConfig::default()).unwrap();
        let url = repo.endpoint(&["v1", "departures", "HAKODATEBUS_050004"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1/departures/HAKODATEBUS_050004"
        );

        let url = repo.endpoint(&["v1", "departures", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v1/departures/a%2Fb%20c");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let repo =
            HttpDepartureRepository::new(RepositoryConfig::new("http://example.com/board/")).unwrap();
        let url = repo.endpoint(&["v1", "health"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/board/v1/health");
    }
}
