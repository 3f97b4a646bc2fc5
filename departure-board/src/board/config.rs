//! Board controller configuration.

use std::time::Duration;

use tracing::warn;

/// Station shown when no other station has been chosen.
pub const DEFAULT_STATION: &str = "HAKODATEBUS_050004";

/// How overlapping fetches decide which result is published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultOrdering {
    /// A result publishes only if no later-started fetch has published
    /// yet. An older fetch that resolves first still shows, and is then
    /// replaced; one that arrives after a newer result is dropped.
    #[default]
    LatestRequest,

    /// Whichever fetch resolves last publishes, regardless of when it
    /// started. An old station's board can overwrite the new one.
    LatestResponse,
}

/// Configuration for the board controller.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Station id the controller starts on.
    pub default_station: String,

    /// Policy for overlapping fetches.
    pub ordering: ResultOrdering,

    /// How often a driving loop should call `refresh`.
    /// The controller itself never refreshes on its own.
    pub refresh_interval: Duration,
}

impl BoardConfig {
    /// Create a configuration starting on the given station.
    pub fn new(default_station: impl Into<String>) -> Self {
        Self {
            default_station: default_station.into(),
            ordering: ResultOrdering::default(),
            refresh_interval: Duration::from_secs(60),
        }
    }

    pub fn with_ordering(mut self, ordering: ResultOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Set the refresh interval. A zero interval is ignored with a warning.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        if interval.is_zero() {
            warn!(
                kept = ?self.refresh_interval,
                "Ignoring zero refresh interval"
            );
            return self;
        }
        self.refresh_interval = interval;
        self
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.default_station, DEFAULT_STATION);
        assert_eq!(config.ordering, ResultOrdering::LatestRequest);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }

    #[test]
    fn builder() {
        let config = BoardConfig::new("X")
            .with_ordering(ResultOrdering::LatestResponse)
            .with_refresh_interval(Duration::from_secs(15));
        assert_eq!(config.default_station, "X");
        assert_eq!(config.ordering, ResultOrdering::LatestResponse);
        assert_eq!(config.refresh_interval, Duration::from_secs(15));
    }

    #[test]
    fn zero_refresh_interval_keeps_previous() {
        let config = BoardConfig::default().with_refresh_interval(Duration::ZERO);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));

        let config = BoardConfig::default()
            .with_refresh_interval(Duration::from_secs(5))
            .with_refresh_interval(Duration::from_secs(0));
        assert_eq!(config.refresh_interval, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn refresh_interval_is_usable_by_tokio_interval() {
        let config = BoardConfig::default().with_refresh_interval(Duration::from_secs(0));
        let mut ticker = tokio::time::interval(config.refresh_interval);
        ticker.tick().await;
    }
}
