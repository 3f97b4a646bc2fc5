//! The repository seam between the board controller and the network.

use std::future::Future;
use std::sync::Arc;

use crate::domain::BoardSnapshot;

use super::convert::convert_departures;
use super::error::RepositoryError;
use super::types::DeparturesResponse;

/// Source of departure snapshots.
///
/// Implementations make one external call per `fetch`, with no retry and no
/// batching, and keep no state between calls. This abstraction allows the
/// controller to be tested with scripted data.
pub trait DepartureRepository {
    /// Fetch the current departures for a station.
    ///
    /// `station_id` is passed through unvalidated; the service decides
    /// whether it exists.
    fn fetch(
        &self,
        station_id: &str,
    ) -> impl Future<Output = Result<BoardSnapshot, RepositoryError>> + Send;
}

impl<R: DepartureRepository> DepartureRepository for Arc<R> {
    fn fetch(
        &self,
        station_id: &str,
    ) -> impl Future<Output = Result<BoardSnapshot, RepositoryError>> + Send {
        self.as_ref().fetch(station_id)
    }
}

/// Decode a departures document body into a snapshot.
pub fn decode_snapshot(body: &str) -> Result<BoardSnapshot, RepositoryError> {
    let response: DeparturesResponse =
        serde_json::from_str(body).map_err(|e| RepositoryError::json(e, body))?;
    Ok(convert_departures(&response)?)
}
