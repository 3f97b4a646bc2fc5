//! Fixture-backed repository for running without a departure service.
//!
//! Loads departure documents from JSON files and serves them as if they
//! were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{BoardSnapshot, Station};

use super::error::RepositoryError;
use super::repository::{DepartureRepository, decode_snapshot};

/// Repository that serves departure documents from a directory.
///
/// Documents are decoded on every fetch, so a malformed file surfaces as a
/// decode error for that station only, the same way a bad server response
/// would.
#[derive(Clone)]
pub struct FixtureRepository {
    /// Raw documents, keyed by station id.
    boards: Arc<RwLock<HashMap<String, String>>>,
}

impl FixtureRepository {
    /// Create a new fixture repository by loading JSON files from a directory.
    ///
    /// Expects files named `{station_id}.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let boards = load_dir(data_dir.as_ref())?;
        Ok(Self {
            boards: Arc::new(RwLock::new(boards)),
        })
    }

    /// Station ids that have a fixture, sorted.
    pub async fn available_stations(&self) -> Vec<Station> {
        let boards = self.boards.read().await;
        let mut ids: Vec<&String> = boards.keys().collect();
        ids.sort();
        ids.into_iter()
            .map(|id| Station::new(id.as_str(), id.as_str(), ""))
            .collect()
    }

    /// Reload fixtures from disk.
    ///
    /// On failure the previously loaded fixtures are kept.
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<usize, RepositoryError> {
        let new_boards = load_dir(data_dir.as_ref())?;
        let count = new_boards.len();
        let mut boards = self.boards.write().await;
        *boards = new_boards;
        Ok(count)
    }
}

impl DepartureRepository for FixtureRepository {
    async fn fetch(&self, station_id: &str) -> Result<BoardSnapshot, RepositoryError> {
        let boards = self.boards.read().await;

        let body = boards
            .get(station_id)
            .ok_or_else(|| RepositoryError::Status {
                status: 404,
                message: format!("no fixture for station {station_id}"),
            })?;

        decode_snapshot(body)
    }
}

fn load_dir(data_dir: &Path) -> Result<HashMap<String, String>, RepositoryError> {
    let mut boards = HashMap::new();

    let entries = std::fs::read_dir(data_dir).map_err(|e| {
        RepositoryError::Fixture(format!("failed to read {}: {e}", data_dir.display()))
    })?;

    for entry in entries {
        let entry = entry
            .map_err(|e| RepositoryError::Fixture(format!("failed to read directory entry: {e}")))?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        // "HAKODATEBUS_050004.json" -> "HAKODATEBUS_050004"
        let station_id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| RepositoryError::Fixture(format!("invalid filename: {}", path.display())))?;

        let json = std::fs::read_to_string(&path).map_err(|e| {
            RepositoryError::Fixture(format!("failed to read {}: {e}", path.display()))
        })?;

        boards.insert(station_id.to_string(), json);
    }

    if boards.is_empty() {
        return Err(RepositoryError::Fixture(format!(
            "no fixture files found in {}",
            data_dir.display()
        )));
    }

    Ok(boards)
}
