//! Departure service client.
//!
//! This module is the only I/O boundary of the engine. It provides:
//! - the [`DepartureRepository`] trait the board controller fetches through
//! - an HTTP implementation for the service's v1 API
//! - a fixture-backed implementation for running without the service
//!
//! Key characteristics of the service:
//! - `GET /v1/departures/{station_id}` returns one complete snapshot
//! - Times are "HH:MM" strings with no date or timezone
//! - Transfer fields are spelled "transfar" on the wire

mod client;
mod convert;
mod error;
mod fixture;
mod repository;
mod types;

pub use client::{DEFAULT_BASE_URL, HttpDepartureRepository, RepositoryConfig};
pub use convert::{ConversionError, convert_departures, convert_stations};
pub use error::{ErrorKind, RepositoryError};
pub use fixture::FixtureRepository;
pub use repository::{DepartureRepository, decode_snapshot};
pub use types::{DepartureDto, DeparturesResponse, StationDto, StationsResponse, TransferDto};
