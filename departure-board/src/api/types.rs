//! Departure service wire DTOs.
//!
//! These types map directly to the backend's JSON documents, field names
//! included. The backend spells transfers "transfar"; we keep its spelling
//! on the wire and accept the correct spelling too.

use serde::{Deserialize, Serialize};

/// Response from `GET /v1/departures/{station_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeparturesResponse {
    pub departures: Vec<DepartureDto>,
}

/// Response from `GET /v1/available_stations`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationsResponse {
    pub stations: Vec<StationDto>,
}

/// A station reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationDto {
    /// Empty for endpoints without a timetable (airports).
    pub id: String,
    pub name: String,
    pub pronounce: String,
}

/// One departure row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartureDto {
    /// Route or train label, e.g. "55G" or "特急".
    pub ride_type: String,

    /// Alternative label (train name), when there is one.
    #[serde(default)]
    pub aka_type: Option<String>,

    /// Label text color, "#RRGGBB".
    pub type_foreground: String,

    /// Label background color, "#RRGGBB".
    pub type_background: String,

    /// Reading of the alternative label.
    pub type_pronounce: String,

    /// Destination of this ride.
    pub to: StationDto,

    /// Transport mode ("BUS", "AIRPLANE", ...). May be empty.
    pub career_type: String,

    /// Scheduled departure, "HH:MM".
    pub depart_at: String,

    /// Alternative transfer itineraries.
    #[serde(default, alias = "transfers")]
    pub transfars: Vec<Vec<TransferDto>>,
}

/// One leg of a transfer itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferDto {
    pub ride_type: String,
    pub type_foreground: String,
    pub type_background: String,

    /// Where the rider boards this leg.
    pub at: StationDto,

    /// Where the ride is headed.
    pub to: StationDto,

    pub career_type: String,

    /// Scheduled departure from `at`, "HH:MM".
    pub depart_at: String,

    /// Minutes from the first leg's departure (cumulative).
    pub transfar_time: i64,
}
