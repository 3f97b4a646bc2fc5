//! Conversion between wire DTOs and domain types.
//!
//! Decoding validates everything the domain types require: times must be
//! "HH:MM", leg offsets must be non-negative, and every transfer chain must
//! be non-empty with non-decreasing offsets. A single violation rejects the
//! whole snapshot, since snapshots are atomic.

use crate::domain::{
    BoardSnapshot, ChainError, Departure, Leg, RideMode, Station, TimeOfDay, TransferChain,
};

use super::types::{DepartureDto, DeparturesResponse, StationDto, StationsResponse, TransferDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse an "HH:MM" time
    #[error("invalid time {value:?} in {field}")]
    InvalidTime { field: &'static str, value: String },

    /// A leg offset was negative or too large
    #[error("invalid transfar_time {0}")]
    InvalidOffset(i64),

    /// A transfer chain broke the chain invariants
    #[error("departure {departure}, chain {chain}: {source}")]
    InvalidChain {
        departure: usize,
        chain: usize,
        #[source]
        source: ChainError,
    },
}

/// Convert a departures document to a snapshot.
pub fn convert_departures(response: &DeparturesResponse) -> Result<BoardSnapshot, ConversionError> {
    response
        .departures
        .iter()
        .enumerate()
        .map(|(idx, dto)| convert_departure(dto, idx))
        .collect::<Result<Vec<_>, _>>()
        .map(BoardSnapshot::new)
}

/// Convert a stations document.
pub fn convert_stations(response: &StationsResponse) -> Vec<Station> {
    response.stations.iter().map(convert_station).collect()
}

/// Convert a single departure. `idx` is only used for error reporting.
fn convert_departure(dto: &DepartureDto, idx: usize) -> Result<Departure, ConversionError> {
    let depart_at = parse_time(&dto.depart_at, "departure depart_at")?;

    let chains = dto
        .transfars
        .iter()
        .enumerate()
        .map(|(chain_idx, legs)| {
            let legs = legs.iter().map(convert_leg).collect::<Result<Vec<_>, _>>()?;
            TransferChain::new(legs).map_err(|source| ConversionError::InvalidChain {
                departure: idx,
                chain: chain_idx,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Departure::new(
        dto.ride_type.clone(),
        dto.type_foreground.clone(),
        dto.type_background.clone(),
        convert_station(&dto.to),
        RideMode::from(dto.career_type.as_str()),
        depart_at,
    )
    .with_alias(dto.aka_type.clone(), dto.type_pronounce.clone())
    .with_transfer_chains(chains))
}

fn convert_leg(dto: &TransferDto) -> Result<Leg, ConversionError> {
    let depart_at = parse_time(&dto.depart_at, "leg depart_at")?;
    let offset =
        u32::try_from(dto.transfar_time).map_err(|_| ConversionError::InvalidOffset(dto.transfar_time))?;

    Ok(Leg::new(
        dto.ride_type.clone(),
        dto.type_foreground.clone(),
        dto.type_background.clone(),
        convert_station(&dto.at),
        convert_station(&dto.to),
        RideMode::from(dto.career_type.as_str()),
        depart_at,
        offset,
    ))
}

fn convert_station(dto: &StationDto) -> Station {
    Station::new(dto.id.clone(), dto.name.clone(), dto.pronounce.clone())
}

fn parse_time(value: &str, field: &'static str) -> Result<TimeOfDay, ConversionError> {
    TimeOfDay::parse_hhmm(value).map_err(|_| ConversionError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

impl From<&Station> for StationDto {
    fn from(station: &Station) -> Self {
        StationDto {
            id: station.id().to_string(),
            name: station.name().to_string(),
            pronounce: station.pronunciation().to_string(),
        }
    }
}

impl From<&Leg> for TransferDto {
    fn from(leg: &Leg) -> Self {
        TransferDto {
            ride_type: leg.ride_label().to_string(),
            type_foreground: leg.foreground_color().to_string(),
            type_background: leg.background_color().to_string(),
            at: leg.from_station().into(),
            to: leg.to_station().into(),
            career_type: leg.mode().as_str().to_string(),
            depart_at: leg.depart_at().to_string(),
            transfar_time: i64::from(leg.minutes_from_chain_start()),
        }
    }
}

impl From<&Departure> for DepartureDto {
    fn from(departure: &Departure) -> Self {
        DepartureDto {
            ride_type: departure.ride_label().to_string(),
            aka_type: departure.alias().map(str::to_string),
            type_foreground: departure.foreground_color().to_string(),
            type_background: departure.background_color().to_string(),
            type_pronounce: departure.alias_pronunciation().to_string(),
            to: departure.destination().into(),
            career_type: departure.mode().as_str().to_string(),
            depart_at: departure.depart_at().to_string(),
            transfars: departure
                .transfer_chains()
                .iter()
                .map(|chain| chain.iter().map(TransferDto::from).collect())
                .collect(),
        }
    }
}

impl From<&BoardSnapshot> for DeparturesResponse {
    fn from(snapshot: &BoardSnapshot) -> Self {
        DeparturesResponse {
            departures: snapshot.iter().map(DepartureDto::from).collect(),
        }
    }
}
