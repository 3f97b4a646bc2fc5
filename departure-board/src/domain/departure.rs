//! Departure records and board snapshots.

use super::{RideMode, Station, TimeOfDay, TransferChain};

/// One scheduled ride leaving the observed station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    ride_label: String,
    alias: Option<String>,
    foreground_color: String,
    background_color: String,
    alias_pronunciation: String,
    destination: Station,
    mode: RideMode,
    depart_at: TimeOfDay,
    transfer_chains: Vec<TransferChain>,
}

impl Departure {
    /// Create a departure with no transfer information.
    ///
    /// Use [`Departure::with_transfer_chains`] to attach itineraries and
    /// [`Departure::with_alias`] to set the alternative label.
    pub fn new(
        ride_label: impl Into<String>,
        foreground_color: impl Into<String>,
        background_color: impl Into<String>,
        destination: Station,
        mode: RideMode,
        depart_at: TimeOfDay,
    ) -> Self {
        Self {
            ride_label: ride_label.into(),
            alias: None,
            foreground_color: foreground_color.into(),
            background_color: background_color.into(),
            alias_pronunciation: String::new(),
            destination,
            mode,
            depart_at,
            transfer_chains: Vec::new(),
        }
    }

    pub fn with_alias(
        mut self,
        alias: Option<String>,
        alias_pronunciation: impl Into<String>,
    ) -> Self {
        self.alias = alias;
        self.alias_pronunciation = alias_pronunciation.into();
        self
    }

    pub fn with_transfer_chains(mut self, chains: Vec<TransferChain>) -> Self {
        self.transfer_chains = chains;
        self
    }

    pub fn ride_label(&self) -> &str {
        &self.ride_label
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn foreground_color(&self) -> &str {
        &self.foreground_color
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn alias_pronunciation(&self) -> &str {
        &self.alias_pronunciation
    }

    pub fn destination(&self) -> &Station {
        &self.destination
    }

    pub fn mode(&self) -> &RideMode {
        &self.mode
    }

    pub fn depart_at(&self) -> TimeOfDay {
        self.depart_at
    }

    /// Alternative itineraries starting with this ride.
    ///
    /// Empty means the backend had no transfer information.
    pub fn transfer_chains(&self) -> &[TransferChain] {
        &self.transfer_chains
    }

    pub fn has_transfers(&self) -> bool {
        !self.transfer_chains.is_empty()
    }
}

/// The full departure list for one station as of one fetch.
///
/// Order is whatever the backend returned, assumed chronological. Snapshots
/// are never merged: a new fetch replaces the previous snapshot entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    departures: Vec<Departure>,
}

impl BoardSnapshot {
    pub fn new(departures: Vec<Departure>) -> Self {
        Self { departures }
    }

    pub fn departures(&self) -> &[Departure] {
        &self.departures
    }

    pub fn len(&self) -> usize {
        self.departures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Departure> {
        self.departures.iter()
    }

    /// The departure ranked "next", if any.
    pub fn next_departure(&self) -> Option<&Departure> {
        self.departures.first()
    }
}

impl<'a> IntoIterator for &'a BoardSnapshot {
    type Item = &'a Departure;
    type IntoIter = std::slice::Iter<'a, Departure>;

    fn into_iter(self) -> Self::IntoIter {
        self.departures.iter()
    }
}

impl FromIterator<Departure> for BoardSnapshot {
    fn from_iter<I: IntoIterator<Item = Departure>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
