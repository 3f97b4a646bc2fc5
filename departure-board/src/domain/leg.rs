//! Transfer legs and chains.
//!
//! A `Leg` is one ride between two stations inside a transfer itinerary.
//! A `TransferChain` is an ordered, validated list of legs forming one
//! complete itinerary option.

use super::{RideMode, Station, TimeOfDay};

/// Error returned when legs do not form a valid chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    /// A chain was present but had no legs
    #[error("transfer chain has no legs")]
    Empty,

    /// The first leg must start the chain at offset zero
    #[error("first leg offset must be 0, got {0}")]
    NonZeroStart(u32),

    /// Cumulative offsets went backwards
    #[error("leg {index} offset {offset} is before previous offset {previous}")]
    DecreasingOffset {
        index: usize,
        offset: u32,
        previous: u32,
    },
}

/// One ride segment of a transfer itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    ride_label: String,
    foreground_color: String,
    background_color: String,
    from_station: Station,
    to_station: Station,
    mode: RideMode,
    depart_at: TimeOfDay,
    minutes_from_chain_start: u32,
}

impl Leg {
    /// Create a leg.
    ///
    /// Colors are kept as the raw strings the backend sent; decode them
    /// with [`decode_color`](super::decode_color) at the rendering boundary.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ride_label: impl Into<String>,
        foreground_color: impl Into<String>,
        background_color: impl Into<String>,
        from_station: Station,
        to_station: Station,
        mode: RideMode,
        depart_at: TimeOfDay,
        minutes_from_chain_start: u32,
    ) -> Self {
        Self {
            ride_label: ride_label.into(),
            foreground_color: foreground_color.into(),
            background_color: background_color.into(),
            from_station,
            to_station,
            mode,
            depart_at,
            minutes_from_chain_start,
        }
    }

    pub fn ride_label(&self) -> &str {
        &self.ride_label
    }

    pub fn foreground_color(&self) -> &str {
        &self.foreground_color
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    /// Where the rider boards this leg.
    pub fn from_station(&self) -> &Station {
        &self.from_station
    }

    /// Where this ride is headed.
    pub fn to_station(&self) -> &Station {
        &self.to_station
    }

    pub fn mode(&self) -> &RideMode {
        &self.mode
    }

    pub fn depart_at(&self) -> TimeOfDay {
        self.depart_at
    }

    /// Cumulative minutes from the first leg's departure, not a delta from
    /// the previous leg.
    pub fn minutes_from_chain_start(&self) -> u32 {
        self.minutes_from_chain_start
    }
}

/// A non-empty sequence of legs with non-decreasing offsets, starting at 0.
///
/// # Examples
///
/// ```
/// use departure_board::domain::{Leg, RideMode, Station, TimeOfDay, TransferChain};
///
/// let leg = |offset, at: &str| Leg::new(
///     "55G", "#FFD700", "#000000",
///     Station::new("A", "A", ""), Station::new("B", "B", ""),
///     RideMode::Bus, TimeOfDay::parse_hhmm(at).unwrap(), offset,
/// );
///
/// let chain = TransferChain::new(vec![leg(0, "11:02"), leg(46, "11:48")]).unwrap();
/// assert_eq!(chain.len(), 2);
/// assert_eq!(chain.total_minutes(), 46);
///
/// assert!(TransferChain::new(vec![]).is_err());
/// assert!(TransferChain::new(vec![leg(0, "11:02"), leg(50, "11:52"), leg(46, "11:48")]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferChain {
    legs: Vec<Leg>,
}

impl TransferChain {
    /// Validate and wrap a list of legs.
    pub fn new(legs: Vec<Leg>) -> Result<Self, ChainError> {
        let first = legs.first().ok_or(ChainError::Empty)?;

        if first.minutes_from_chain_start != 0 {
            return Err(ChainError::NonZeroStart(first.minutes_from_chain_start));
        }

        for (index, pair) in legs.windows(2).enumerate() {
            let previous = pair[0].minutes_from_chain_start;
            let offset = pair[1].minutes_from_chain_start;
            if offset < previous {
                return Err(ChainError::DecreasingOffset {
                    index: index + 1,
                    offset,
                    previous,
                });
            }
        }

        Ok(Self { legs })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Number of legs. Always at least one.
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// Always false; present for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn first(&self) -> &Leg {
        &self.legs[0]
    }

    pub fn last(&self) -> &Leg {
        &self.legs[self.legs.len() - 1]
    }

    /// Minutes from the first leg's departure to the last leg's departure.
    pub fn total_minutes(&self) -> u32 {
        self.last().minutes_from_chain_start
    }

    /// Where the itinerary ends up.
    pub fn final_destination(&self) -> &Station {
        self.last().to_station()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Leg> {
        self.legs.iter()
    }
}

impl<'a> IntoIterator for &'a TransferChain {
    type Item = &'a Leg;
    type IntoIter = std::slice::Iter<'a, Leg>;

    fn into_iter(self) -> Self::IntoIter {
        self.legs.iter()
    }
}
