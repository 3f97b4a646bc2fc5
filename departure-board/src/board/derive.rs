//! Display values derived from a snapshot.
//!
//! Everything here is pure: no I/O, no clock reads. Callers pass `now`
//! explicitly, so the functions can run on any thread, including a
//! rendering thread.

use tracing::warn;

use crate::domain::{
    BoardSnapshot, Color, Departure, Leg, Station, TimeOfDay, TransferChain, decode_color,
};

/// Position-based rank of a departure on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Next,
    NextNext,
    Later,
}

impl Rank {
    /// Rank of the departure at `index` in backend order.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Rank::Next,
            1 => Rank::NextNext,
            _ => Rank::Later,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Next => "next",
            Rank::NextNext => "next-next",
            Rank::Later => "later",
        }
    }
}

/// Signed minutes from `now` until `depart_at`.
///
/// No day rollover: a departure earlier than `now` gives a negative value,
/// meaning it has already left.
///
/// ```
/// use departure_board::board::minutes_until;
/// use departure_board::domain::TimeOfDay;
///
/// let t = |s| TimeOfDay::parse_hhmm(s).unwrap();
/// assert_eq!(minutes_until(t("11:02"), t("10:00")), 62);
/// assert_eq!(minutes_until(t("10:00"), t("11:02")), -62);
/// ```
pub fn minutes_until(depart_at: TimeOfDay, now: TimeOfDay) -> i32 {
    depart_at.minutes_until(now)
}

/// Label for the departure at `index`: "next", "next-next", then "later".
pub fn rank_label(index: usize) -> &'static str {
    Rank::from_index(index).as_str()
}

/// Number of legs in a chain.
pub fn chain_leg_count(chain: &TransferChain) -> usize {
    chain.len()
}

/// Minutes from the first leg's departure to the last leg's departure.
pub fn chain_duration(chain: &TransferChain) -> u32 {
    chain.total_minutes()
}

/// Ride label with the alias appended in parentheses, if there is one.
pub fn display_label(ride_label: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) if !alias.is_empty() => format!("{ride_label} ({alias})"),
        _ => ride_label.to_string(),
    }
}

/// Decoded label colors. A field is `None` when the backend sent a
/// malformed value; the other field is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelColors {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

/// Decode a label's color pair, degrading each field on its own.
pub fn label_colors(foreground: &str, background: &str) -> LabelColors {
    LabelColors {
        foreground: decode_or_warn(foreground, "foreground"),
        background: decode_or_warn(background, "background"),
    }
}

fn decode_or_warn(hex: &str, field: &'static str) -> Option<Color> {
    match decode_color(hex) {
        Ok(color) => Some(color),
        Err(e) => {
            warn!(field, error = %e, "Ignoring malformed label color");
            None
        }
    }
}

/// Where a rider changes onto a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPoint<'a> {
    /// Station the rider changes at.
    pub station: &'a Station,
    /// Cumulative minutes from the chain's first departure.
    pub minutes_from_chain_start: u32,
}

/// One leg of a chain, grouped for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep<'a> {
    /// `None` for the first leg, which is boarded at the observed station.
    pub transfer: Option<TransferPoint<'a>>,
    pub leg: &'a Leg,
    pub label: String,
    pub colors: LabelColors,
}

/// Group a chain into display steps.
///
/// Every leg after the first is preceded by a transfer point naming the
/// station where the rider changes and the offset at which that leg departs.
pub fn chain_steps(chain: &TransferChain) -> Vec<ChainStep<'_>> {
    chain
        .iter()
        .enumerate()
        .map(|(idx, leg)| ChainStep {
            transfer: (idx > 0).then(|| TransferPoint {
                station: leg.from_station(),
                minutes_from_chain_start: leg.minutes_from_chain_start(),
            }),
            leg,
            label: leg.ride_label().to_string(),
            colors: label_colors(leg.foreground_color(), leg.background_color()),
        })
        .collect()
}

/// One board line, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow<'a> {
    pub rank: Rank,
    pub departure: &'a Departure,
    pub label: String,
    pub colors: LabelColors,
    pub minutes_until: i32,
    pub chains: Vec<Vec<ChainStep<'a>>>,
}

impl BoardRow<'_> {
    pub fn rank_label(&self) -> &'static str {
        self.rank.as_str()
    }

    /// True when the departure time is earlier than `now`.
    pub fn has_departed(&self) -> bool {
        self.minutes_until < 0
    }
}

/// Project a snapshot into display rows, in backend order.
///
/// Malformed colors blank only the affected field; the rest of the row and
/// the rest of the board are still produced.
pub fn board_rows(snapshot: &BoardSnapshot, now: TimeOfDay) -> Vec<BoardRow<'_>> {
    snapshot
        .iter()
        .enumerate()
        .map(|(idx, departure)| BoardRow {
            rank: Rank::from_index(idx),
            departure,
            label: display_label(departure.ride_label(), departure.alias()),
            colors: label_colors(departure.foreground_color(), departure.background_color()),
            minutes_until: minutes_until(departure.depart_at(), now),
            chains: departure.transfer_chains().iter().map(chain_steps).collect(),
        })
        .collect()
}
