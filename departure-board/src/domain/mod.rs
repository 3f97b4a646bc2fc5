//! Domain types for the departure board.
//!
//! These are immutable value types describing what the backend reported.
//! Types with invariants (`TimeOfDay`, `TransferChain`, `Color`) enforce
//! them at construction, so code holding one can trust it.

mod color;
mod departure;
mod leg;
mod ride_mode;
mod station;
mod time;

pub use color::{Color, ColorFormatError, decode_color};
pub use departure::{BoardSnapshot, Departure};
pub use leg::{ChainError, Leg, TransferChain};
pub use ride_mode::RideMode;
pub use station::Station;
pub use time::{MINUTES_PER_DAY, TimeError, TimeOfDay};
