//! Live departure board engine.
//!
//! Fetches a station's departure snapshot, models multi-leg transfer
//! itineraries, and tracks load/error/stale state across refreshes and
//! station switches. Rendering is left to the caller.

pub mod api;
pub mod board;
pub mod domain;
pub mod state;
