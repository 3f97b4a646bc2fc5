//! The departure board engine.
//!
//! [`BoardController`] drives fetches and publishes a [`BoardState`];
//! the functions in `derive` turn a snapshot into display rows.

mod config;
mod controller;
mod derive;

pub use config::{BoardConfig, DEFAULT_STATION, ResultOrdering};
pub use controller::{BoardController, BoardState, RefreshOutcome};
pub use derive::{
    BoardRow, ChainStep, LabelColors, Rank, TransferPoint, board_rows, chain_duration,
    chain_leg_count, chain_steps, display_label, label_colors, minutes_until, rank_label,
};
