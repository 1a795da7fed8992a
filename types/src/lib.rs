//! Common types for the ringshot darts engine.
//!
//! Everything in this crate is plain data: board geometry and payout tables,
//! the zone alphabet shared with the external outcome source, per-dart
//! results, and session accounting. No I/O and no randomness live here.

mod board;
mod constants;
mod dart;
mod stats;

pub use board::*;
pub use constants::*;
pub use dart::*;
pub use stats::*;
