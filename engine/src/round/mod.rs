//! The round state machine.
//!
//! One actor owns every mutable piece of a session: phase, balance, stats,
//! the visible marker/history rings, and the in-flight round. All state
//! transitions happen on its single mailbox loop; timers and the shell's
//! placement acks re-enter through the same mailbox, so there is no locking
//! anywhere. Cancellation is a sequence number: `play`, `play_again`, and
//! `reset` bump it, and every deferred continuation carries the value
//! captured when it was scheduled and is dropped on mismatch.

mod actor;
mod autoplay;
mod ingress;

pub use actor::{Actor, Config, Snapshot};
pub use ingress::{Mailbox, Message};

use std::time::Duration;

/// Delay between outcome arrival and presenting the first dart.
const FIRST_THROW_DELAY: Duration = Duration::from_millis(150);

/// Gap between darts while more than five remain queued, to keep long
/// multi-dart rounds from taking unbounded wall-clock time.
const FAST_GAP: Duration = Duration::from_millis(80);

/// Gap between darts otherwise.
const SLOW_GAP: Duration = Duration::from_millis(120);

/// Delay between the last placement and finalization.
const FINALIZE_DELAY: Duration = Duration::from_millis(200);

/// Pacing between auto-played rounds.
const AUTO_PLAY_DELAY: Duration = Duration::from_millis(500);

#[cfg(test)]
mod tests;
