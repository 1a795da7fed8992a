use futures::channel::oneshot;
use ringshot_types::{BoardPosition, DartMarker, DartResult, HistoryEntry, SessionStats};

/// Events emitted by the round actor to the rendering shell.
#[derive(Debug)]
pub enum Event {
    /// Present one dart. The shell must fire `placed` exactly once, exactly
    /// when its animation finishes; the rest of the round waits for it. A
    /// late ack after a reset is discarded by the actor, not an error.
    Throw {
        /// Zero-based position of this dart within the round.
        index: u32,
        total: u32,
        position: BoardPosition,
        color: &'static str,
        marker: DartMarker,
        result: DartResult,
        placed: oneshot::Sender<()>,
    },
    /// A dart was recorded on the board and credited to the round total.
    Placed {
        result: DartResult,
        /// Visible markers after placement, oldest first.
        markers: Vec<DartMarker>,
        /// Rolling multiplier history, newest first.
        history: Vec<HistoryEntry>,
        round_payout: f64,
        dart_index: u32,
    },
    /// The round completed: the payout was credited and stats were updated.
    Finalized {
        bet: f64,
        payout: f64,
        is_win: bool,
        balance: f64,
        stats: SessionStats,
    },
    /// Auto-play deactivated itself (rounds exhausted or balance short).
    AutoStopped,
}
