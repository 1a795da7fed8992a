use crate::{SegmentColor, Zone};
use serde::Serialize;

/// One arc of the segmented ring.
///
/// Angles are degrees in [0, 360), measured clockwise from 12 o'clock. A
/// generated sequence partitions the full circle into `total_segments`
/// equal-width contiguous arcs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub id: u32,
    pub color: SegmentColor,
    pub start_angle: f64,
    pub end_angle: f64,
    pub multiplier: f64,
}

impl Segment {
    /// Midpoint angle of the arc.
    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

/// Outcome of a single thrown dart. Immutable once produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DartResult {
    pub zone: Zone,
    /// Landing angle in degrees; 0 for bullseye (angle is meaningless there).
    pub angle: f64,
    /// Landing distance from center.
    pub radius: f64,
    /// The segment hit, for the three win colors only.
    pub segment: Option<Segment>,
    pub multiplier: f64,
    /// Bet allocated to this dart times the multiplier.
    pub payout: f64,
    /// A dart wins when its multiplier is at least 1.0.
    pub is_win: bool,
    pub is_bullseye: bool,
    /// Bet allocated to this dart.
    pub bet: f64,
    pub color: &'static str,
}

/// Rendering identity for one placed dart.
///
/// Separate from [`DartResult`]: bullseye markers carry a random angle for
/// visual jitter while the result's angle stays 0.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DartMarker {
    pub id: u64,
    pub angle: f64,
    pub radius: f64,
    pub color: &'static str,
    pub multiplier: f64,
    pub payout: f64,
    pub is_bullseye: bool,
    /// Set on the most recently placed marker only.
    pub latest: bool,
}

/// Target position for the shell's throw animation, as percentages of the
/// board container (0-100 on each axis).
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BoardPosition {
    pub x: f64,
    pub y: f64,
}

/// One entry of the rolling result history strip.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub multiplier: f64,
    pub color: &'static str,
}

/// Round lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundPhase {
    Idle,
    Throwing,
    Result,
}
