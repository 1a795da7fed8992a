//! Segmented-ring generation and lookup.
//!
//! Segments are a pure function of the difficulty's layout table: the full
//! circle is partitioned into `total_segments` equal arcs in layout order.
//! Generated sequences are cached for the process lifetime; identical inputs
//! always produce identical sequences, so the cache is never invalidated.

use ringshot_types::{board, Difficulty, Segment};
use std::sync::OnceLock;

static CACHE: [OnceLock<Vec<Segment>>; 4] = [
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
];

/// Build the ordered segment sequence for a difficulty.
pub fn generate(difficulty: Difficulty) -> Vec<Segment> {
    let board = board(difficulty);
    let arc = 360.0 / board.total_segments as f64;
    board
        .layout
        .iter()
        .enumerate()
        .map(|(i, &color)| Segment {
            id: i as u32,
            color,
            start_angle: i as f64 * arc,
            end_angle: (i + 1) as f64 * arc,
            multiplier: board.segment_multiplier(color),
        })
        .collect()
}

/// Cached segment sequence for a difficulty, generated on first use.
pub fn cached(difficulty: Difficulty) -> &'static [Segment] {
    CACHE[difficulty as usize].get_or_init(|| generate(difficulty))
}

/// Find the segment containing `angle`.
///
/// The angle is normalized into [0, 360) and mapped to its equal-width arc
/// by integer division; the index is clamped to the last segment to absorb
/// floating-point rounding at the 360°/0° seam.
pub fn locate(segments: &[Segment], angle: f64) -> &Segment {
    let normalized = angle.rem_euclid(360.0);
    let arc = 360.0 / segments.len() as f64;
    let index = ((normalized / arc) as usize).min(segments.len() - 1);
    &segments[index]
}
