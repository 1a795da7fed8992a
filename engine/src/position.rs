//! Maps board-polar landings to container-relative screen positions for the
//! shell's throw animation.

use rand::Rng;
use ringshot_types::{BoardPosition, DartMarker, BOARD_VIEW};

/// Rotation so that angle 0 points at 12 o'clock.
const ANGLE_OFFSET: f64 = -90.0;

/// Fraction of the container taken by padding on each side; the board SVG
/// fills the padded region.
const PAD_FRAC: f64 = 0.12;

/// Maximum center offset for bullseye marker jitter, in viewbox units.
const BULLSEYE_JITTER: f64 = 4.0;

fn polar(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> (f64, f64) {
    let rad = (angle_deg + ANGLE_OFFSET).to_radians();
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

/// Target position of a marker as percentages (0-100) of the board container.
///
/// Bullseye markers land at a small random offset from the exact center so
/// stacked jackpot darts stay individually visible.
pub fn marker_position<R: Rng>(rng: &mut R, marker: &DartMarker) -> BoardPosition {
    let center = BOARD_VIEW / 2.0;
    let (x, y) = if marker.is_bullseye {
        let offset = rng.gen::<f64>() * BULLSEYE_JITTER;
        let angle = rng.gen_range(0.0..360.0);
        polar(center, center, offset, angle)
    } else {
        polar(center, center, marker.radius, marker.angle)
    };

    let scale = (1.0 - 2.0 * PAD_FRAC) * 100.0;
    BoardPosition {
        x: PAD_FRAC * 100.0 + (x / BOARD_VIEW) * scale,
        y: PAD_FRAC * 100.0 + (y / BOARD_VIEW) * scale,
    }
}
