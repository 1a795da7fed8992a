//! The outcome resolver: maps random draws or externally supplied outcome
//! codes to concrete landings, multipliers, and payouts.
//!
//! All probabilities are area ratios. Because every ratio divides by the
//! total board area, π cancels and squared-radius differences stand in for
//! areas throughout; radius draws inside a band use
//! `sqrt(u·(outer² − inner²) + inner²)` so landing positions are uniform by
//! area, never by radius.

use crate::segments;
use rand::Rng;
use ringshot_types::{
    board, BoardConfig, DartMarker, DartResult, Difficulty, Segment, Zone,
};

/// Cumulative area-weighted thresholds over the zone order
/// [bullseye, purple (ring 2), blue, segmented ring, purple (ring 5)].
/// Ring 5 fills the remainder to 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneThresholds {
    pub bull_end: f64,
    pub ring2_end: f64,
    pub ring3_end: f64,
    pub ring4_end: f64,
}

/// Compute the cumulative zone thresholds for a board.
pub fn zone_thresholds(board: &BoardConfig) -> ZoneThresholds {
    let total = board.r5 * board.r5;
    let bull = board.bullseye_r * board.bullseye_r;
    let ring2 = board.r2 * board.r2 - bull;
    let ring3 = board.r3 * board.r3 - board.r2 * board.r2;
    let ring4 = board.r4 * board.r4 - board.r3 * board.r3;

    let bull_end = bull / total;
    let ring2_end = bull_end + ring2 / total;
    let ring3_end = ring2_end + ring3 / total;
    let ring4_end = ring3_end + ring4 / total;
    ZoneThresholds {
        bull_end,
        ring2_end,
        ring3_end,
        ring4_end,
    }
}

/// Radial band `(inner, outer)` used to place a dart for a declared zone.
/// Purple uses ring 2; the outer purple ring is only reachable through a
/// local roll.
pub fn zone_band(board: &BoardConfig, zone: Zone) -> (f64, f64) {
    match zone {
        Zone::Bullseye => (0.0, board.bullseye_r),
        Zone::Purple => (board.bullseye_r, board.r2),
        Zone::Blue => (board.r2, board.r3),
        Zone::Yellow | Zone::Pink | Zone::Mint => (board.r3, board.r4),
    }
}

/// Draw a radius uniformly by area within a band.
pub fn radius_in_band<R: Rng>(rng: &mut R, inner: f64, outer: f64) -> f64 {
    let u: f64 = rng.gen();
    (u * (outer * outer - inner * inner) + inner * inner).sqrt()
}

/// Analytic expected value of one area-weighted dart on a board, as a
/// fraction of the bet. Sits at ~0.98 for every tier by construction.
pub fn expected_value(board: &BoardConfig) -> f64 {
    let t = zone_thresholds(board);
    let bull = t.bull_end;
    let ring2 = t.ring2_end - t.bull_end;
    let ring3 = t.ring3_end - t.ring2_end;
    let ring4 = t.ring4_end - t.ring3_end;
    let ring5 = 1.0 - t.ring4_end;

    let segments = board.total_segments as f64;
    let ring4_ev = board.yellow_count as f64 / segments * board.yellow_mult
        + board.pink_count as f64 / segments * board.pink_mult
        + board.mint_count as f64 / segments * board.mint_mult;

    bull * board.bullseye_mult
        + (ring2 + ring5) * board.purple_mult
        + ring3 * board.blue_mult
        + ring4 * ring4_ev
}

/// One resolved dart: the game result plus its rendering marker.
///
/// The two diverge only for bullseyes, where the result angle is 0 (angle is
/// meaningless at the center) while the marker gets a random angle for
/// visual jitter.
#[derive(Clone, Debug)]
pub struct Throw {
    pub result: DartResult,
    pub marker: DartMarker,
}

/// Resolves dart outcomes. Owns nothing but the marker-id counter, so a
/// resolver is cheap to create and trivial to test in isolation.
#[derive(Debug, Default)]
pub struct Resolver {
    next_marker: u64,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roll one dart locally: select the zone by cumulative area threshold,
    /// then place the landing inside it.
    pub fn resolve<R: Rng>(&mut self, rng: &mut R, bet: f64, difficulty: Difficulty) -> Throw {
        let board = board(difficulty);
        let segments = segments::cached(difficulty);
        let thresholds = zone_thresholds(board);

        let roll: f64 = rng.gen();
        let angle = rng.gen_range(0.0..360.0);

        let (zone, multiplier, radius, segment) = if roll < thresholds.bull_end {
            // Bullseye is too small for the band formula to matter.
            let radius = rng.gen::<f64>() * board.bullseye_r;
            (Zone::Bullseye, board.bullseye_mult, radius, None)
        } else if roll < thresholds.ring2_end {
            let radius = radius_in_band(rng, board.bullseye_r, board.r2);
            (Zone::Purple, board.purple_mult, radius, None)
        } else if roll < thresholds.ring3_end {
            let radius = radius_in_band(rng, board.r2, board.r3);
            (Zone::Blue, board.blue_mult, radius, None)
        } else if roll < thresholds.ring4_end {
            let segment = *segments::locate(segments, angle);
            let radius = radius_in_band(rng, board.r3, board.r4);
            (segment.color.zone(), segment.multiplier, radius, Some(segment))
        } else {
            let radius = radius_in_band(rng, board.r4, board.r5);
            (Zone::Purple, board.purple_mult, radius, None)
        };

        self.finish(rng, zone, angle, radius, segment, multiplier, bet)
    }

    /// Resolve externally supplied zone outcomes into landings.
    ///
    /// The declared zone is authoritative: the zone is never re-rolled, and
    /// for win colors the angle draw is restricted to segments of the
    /// declared color so the visual landing always agrees with the outcome.
    pub fn resolve_outcomes<R: Rng>(
        &mut self,
        rng: &mut R,
        zones: &[Zone],
        bet_per_dart: f64,
        difficulty: Difficulty,
    ) -> Vec<Throw> {
        let board = board(difficulty);
        let segments = segments::cached(difficulty);

        zones
            .iter()
            .map(|&zone| {
                let (inner, outer) = zone_band(board, zone);
                let radius = radius_in_band(rng, inner, outer);

                let mut angle = rng.gen_range(0.0..360.0);
                let mut segment = None;
                if let Some(color) = zone.segment_color() {
                    let matching: Vec<&Segment> =
                        segments.iter().filter(|s| s.color == color).collect();
                    // Every layout contains all three colors.
                    let chosen = matching[rng.gen_range(0..matching.len())];
                    angle = rng.gen_range(chosen.start_angle..chosen.end_angle);
                    segment = Some(*chosen);
                }

                let multiplier = board.multiplier(zone);
                self.finish(rng, zone, angle, radius, segment, multiplier, bet_per_dart)
            })
            .collect()
    }

    fn finish<R: Rng>(
        &mut self,
        rng: &mut R,
        zone: Zone,
        angle: f64,
        radius: f64,
        segment: Option<Segment>,
        multiplier: f64,
        bet: f64,
    ) -> Throw {
        let is_bullseye = zone == Zone::Bullseye;
        let payout = bet * multiplier;
        self.next_marker += 1;

        let result = DartResult {
            zone,
            angle: if is_bullseye { 0.0 } else { angle },
            radius,
            segment,
            multiplier,
            payout,
            is_win: multiplier >= 1.0,
            is_bullseye,
            bet,
            color: zone.color(),
        };
        let marker = DartMarker {
            id: self.next_marker,
            angle: if is_bullseye { rng.gen_range(0.0..360.0) } else { angle },
            radius,
            color: zone.color(),
            multiplier,
            payout,
            is_bullseye,
            latest: true,
        };
        Throw { result, marker }
    }
}
