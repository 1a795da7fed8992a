//! Batch simulation of ringshot rounds.
//!
//! Plays large numbers of rounds through both resolution paths — the local
//! area-weighted roll and the generate-then-resolve path the round actor
//! uses — and compares realized return-to-player against the analytic
//! expectation. The generator and the resolver derive zone probabilities
//! independently, so a drift between the two shows up here before it shows
//! up in player balances.

use rand::Rng;
use ringshot_engine::{
    resolver::{expected_value, Resolver},
    source::{code_distribution, draw_codes},
};
use ringshot_types::{board, Difficulty, Zone};
use serde::Serialize;

/// Simulation report for one difficulty.
#[derive(Clone, Debug, Serialize)]
pub struct Summary {
    pub difficulty: Difficulty,
    pub rounds: u64,
    pub darts_per_round: u32,
    pub bet: f64,
    /// Expected value of one dart as a fraction of its bet.
    pub analytic_ev: f64,
    /// Realized RTP of the local-roll path.
    pub local_rtp: f64,
    /// Realized RTP of the generate-then-resolve path.
    pub external_rtp: f64,
    /// Deviation bound both RTPs must stay within.
    pub tolerance: f64,
    pub bullseyes: u64,
    pub biggest_multiplier: f64,
}

impl Summary {
    /// Whether both realized RTPs sit within the tolerance of the analytic
    /// expectation.
    pub fn within_tolerance(&self) -> bool {
        (self.local_rtp - self.analytic_ev).abs() <= self.tolerance
            && (self.external_rtp - self.analytic_ev).abs() <= self.tolerance
    }
}

/// Mean and variance of the single-dart payout multiplier, from the same
/// cumulative distribution the simulated outcome source draws from.
pub fn payout_moments(difficulty: Difficulty) -> (f64, f64) {
    let b = board(difficulty);
    let cumulative = code_distribution(difficulty);
    let multipliers = [
        b.bullseye_mult,
        b.purple_mult,
        b.blue_mult,
        b.yellow_mult,
        b.pink_mult,
        b.mint_mult,
    ];

    let mut previous = 0.0;
    let mut mean = 0.0;
    let mut second = 0.0;
    for (code, &end) in cumulative.iter().enumerate() {
        let p = end - previous;
        previous = end;
        mean += p * multipliers[code];
        second += p * multipliers[code] * multipliers[code];
    }
    (mean, second - mean * mean)
}

/// Five standard errors of the mean over `darts` draws. The jackpot tail
/// dominates the variance, so the bound is derived per difficulty instead of
/// hardcoded.
pub fn rtp_tolerance(difficulty: Difficulty, darts: u64) -> f64 {
    let (_, variance) = payout_moments(difficulty);
    5.0 * (variance / darts as f64).sqrt()
}

/// Simulate `rounds` rounds of `darts_per_round` darts through both paths.
pub fn simulate<R: Rng>(
    rng: &mut R,
    difficulty: Difficulty,
    rounds: u64,
    darts_per_round: u32,
    bet: f64,
) -> Summary {
    let mut resolver = Resolver::new();
    let bet_per_dart = bet / darts_per_round as f64;
    let total_darts = rounds * darts_per_round as u64;

    let mut local_payout = 0.0;
    let mut external_payout = 0.0;
    let mut bullseyes = 0u64;
    let mut biggest_multiplier = 0.0f64;

    for _ in 0..rounds {
        // Local roll path.
        for _ in 0..darts_per_round {
            let throw = resolver.resolve(rng, bet_per_dart, difficulty);
            local_payout += throw.result.payout;
        }

        // Generate-then-resolve path, as the round actor runs it.
        let codes = draw_codes(rng, difficulty, darts_per_round);
        let zones: Vec<Zone> = codes
            .iter()
            .map(|&code| Zone::try_from(code).expect("generator emitted an invalid zone code"))
            .collect();
        for throw in resolver.resolve_outcomes(rng, &zones, bet_per_dart, difficulty) {
            external_payout += throw.result.payout;
            if throw.result.is_bullseye {
                bullseyes += 1;
            }
            if throw.result.multiplier > biggest_multiplier {
                biggest_multiplier = throw.result.multiplier;
            }
        }
    }

    let wagered = rounds as f64 * bet;
    Summary {
        difficulty,
        rounds,
        darts_per_round,
        bet,
        analytic_ev: expected_value(board(difficulty)),
        local_rtp: local_payout / wagered,
        external_rtp: external_payout / wagered,
        tolerance: rtp_tolerance(difficulty, total_darts),
        bullseyes,
        biggest_multiplier,
    }
}
