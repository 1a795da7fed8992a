//! The outcome-source seam.
//!
//! The round actor never rolls its own zones: it requests one outcome code
//! per dart from an [`OutcomeSource`] and only turns the codes into visual
//! landings. This is the boundary where a remote fairness oracle would be
//! substituted without touching the resolver or the round machine.

use commonware_runtime::Clock;
use rand::{CryptoRng, Rng};
use ringshot_types::{board, Difficulty};
use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

/// Simulated network latency before a response.
const RESPONSE_DELAY: Duration = Duration::from_millis(500);

/// An external source of authoritative dart outcomes.
///
/// A response carries one zone code per dart (each in `0..=5`, see
/// [`ringshot_types::Zone`]) in throw order. The source is a trust boundary:
/// the engine asserts the code range rather than coercing unknown codes.
pub trait OutcomeSource: Clone + Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Request `darts` outcome codes for a round at `difficulty`.
    fn request(
        &self,
        difficulty: Difficulty,
        darts: u32,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}

/// Local pseudo-random outcome source.
///
/// Stands in for the production oracle: waits a fixed delay on the runtime
/// clock, then draws codes from the same area-derived distribution the
/// resolver's thresholds encode. Keeping the two derivations in lockstep is
/// load-bearing for fairness and is cross-checked in tests.
#[derive(Clone)]
pub struct Simulated<E: Clock + Rng + CryptoRng + Clone + Send + Sync + 'static> {
    context: E,
}

impl<E: Clock + Rng + CryptoRng + Clone + Send + Sync + 'static> Simulated<E> {
    pub fn new(context: E) -> Self {
        Self { context }
    }
}

impl<E: Clock + Rng + CryptoRng + Clone + Send + Sync + 'static> OutcomeSource for Simulated<E> {
    type Error = Infallible;

    async fn request(&self, difficulty: Difficulty, darts: u32) -> Result<Vec<u8>, Infallible> {
        let mut context = self.context.clone();
        context.sleep(RESPONSE_DELAY).await;
        Ok(draw_codes(&mut context, difficulty, darts))
    }
}

/// Cumulative code distribution over
/// [bullseye, purple (rings 2+5 combined), blue, yellow, pink, mint].
///
/// Ring areas are squared-radius differences; the segmented ring's mass is
/// split between colors by segment-count fractions.
pub fn code_distribution(difficulty: Difficulty) -> [f64; 6] {
    let b = board(difficulty);
    let total = b.r5 * b.r5;
    let bull = (b.bullseye_r * b.bullseye_r) / total;
    let ring2 = (b.r2 * b.r2 - b.bullseye_r * b.bullseye_r) / total;
    let ring3 = (b.r3 * b.r3 - b.r2 * b.r2) / total;
    let ring4 = (b.r4 * b.r4 - b.r3 * b.r3) / total;
    // Purple is ring 2 plus the outer remainder.
    let purple = ring2 + (1.0 - bull - ring2 - ring3 - ring4);

    let segments = b.total_segments as f64;
    let yellow = ring4 * (b.yellow_count as f64 / segments);
    let pink = ring4 * (b.pink_count as f64 / segments);

    [
        bull,
        bull + purple,
        bull + purple + ring3,
        bull + purple + ring3 + yellow,
        bull + purple + ring3 + yellow + pink,
        1.0,
    ]
}

/// Draw `count` outcome codes from the generator distribution.
pub fn draw_codes<R: Rng>(rng: &mut R, difficulty: Difficulty, count: u32) -> Vec<u8> {
    let cumulative = code_distribution(difficulty);
    (0..count)
        .map(|_| {
            let roll: f64 = rng.gen();
            cumulative.iter().position(|&end| roll < end).unwrap_or(0) as u8
        })
        .collect()
}
