use serde::Serialize;

/// Running totals across all finalized rounds in the current session.
///
/// Mutated only at round finalization. Watermarks never decrease; counters
/// never decrement. Cleared only by a full session reset, which is owned by
/// the surrounding shell.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub total_rounds: u64,
    pub wins: u64,
    pub losses: u64,
    /// Cumulative payout minus cumulative bet.
    pub net_pnl: f64,
    /// Largest single-round profit seen.
    pub biggest_win: f64,
    /// Largest single-dart multiplier seen in any finalized round.
    pub biggest_multiplier: f64,
}

impl SessionStats {
    /// Fold one finalized round into the totals.
    ///
    /// A round is a win when its payout covers the bet, independent of the
    /// individual darts' win flags. `best_multiplier` is the maximum
    /// multiplier over every dart placed in the round.
    pub fn record_round(&mut self, bet: f64, payout: f64, best_multiplier: f64) {
        let profit = payout - bet;
        self.total_rounds += 1;
        if payout >= bet {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.net_pnl += profit;
        if profit > 0.0 && profit > self.biggest_win {
            self.biggest_win = profit;
        }
        if best_multiplier > self.biggest_multiplier {
            self.biggest_multiplier = best_multiplier;
        }
    }
}
