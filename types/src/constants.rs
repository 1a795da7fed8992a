/// Starting balance for a new session.
pub const STARTING_BALANCE: f64 = 1_000.0;

/// Default bet amount.
pub const DEFAULT_BET: f64 = 10.0;

/// Default difficulty for a new session.
pub const DEFAULT_DIFFICULTY: crate::Difficulty = crate::Difficulty::Easy;

/// Most recent dart markers kept visible on the board.
pub const MAX_VISIBLE_MARKERS: usize = 10;

/// Most recent multipliers kept in the rolling result history.
pub const RESULT_HISTORY_LEN: usize = 4;

/// Upper bound on darts per round accepted from the shell. The resolver
/// itself places no bound on outcome-code list length.
pub const MAX_DARTS_PER_ROUND: u32 = 10;

/// Round counts offered for auto-play.
pub const AUTO_PLAY_OPTIONS: [u32; 3] = [10, 25, 50];

/// Board SVG viewbox edge length.
pub const BOARD_VIEW: f64 = 500.0;

/// Decorative frame radii (outside the scoring boundary).
pub const FRAME_OUTER_R: f64 = 225.0;
pub const FRAME_INNER_R: f64 = 170.0;
