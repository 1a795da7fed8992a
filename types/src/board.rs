use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Difficulty tiers, ordered easiest to hardest.
///
/// Each tier thins the segmented ring and lowers the loss multipliers while
/// raising the bullseye jackpot, keeping the expected return constant by
/// construction (checked in tests, not at runtime).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy = 0,
    Medium = 1,
    Hard = 2,
    Expert = 3,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unknown difficulty name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(UnknownDifficulty(other.to_string())),
        }
    }
}

/// Landing zones, in outcome-code order.
///
/// The discriminants ARE the wire contract with the external outcome source:
/// a response is one `u8` per dart, each in `0..=5`. Anything else fails
/// [`Zone::try_from`] and must be treated as a trust-boundary violation by
/// the caller, never coerced to a default zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Bullseye = 0,
    /// Solid loss rings 2 and 5 share one zone and one multiplier.
    Purple = 1,
    Blue = 2,
    Yellow = 3,
    Pink = 4,
    Mint = 5,
}

/// Error for an outcome code outside the zone alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid zone code: {0}")]
pub struct InvalidZone(pub u8);

impl TryFrom<u8> for Zone {
    type Error = InvalidZone;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Zone::Bullseye),
            1 => Ok(Zone::Purple),
            2 => Ok(Zone::Blue),
            3 => Ok(Zone::Yellow),
            4 => Ok(Zone::Pink),
            5 => Ok(Zone::Mint),
            i => Err(InvalidZone(i)),
        }
    }
}

impl Zone {
    /// Display color for the zone.
    pub fn color(&self) -> &'static str {
        match self {
            Zone::Bullseye => BULLSEYE_COLOR,
            Zone::Purple => PURPLE_COLOR,
            Zone::Blue => BLUE_COLOR,
            Zone::Yellow => YELLOW_COLOR,
            Zone::Pink => PINK_COLOR,
            Zone::Mint => MINT_COLOR,
        }
    }

    /// Whether the zone is one of the three segmented-ring win colors.
    pub fn is_segment_color(&self) -> bool {
        self.segment_color().is_some()
    }

    /// The segmented-ring color class for win-color zones.
    pub fn segment_color(&self) -> Option<SegmentColor> {
        match self {
            Zone::Yellow => Some(SegmentColor::Yellow),
            Zone::Pink => Some(SegmentColor::Pink),
            Zone::Mint => Some(SegmentColor::Mint),
            _ => None,
        }
    }
}

/// Color classes of the segmented ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[serde(rename_all = "lowercase")]
pub enum SegmentColor {
    Yellow = 0,
    Pink = 1,
    Mint = 2,
}

impl SegmentColor {
    pub fn zone(&self) -> Zone {
        match self {
            SegmentColor::Yellow => Zone::Yellow,
            SegmentColor::Pink => Zone::Pink,
            SegmentColor::Mint => Zone::Mint,
        }
    }

    pub fn color(&self) -> &'static str {
        self.zone().color()
    }
}

/// Zone display palette.
pub const PURPLE_COLOR: &str = "#577590";
pub const BLUE_COLOR: &str = "#277DA1";
pub const YELLOW_COLOR: &str = "#F9C74F";
pub const PINK_COLOR: &str = "#F3722C";
pub const MINT_COLOR: &str = "#F94144";
pub const BULLSEYE_COLOR: &str = "#90BE6D";

/// Static geometry and payout table for one difficulty.
///
/// Rings, inside to outside:
/// - bullseye (`0..bullseye_r`) — jackpot
/// - ring 2 (`bullseye_r..r2`) — solid purple (loss)
/// - ring 3 (`r2..r3`) — solid blue (loss)
/// - ring 4 (`r3..r4`) — segmented yellow/pink/mint (wins)
/// - ring 5 (`r4..r5`) — solid purple (loss)
///
/// The numeric constants are load-bearing: zone probabilities are ratios of
/// squared-radius differences, and each tier's area-weighted expected value
/// was solved for a ~2% house edge. Do not retune them casually.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardConfig {
    /// Ring boundary radii, strictly increasing.
    pub bullseye_r: f64,
    pub r2: f64,
    pub r3: f64,
    pub r4: f64,
    pub r5: f64,

    /// Multipliers.
    pub purple_mult: f64,
    pub blue_mult: f64,
    pub yellow_mult: f64,
    pub pink_mult: f64,
    pub mint_mult: f64,
    pub bullseye_mult: f64,

    /// Ring 4 segment counts (sum to `total_segments`).
    pub yellow_count: u32,
    pub pink_count: u32,
    pub mint_count: u32,
    pub total_segments: u32,

    /// Ring 4 color interleaving, one entry per segment, no two adjacent
    /// entries equal.
    pub layout: &'static [SegmentColor],
}

impl BoardConfig {
    /// Multiplier for a zone on this board.
    pub fn multiplier(&self, zone: Zone) -> f64 {
        match zone {
            Zone::Bullseye => self.bullseye_mult,
            Zone::Purple => self.purple_mult,
            Zone::Blue => self.blue_mult,
            Zone::Yellow => self.yellow_mult,
            Zone::Pink => self.pink_mult,
            Zone::Mint => self.mint_mult,
        }
    }

    /// Multiplier for a segment color class.
    pub fn segment_multiplier(&self, color: SegmentColor) -> f64 {
        self.multiplier(color.zone())
    }
}

use SegmentColor::{Mint as M, Pink as P, Yellow as Y};

const EASY_LAYOUT: &[SegmentColor] = &[Y, P, Y, M, Y, P, Y, M, Y, P, Y, M, Y, P, Y, P, Y, M];
const MEDIUM_LAYOUT: &[SegmentColor] = EASY_LAYOUT;
const HARD_LAYOUT: &[SegmentColor] = &[Y, P, Y, P, Y, M, Y, P, Y, P, Y, M, Y, P, Y, P, Y, M];
const EXPERT_LAYOUT: &[SegmentColor] = &[Y, P, Y, M, Y, P, Y, P, Y, M, Y, P];

/// 18 segments (9Y, 5P, 4M), thick segmented ring. EV = 0.9799.
const EASY_BOARD: BoardConfig = BoardConfig {
    bullseye_r: 12.0,
    r2: 55.0,
    r3: 100.0,
    r4: 139.0,
    r5: 168.0,
    purple_mult: 0.5,
    blue_mult: 0.8,
    yellow_mult: 1.2,
    pink_mult: 1.5,
    mint_mult: 2.7,
    bullseye_mult: 7.7,
    yellow_count: 9,
    pink_count: 5,
    mint_count: 4,
    total_segments: 18,
    layout: EASY_LAYOUT,
};

/// 18 segments (9Y, 5P, 4M), segmented ring ~50% thinner. EV = 0.9810.
const MEDIUM_BOARD: BoardConfig = BoardConfig {
    bullseye_r: 12.0,
    r2: 65.0,
    r3: 120.0,
    r4: 140.0,
    r5: 168.0,
    purple_mult: 0.4,
    blue_mult: 0.6,
    yellow_mult: 1.3,
    pink_mult: 2.0,
    mint_mult: 4.0,
    bullseye_mult: 39.0,
    yellow_count: 9,
    pink_count: 5,
    mint_count: 4,
    total_segments: 18,
    layout: MEDIUM_LAYOUT,
};

/// 18 segments (9Y, 6P, 3M). EV = 0.9823.
const HARD_BOARD: BoardConfig = BoardConfig {
    bullseye_r: 12.0,
    r2: 70.0,
    r3: 130.0,
    r4: 145.0,
    r5: 168.0,
    purple_mult: 0.2,
    blue_mult: 0.5,
    yellow_mult: 1.5,
    pink_mult: 2.5,
    mint_mult: 5.0,
    bullseye_mult: 65.0,
    yellow_count: 9,
    pink_count: 6,
    mint_count: 3,
    total_segments: 18,
    layout: HARD_LAYOUT,
};

/// 12 segments (6Y, 4P, 2M), thinnest segmented ring. EV = 0.9817.
const EXPERT_BOARD: BoardConfig = BoardConfig {
    bullseye_r: 12.0,
    r2: 75.0,
    r3: 138.0,
    r4: 148.0,
    r5: 168.0,
    purple_mult: 0.1,
    blue_mult: 0.3,
    yellow_mult: 1.5,
    pink_mult: 3.0,
    mint_mult: 8.0,
    bullseye_mult: 95.0,
    yellow_count: 6,
    pink_count: 4,
    mint_count: 2,
    total_segments: 12,
    layout: EXPERT_LAYOUT,
};

/// Board table lookup. Infallible: every difficulty is statically defined.
pub fn board(difficulty: Difficulty) -> &'static BoardConfig {
    match difficulty {
        Difficulty::Easy => &EASY_BOARD,
        Difficulty::Medium => &MEDIUM_BOARD,
        Difficulty::Hard => &HARD_BOARD,
        Difficulty::Expert => &EXPERT_BOARD,
    }
}
