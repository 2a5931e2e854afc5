//! Named speed presets and their step timings.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseSpeedError;
use crate::op::OpCategory;

/// Millisecond durations governing step pacing at one speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpeedProfile {
    /// Delay after a non-empty, non-branch operation.
    pub step_time_ms: u64,
    /// Delay after an empty slot.
    pub empty_step_time_ms: u64,
    /// Visual duration of a tape write or head move.
    pub tape_time_ms: u64,
    /// Delay after a `U`, `D` or `B` operation.
    pub branch_time_ms: u64,
}

impl SpeedProfile {
    /// Delay before the next step after an op of the given category.
    pub fn step_delay_ms(&self, category: OpCategory) -> u64 {
        match category {
            OpCategory::Empty => self.empty_step_time_ms,
            OpCategory::Branch => self.branch_time_ms,
            OpCategory::Step => self.step_time_ms,
        }
    }
}

/// Speed preset, ordered from slowest to fastest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Speed {
    /// Slowest pacing.
    Slow,
    /// Pacing used while a tutorial is explaining the board.
    Tutorial,
    /// Default pacing.
    #[default]
    Normal,
    /// Quick pacing; also forced by the boring-loop accelerator.
    Fast,
    /// Near-instant pacing for long or looping programs.
    Ludicrous,
}

const SLOW: SpeedProfile = SpeedProfile {
    step_time_ms: 1200,
    empty_step_time_ms: 400,
    tape_time_ms: 800,
    branch_time_ms: 900,
};

const TUTORIAL: SpeedProfile = SpeedProfile {
    step_time_ms: 900,
    empty_step_time_ms: 300,
    tape_time_ms: 600,
    branch_time_ms: 700,
};

const NORMAL: SpeedProfile = SpeedProfile {
    step_time_ms: 600,
    empty_step_time_ms: 200,
    tape_time_ms: 400,
    branch_time_ms: 450,
};

const FAST: SpeedProfile = SpeedProfile {
    step_time_ms: 250,
    empty_step_time_ms: 80,
    tape_time_ms: 160,
    branch_time_ms: 180,
};

const LUDICROUS: SpeedProfile = SpeedProfile {
    step_time_ms: 50,
    empty_step_time_ms: 16,
    tape_time_ms: 32,
    branch_time_ms: 40,
};

impl Speed {
    /// All presets, slowest first.
    pub const ALL: [Speed; 5] = [
        Speed::Slow,
        Speed::Tutorial,
        Speed::Normal,
        Speed::Fast,
        Speed::Ludicrous,
    ];

    /// The timing profile for this preset.
    pub fn profile(self) -> &'static SpeedProfile {
        match self {
            Self::Slow => &SLOW,
            Self::Tutorial => &TUTORIAL,
            Self::Normal => &NORMAL,
            Self::Fast => &FAST,
            Self::Ludicrous => &LUDICROUS,
        }
    }

    /// Lowercase preset name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Slow => "slow",
            Self::Tutorial => "tutorial",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Ludicrous => "ludicrous",
        }
    }

    /// Next faster preset; `Ludicrous` stays put.
    pub fn faster(self) -> Self {
        let i = self as usize;
        Self::ALL[(i + 1).min(Self::ALL.len() - 1)]
    }

    /// Next slower preset; `Slow` stays put.
    pub fn slower(self) -> Self {
        let i = self as usize;
        Self::ALL[i.saturating_sub(1)]
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Speed {
    type Err = ParseSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|speed| speed.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSpeedError {
                input: s.to_string(),
            })
    }
}
