//! Strongly-typed identifiers: ticks, scheduled events, and instruction
//! positions.

use std::fmt;

/// Monotonically increasing virtual clock value.
///
/// Owned by the scheduler; advanced once per processed host frame.
/// The only notion of logical time in the system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// Tick `n` ticks after this one, saturating at `u64::MAX`.
    pub fn after(self, n: u64) -> Self {
        Self(self.0.saturating_add(n))
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Handle for a scheduled callback.
///
/// Allocated from a per-scheduler counter that restarts at zero on
/// reset. The counter value is also the FIFO tie-break between events
/// due on the same tick, so a lower id always fires first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Address of one operation slot: a track and an index along it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Track (row) number, 0-based.
    pub track: u32,
    /// Slot index along the track, 0-based.
    pub index: u32,
}

impl Position {
    /// The first slot of the first track.
    pub const ORIGIN: Position = Position { track: 0, index: 0 };

    /// Construct a position.
    pub const fn new(track: u32, index: u32) -> Self {
        Self { track, index }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.track, self.index)
    }
}

impl From<(u32, u32)> for Position {
    fn from((track, index): (u32, u32)) -> Self {
        Self { track, index }
    }
}
