//! Renderer-facing notifications.
//!
//! The simulator mutates [`Program`](crate::Program) and
//! [`Tape`](crate::Tape) first and only then tells the presenter what
//! changed, so a presenter always observes the new state. All methods
//! default to no-ops.

use tapedeck_core::{Position, Speed, Symbol};

use crate::tape::Direction;

/// Visual timing for a tape write or head move.
///
/// The renderer waits `wait_ms`, then animates for `animate_ms`. The
/// split is purely visual; it never changes when the next step runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualTiming {
    /// Delay before the animation starts.
    pub wait_ms: u64,
    /// Animation length.
    pub animate_ms: u64,
}

impl VisualTiming {
    /// Split `tape_time_ms` into two halves.
    pub fn split(tape_time_ms: u64) -> Self {
        let wait_ms = tape_time_ms / 2;
        Self {
            wait_ms,
            animate_ms: tape_time_ms - wait_ms,
        }
    }
}

/// A change of highlighted instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Highlight {
    /// Previously highlighted slot; `None` on the first step of a run.
    pub previous: Option<Position>,
    /// Slot now executing.
    pub position: Position,
    /// Speed the step runs at.
    pub speed: Speed,
}

/// Receives visual transitions from a running
/// [`Simulator`](crate::Simulator).
pub trait Presenter {
    /// A new instruction is executing.
    fn instruction_changed(&mut self, _highlight: Highlight) {}

    /// The highlight on `position` should fade; sent once when a run halts.
    fn instruction_dimmed(&mut self, _position: Position) {}

    /// `symbol` was written at tape cell `head`.
    fn tape_written(&mut self, _head: i64, _symbol: Symbol, _timing: VisualTiming) {}

    /// The head moved one cell in `direction` and is now at `head`.
    fn head_moved(&mut self, _head: i64, _direction: Direction, _timing: VisualTiming) {}

    /// The boring-loop accelerator raised the run's speed.
    fn speed_forced(&mut self, _speed: Speed) {}

    /// The program ran off the board or hit the step limit.
    fn halted(&mut self, _steps: u64) {}
}

/// A presenter that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}
