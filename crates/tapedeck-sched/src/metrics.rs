//! Cumulative scheduler counters.
//!
//! [`SchedulerMetrics`] is updated in place by every tick, schedule and
//! cancel call, and zeroed by `reset()`. Hosts read it for debug
//! overlays and telemetry.

/// Counters since construction or the last reset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SchedulerMetrics {
    /// Ticks processed.
    pub ticks: u64,
    /// Callbacks scheduled.
    pub events_scheduled: u64,
    /// Callbacks fired.
    pub events_fired: u64,
    /// Callbacks cancelled before firing.
    pub events_cancelled: u64,
    /// Frames past the warm-up window that overran the tick period.
    pub overrun_frames: u64,
    /// Times the throttle stretched the tick period.
    pub slowdowns: u64,
    /// Wall duration of the most recent frame, in microseconds.
    pub last_frame_us: u64,
}
