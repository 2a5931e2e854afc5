//! Adaptive tick-period throttle.
//!
//! Each processed frame reports its measured wall duration. Frames that
//! overrun the current period by more than the configured tolerance bump
//! an overrun counter; on-time frames halve it, so isolated hiccups decay
//! away while sustained load accumulates. When the counter crosses the
//! threshold the period is stretched by the slowdown factor and the
//! counter restarts.
//!
//! The throttle only ever slows down. The fast rate comes back only
//! through [`FrameThrottle::reset`].

use crate::config::ThrottleConfig;

/// Overrun accounting and the current tick period.
#[derive(Clone, Debug)]
pub struct FrameThrottle {
    config: ThrottleConfig,
    period_ms: f64,
    overruns: u32,
    frames_seen: u64,
    overrun_frames: u64,
    slowdowns: u64,
}

impl FrameThrottle {
    /// Create a throttle at the fastest period.
    pub fn new(config: &ThrottleConfig) -> Self {
        Self {
            config: config.clone(),
            period_ms: config.fastest_period_ms,
            overruns: 0,
            frames_seen: 0,
            overrun_frames: 0,
            slowdowns: 0,
        }
    }

    /// Record one frame's wall duration in milliseconds.
    ///
    /// Returns `true` if this frame caused the period to grow.
    pub fn record_frame(&mut self, frame_ms: f64) -> bool {
        self.frames_seen += 1;
        if self.frames_seen <= self.config.warmup_ticks {
            return false;
        }

        if frame_ms > self.period_ms * self.config.overrun_tolerance {
            self.overruns = self.overruns.saturating_add(1);
            self.overrun_frames += 1;
        } else {
            self.overruns /= 2;
        }

        if self.overruns <= self.config.overrun_threshold {
            return false;
        }

        let previous = self.period_ms;
        self.period_ms =
            (self.period_ms * self.config.slowdown_factor).min(self.config.slowest_period_ms);
        self.overruns = 0;
        self.slowdowns += 1;
        tracing::info!(
            previous_ms = previous,
            period_ms = self.period_ms,
            "tick period throttled after sustained overrun"
        );
        true
    }

    /// Current tick period in milliseconds.
    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Current overrun counter.
    pub fn overruns(&self) -> u32 {
        self.overruns
    }

    /// Frames recorded past the warm-up window that overran.
    pub fn overrun_frames(&self) -> u64 {
        self.overrun_frames
    }

    /// Number of times the period has grown since the last reset.
    pub fn slowdowns(&self) -> u64 {
        self.slowdowns
    }

    /// Whether the warm-up window is still open.
    pub fn warming_up(&self) -> bool {
        self.frames_seen < self.config.warmup_ticks
    }

    /// Restore the fastest period and clear all counters.
    pub fn reset(&mut self) {
        *self = Self::new(&self.config);
    }
}
