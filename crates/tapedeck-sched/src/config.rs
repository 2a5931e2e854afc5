//! Scheduler configuration and validation.
//!
//! [`SchedulerConfig`] is the builder input for [`Scheduler`](crate::Scheduler).
//! [`validate()`](SchedulerConfig::validate) checks all invariants up
//! front so the tick path never has to.

use std::fmt;

use tapedeck_core::ConfigError;

// ── ThrottleConfig ─────────────────────────────────────────────────

/// Shape of the adaptive tick-period throttle.
///
/// The period starts at `fastest_period_ms`. Frames that overrun the
/// period by more than `overrun_tolerance` accumulate; once more than
/// `overrun_threshold` have accumulated the period grows by
/// `slowdown_factor`, up to `slowest_period_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThrottleConfig {
    /// Initial (and shortest) tick period. Default: 1000/60 ms.
    pub fastest_period_ms: f64,
    /// Longest tick period the throttle may reach. Default: 1000/20 ms.
    pub slowest_period_ms: f64,
    /// A frame overruns when it takes longer than this multiple of the
    /// current period. Default: 1.05.
    pub overrun_tolerance: f64,
    /// Accumulated overruns that trigger a slowdown. Default: 20.
    pub overrun_threshold: u32,
    /// Multiplier applied to the period on slowdown. Default: 1.2.
    pub slowdown_factor: f64,
    /// Frames ignored after construction or reset. Default: 30.
    pub warmup_ticks: u64,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            fastest_period_ms: 1000.0 / 60.0,
            slowest_period_ms: 1000.0 / 20.0,
            overrun_tolerance: 1.05,
            overrun_threshold: 20,
            slowdown_factor: 1.2,
            warmup_ticks: 30,
        }
    }
}

impl ThrottleConfig {
    /// Check the throttle invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fastest_period_ms.is_finite() || self.fastest_period_ms <= 0.0 {
            return Err(ConfigError::InvalidThrottle {
                reason: format!(
                    "fastest_period_ms must be finite and positive, got {}",
                    self.fastest_period_ms
                ),
            });
        }
        if !self.slowest_period_ms.is_finite() || self.slowest_period_ms < self.fastest_period_ms
        {
            return Err(ConfigError::InvalidThrottle {
                reason: format!(
                    "slowest_period_ms ({}) must be finite and >= fastest_period_ms ({})",
                    self.slowest_period_ms, self.fastest_period_ms
                ),
            });
        }
        if !self.overrun_tolerance.is_finite() || self.overrun_tolerance < 1.0 {
            return Err(ConfigError::InvalidThrottle {
                reason: format!(
                    "overrun_tolerance must be finite and >= 1.0, got {}",
                    self.overrun_tolerance
                ),
            });
        }
        if !self.slowdown_factor.is_finite() || self.slowdown_factor <= 1.0 {
            return Err(ConfigError::InvalidThrottle {
                reason: format!(
                    "slowdown_factor must be finite and > 1.0, got {}",
                    self.slowdown_factor
                ),
            });
        }
        Ok(())
    }
}

// ── SchedulerConfig ────────────────────────────────────────────────

/// Complete configuration for a [`Scheduler`](crate::Scheduler).
#[derive(Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Adaptive throttle settings.
    pub throttle: ThrottleConfig,
    /// Rate at which [`FrameDriver`](crate::FrameDriver) requests host
    /// frames. Default: 60.
    pub host_frame_rate_hz: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            throttle: ThrottleConfig::default(),
            host_frame_rate_hz: 60.0,
        }
    }
}

impl SchedulerConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.throttle.validate()?;
        // Reciprocal must be finite too: subnormal rates would overflow
        // Duration::from_secs_f64.
        let hz = self.host_frame_rate_hz;
        if !hz.is_finite() || hz <= 0.0 || !(1.0 / hz).is_finite() {
            return Err(ConfigError::InvalidThrottle {
                reason: format!("host_frame_rate_hz must be finite and positive, got {hz}"),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for SchedulerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerConfig")
            .field("fastest_period_ms", &self.throttle.fastest_period_ms)
            .field("slowest_period_ms", &self.throttle.slowest_period_ms)
            .field("overrun_threshold", &self.throttle.overrun_threshold)
            .field("host_frame_rate_hz", &self.host_frame_rate_hz)
            .finish_non_exhaustive()
    }
}
