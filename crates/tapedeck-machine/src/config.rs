//! Simulator configuration and validation.

use tapedeck_core::{ConfigError, Speed};

// ── BoringLoopConfig ───────────────────────────────────────────────

/// Visit counts at which a looping run is sped up.
///
/// Only consulted while a step limit is set. Once a single position has
/// been executed more than `fast_after` times the run is held at
/// [`Speed::Fast`] or faster; past `ludicrous_after` it is held at
/// [`Speed::Ludicrous`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoringLoopConfig {
    /// Visits after which `Fast` is forced. Default: 4.
    pub fast_after: u32,
    /// Visits after which `Ludicrous` is forced. Default: 6.
    pub ludicrous_after: u32,
}

impl Default for BoringLoopConfig {
    fn default() -> Self {
        Self {
            fast_after: 4,
            ludicrous_after: 6,
        }
    }
}

impl BoringLoopConfig {
    /// Check that the thresholds are ordered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ludicrous_after < self.fast_after {
            return Err(ConfigError::InvalidBoringLoop {
                reason: format!(
                    "ludicrous_after ({}) must be >= fast_after ({})",
                    self.ludicrous_after, self.fast_after
                ),
            });
        }
        Ok(())
    }

    /// The speed floor for a position visited `visits` times, if any.
    pub fn floor_for(&self, visits: u32) -> Option<Speed> {
        if visits > self.ludicrous_after {
            Some(Speed::Ludicrous)
        } else if visits > self.fast_after {
            Some(Speed::Fast)
        } else {
            None
        }
    }
}

// ── SimulatorConfig ────────────────────────────────────────────────

/// Construction input for a [`Simulator`](crate::Simulator).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulatorConfig {
    /// Initial speed preset. Default: [`Speed::Normal`].
    pub speed: Speed,
    /// Maximum executed steps per run; 0 means unlimited. Default: 0.
    pub step_limit: u64,
    /// Loop acceleration thresholds.
    pub boring_loop: BoringLoopConfig,
}

impl SimulatorConfig {
    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.boring_loop.validate()
    }
}
