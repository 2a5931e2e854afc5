//! Real-time host frame loop.
//!
//! Browsers and game shells call [`Scheduler::frame()`] from their own
//! animation callback. Headless hosts (the demo, soak tests) use
//! [`FrameDriver`] instead: it paces frames at the configured host rate
//! on the current thread, sleeping whatever is left of each frame budget.

use std::time::Duration;

use web_time::Instant;

use crate::scheduler::Scheduler;

/// Summary of a [`FrameDriver::run_until`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverReport {
    /// Frames processed.
    pub frames: u64,
    /// Wall time spent in the loop.
    pub elapsed: Duration,
    /// Whether the loop ended because the scheduler was stopped rather
    /// than because the predicate was satisfied.
    pub scheduler_stopped: bool,
}

/// Paces scheduler frames against wall-clock time.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    frame_budget: Duration,
}

impl FrameDriver {
    /// Driver using the scheduler's configured host frame rate.
    pub fn for_scheduler<C>(scheduler: &Scheduler<C>) -> Self {
        Self {
            frame_budget: Duration::from_secs_f64(1.0 / scheduler.config().host_frame_rate_hz),
        }
    }

    /// Driver with an explicit per-frame budget.
    pub fn with_budget(frame_budget: Duration) -> Self {
        Self { frame_budget }
    }

    /// The per-frame budget.
    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    /// Run frames until `done` returns `true` or the scheduler stops.
    ///
    /// `done` is checked before every frame, so a context that is
    /// already finished runs zero frames.
    pub fn run_until<C, F>(&self, scheduler: &mut Scheduler<C>, ctx: &mut C, mut done: F) -> DriverReport
    where
        F: FnMut(&C) -> bool,
    {
        let started = Instant::now();
        let mut frames = 0;
        let scheduler_stopped = loop {
            if done(ctx) {
                break false;
            }
            if scheduler.is_stopped() {
                break true;
            }

            let frame_start = Instant::now();
            scheduler.frame(ctx, frame_start);
            frames += 1;

            let elapsed = frame_start.elapsed();
            if let Some(remaining) = self.frame_budget.checked_sub(elapsed) {
                std::thread::sleep(remaining);
            }
        };

        let report = DriverReport {
            frames,
            elapsed: started.elapsed(),
            scheduler_stopped,
        };
        tracing::debug!(frames = report.frames, elapsed = ?report.elapsed, "frame driver finished");
        report
    }
}
