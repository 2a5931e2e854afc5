//! The discrete-event scheduler.
//!
//! [`Scheduler`] owns a virtual clock and a set of pending callbacks keyed
//! by target tick. Durations are converted to tick counts with the
//! current tick period, which the [`FrameThrottle`] stretches when the
//! host falls behind.
//!
//! # Host integration
//!
//! The host calls [`frame()`](Scheduler::frame) once per animation frame
//! (or [`tick()`](Scheduler::tick) with an explicit frame duration, which
//! is what tests do). Each call fires every event due at the current
//! tick and advances the clock by one. The returned [`TickReport`] says
//! whether another frame should be requested.
//!
//! # Re-entrancy
//!
//! Callbacks receive the host context and `&mut Scheduler`, so they may
//! schedule and cancel freely. The due set is snapshotted before the
//! first callback of a tick runs:
//!
//! - an event scheduled during the tick (even with duration 0) waits for
//!   the next tick;
//! - an event cancelled by an earlier callback of the same tick does not
//!   fire.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tapedeck_core::{ConfigError, EventId, TickId};
use web_time::Instant;

use crate::config::SchedulerConfig;
use crate::metrics::SchedulerMetrics;
use crate::queue::EventQueue;
use crate::throttle::FrameThrottle;

/// A scheduled callback.
///
/// Receives the host context and the scheduler that fired it.
pub type Callback<C> = Box<dyn FnOnce(&mut C, &mut Scheduler<C>)>;

// ── Epoch ────────────────────────────────────────────────────────

/// Remembers which reset generation of a [`Scheduler`] it was taken in.
///
/// Event ids restart at 0 after [`Scheduler::reset`], so an id held across
/// a reset may name somebody else's event. Keep an `Epoch` next to the id
/// and only trust the id while [`is_current`](Epoch::is_current) holds.
#[derive(Clone)]
pub struct Epoch {
    taken: u64,
    counter: Rc<Cell<u64>>,
}

impl Epoch {
    /// Whether the scheduler has not been reset since this was taken.
    pub fn is_current(&self) -> bool {
        self.counter.get() == self.taken
    }

    /// The generation this epoch was taken in.
    pub fn generation(&self) -> u64 {
        self.taken
    }
}

impl fmt::Debug for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Epoch")
            .field("taken", &self.taken)
            .field("current", &self.counter.get())
            .finish()
    }
}

// ── TickReport ───────────────────────────────────────────────────

/// Outcome of one processed tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    /// The tick whose events were fired.
    pub tick: TickId,
    /// Number of callbacks fired.
    pub fired: usize,
    /// Whether the throttle stretched the period on this tick.
    pub throttled: bool,
    /// Tick period after this tick, in milliseconds.
    pub tick_period_ms: f64,
    /// Whether the scheduler is still started and the host should
    /// request another frame.
    pub request_frame: bool,
}

// ── Scheduler ────────────────────────────────────────────────────

/// Virtual clock plus pending callbacks for a host context `C`.
pub struct Scheduler<C> {
    config: SchedulerConfig,
    queue: EventQueue<Callback<C>>,
    current_tick: TickId,
    next_event: u64,
    started: bool,
    throttle: FrameThrottle,
    firing: Option<EventId>,
    last_frame: Option<Instant>,
    /// Bumped by `reset()`. Shared with every [`Epoch`] handed out.
    generation: Rc<Cell<u64>>,
    metrics: SchedulerMetrics,
}

impl<C> Scheduler<C> {
    /// Create a stopped scheduler at tick 0.
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let throttle = FrameThrottle::new(&config.throttle);
        Ok(Self {
            config,
            queue: EventQueue::new(),
            current_tick: TickId(0),
            next_event: 0,
            started: false,
            throttle,
            firing: None,
            last_frame: None,
            generation: Rc::new(Cell::new(0)),
            metrics: SchedulerMetrics::default(),
        })
    }

    /// Number of ticks a duration spans at the current period, rounded up.
    pub fn ticks_for(&self, duration_ms: u64) -> u64 {
        if duration_ms == 0 {
            return 0;
        }
        (duration_ms as f64 / self.throttle.period_ms()).ceil() as u64
    }

    /// Schedule `callback` to run `duration_ms` from now.
    ///
    /// The event is due at `current_tick + ceil(duration_ms / period)`.
    /// A zero duration fires on the next tick advance, never inline.
    pub fn schedule<F>(&mut self, duration_ms: u64, callback: F) -> EventId
    where
        F: FnOnce(&mut C, &mut Scheduler<C>) + 'static,
    {
        let id = EventId(self.next_event);
        self.next_event += 1;
        let due = self.current_tick.after(self.ticks_for(duration_ms));
        self.queue.insert(due, id, Box::new(callback));
        self.metrics.events_scheduled += 1;
        tracing::trace!(event = %id, due = %due, duration_ms, "event scheduled");
        id
    }

    /// Cancel a pending event.
    ///
    /// Returns `true` if the event was pending. Unknown or already-fired
    /// ids are ignored. Once this returns the callback will not run.
    pub fn cancel(&mut self, id: EventId) -> bool {
        if self.queue.remove(id).is_none() {
            return false;
        }
        self.metrics.events_cancelled += 1;
        tracing::trace!(event = %id, "event cancelled");
        true
    }

    /// Resume tick advancement.
    pub fn start(&mut self) {
        if !self.started {
            self.started = true;
            // The gap while stopped is not a frame overrun.
            self.last_frame = None;
        }
    }

    /// Halt tick advancement. Pending events are kept and fire after
    /// [`start()`](Self::start).
    pub fn stop(&mut self) {
        self.started = false;
    }

    /// Stop, drop all pending events, rewind to tick 0, restore the
    /// fastest tick period, and restart event id allocation.
    pub fn reset(&mut self) {
        self.started = false;
        self.queue.clear();
        self.current_tick = TickId(0);
        self.next_event = 0;
        self.throttle.reset();
        self.firing = None;
        self.last_frame = None;
        self.generation.set(self.generation.get() + 1);
        self.metrics = SchedulerMetrics::default();
        tracing::debug!("scheduler reset");
    }

    /// Whether tick advancement is halted.
    pub fn is_stopped(&self) -> bool {
        !self.started
    }

    /// Process one host frame observed at `now`.
    ///
    /// The frame duration is measured from the previous frame; the first
    /// frame after construction, `start()` or `reset()` counts as
    /// on-time.
    pub fn frame(&mut self, ctx: &mut C, now: Instant) -> Option<TickReport> {
        if !self.started {
            return None;
        }
        let frame_time = match self.last_frame {
            Some(prev) => now.saturating_duration_since(prev),
            None => Duration::from_secs_f64(self.throttle.period_ms() / 1000.0),
        };
        self.last_frame = Some(now);
        self.tick(ctx, frame_time)
    }

    /// Process one tick with an explicitly measured frame duration.
    ///
    /// Returns `None` without doing anything while stopped.
    pub fn tick(&mut self, ctx: &mut C, frame_time: Duration) -> Option<TickReport> {
        if !self.started {
            return None;
        }
        let tick = self.current_tick;
        let generation = self.generation.get();

        // 1. Throttle.
        self.metrics.last_frame_us = frame_time.as_micros().min(u64::MAX as u128) as u64;
        let throttled = self.throttle.record_frame(frame_time.as_secs_f64() * 1000.0);

        // 2. Fire everything due, snapshot first.
        let due = self.queue.due_ids(tick);
        let mut fired = 0;
        for id in due {
            if self.generation.get() != generation || !self.started {
                break;
            }
            let Some(callback) = self.queue.remove(id) else {
                continue;
            };
            self.firing = Some(id);
            tracing::trace!(event = %id, tick = %tick, "event fired");
            callback(ctx, self);
            self.firing = None;
            fired += 1;
        }
        if self.generation.get() != generation {
            // Reset from inside a callback; the clock already restarted.
            return Some(self.report(tick, fired, throttled));
        }

        // 3. Advance.
        self.current_tick = tick.after(1);
        self.metrics.ticks += 1;
        self.metrics.events_fired += fired as u64;
        self.metrics.overrun_frames = self.throttle.overrun_frames();
        self.metrics.slowdowns = self.throttle.slowdowns();

        // 4. Tell the host whether to keep requesting frames.
        Some(self.report(tick, fired, throttled))
    }

    fn report(&self, tick: TickId, fired: usize, throttled: bool) -> TickReport {
        TickReport {
            tick,
            fired,
            throttled,
            tick_period_ms: self.throttle.period_ms(),
            request_frame: self.started,
        }
    }

    /// The tick the next call to [`tick()`](Self::tick) will process.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Current tick period in milliseconds.
    pub fn tick_period_ms(&self) -> f64 {
        self.throttle.period_ms()
    }

    /// Number of resets so far.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// A handle that stops being current at the next
    /// [`reset()`](Self::reset).
    pub fn epoch(&self) -> Epoch {
        Epoch {
            taken: self.generation.get(),
            counter: Rc::clone(&self.generation),
        }
    }

    /// Id of the callback currently executing, if any.
    pub fn firing(&self) -> Option<EventId> {
        self.firing
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: EventId) -> bool {
        self.queue.contains(id)
    }

    /// Tick at which `id` is due, if pending.
    pub fn due_tick(&self, id: EventId) -> Option<TickId> {
        self.queue.due_tick(id)
    }

    /// Earliest due tick among pending events.
    pub fn next_due(&self) -> Option<TickId> {
        self.queue.next_due()
    }

    /// Number of pending events.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> &SchedulerMetrics {
        &self.metrics
    }

    /// The throttle state.
    pub fn throttle(&self) -> &FrameThrottle {
        &self.throttle
    }

    /// The validated configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("current_tick", &self.current_tick)
            .field("started", &self.started)
            .field("pending", &self.queue.len())
            .field("tick_period_ms", &self.throttle.period_ms())
            .field("firing", &self.firing)
            .field("generation", &self.generation.get())
            .finish()
    }
}
