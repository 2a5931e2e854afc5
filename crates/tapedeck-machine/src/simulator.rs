//! The interpreter.
//!
//! A [`Simulator`] executes one operation per scheduled step. Each step
//! reschedules the next one through the [`Scheduler`] with a delay taken
//! from the active speed profile, so program time is measured entirely in
//! scheduler ticks.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ── run ──▶ Running ──▶ Halted   (ran off the board / step limit)
//!                  │  ▲   └──▶ Stopped  (stop, or a new run replacing a paused one)
//!            pause │  │ resume_if_paused
//!                  ▼  │
//!                 Paused
//! ```
//!
//! At most one step event is pending at any time. Every step checks that
//! the event being fired is the one it scheduled, so a step that survived
//! a `stop()` or `pause()` does nothing.
//!
//! A [`Scheduler::reset`] drops the pending step. The run keeps its
//! program and tape and reads as [`RunState::Paused`] until it is resumed,
//! stopped or replaced. The stale event id is never cancelled, since the
//! reset scheduler may have handed it to another event.
//!
//! # Host integration
//!
//! The scheduler's context type must implement [`StepHost`] so a step
//! callback can find the simulator. `Simulator` implements it for itself,
//! which is what [`Machine`](crate::Machine) uses; hosts that keep the
//! simulator inside a larger struct implement it there.

use std::fmt;

use indexmap::IndexMap;
use tapedeck_core::{ConfigError, EventId, Op, Position, Speed, Symbol};
use tapedeck_sched::{Epoch, Scheduler};

use crate::config::SimulatorConfig;
use crate::presenter::{Highlight, NullPresenter, Presenter, VisualTiming};
use crate::program::Program;
use crate::tape::{Direction, Tape};

/// Completion continuation for a run.
pub type OnDone = Box<dyn FnOnce(RunReport)>;

/// Gives a scheduled step mutable access to the simulator it belongs to.
pub trait StepHost {
    /// The simulator driven by this host's scheduler.
    fn simulator_mut(&mut self) -> &mut Simulator;
}

impl StepHost for Simulator {
    fn simulator_mut(&mut self) -> &mut Simulator {
        self
    }
}

/// Observable lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    /// No run has been started.
    Idle,
    /// A run is in flight.
    Running,
    /// A run is suspended and will continue on resume.
    Paused,
    /// The last run ended on its own.
    Halted,
    /// The last run was stopped by the caller.
    Stopped,
}

/// Everything a finished run hands back.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// The program, positions as they were when the run ended.
    pub program: Program,
    /// The tape after the last executed step.
    pub tape: Tape,
    /// Steps executed.
    pub steps: u64,
    /// Speed in effect at the end, including any loop acceleration.
    pub speed: Speed,
}

/// Returned by [`Simulator::run`] when a run is already in flight.
///
/// Carries back the program and tape that were not started.
#[derive(Debug)]
pub struct Busy {
    /// The rejected program.
    pub program: Program,
    /// The rejected tape.
    pub tape: Tape,
}

impl fmt::Display for Busy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a run is already in flight")
    }
}

impl std::error::Error for Busy {}

struct ActiveRun {
    program: Program,
    tape: Tape,
    on_done: Option<OnDone>,
    visits: IndexMap<Position, u32>,
    floor: Option<Speed>,
    highlighted: Option<Position>,
}

/// The step event this simulator is waiting for.
#[derive(Debug)]
struct PendingStep {
    id: EventId,
    epoch: Epoch,
}

fn effective_speed(chosen: Speed, floor: Option<Speed>) -> Speed {
    floor.map_or(chosen, |f| chosen.max(f))
}

/// Take the branch to `(track, index)` if the head reads `when` (or
/// unconditionally). Returns whether the implicit step still applies.
fn branch(run: &mut ActiveRun, when: Option<Symbol>, track: i64, index: i64) -> bool {
    if when.map_or(true, |s| run.tape.current_symbol() == s) {
        run.program.set_next_position(track, index);
        false
    } else {
        true
    }
}

// ── Simulator ────────────────────────────────────────────────────

/// Steps a [`Program`] against a [`Tape`] through a [`Scheduler`].
pub struct Simulator {
    config: SimulatorConfig,
    presenter: Box<dyn Presenter>,
    run: Option<ActiveRun>,
    pending: Option<PendingStep>,
    paused: bool,
    speed: Speed,
    step_limit: u64,
    step_count: u64,
    last_outcome: RunState,
    report: Option<RunReport>,
}

impl Simulator {
    /// Create an idle simulator with a [`NullPresenter`].
    pub fn new(config: SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            speed: config.speed,
            step_limit: config.step_limit,
            config,
            presenter: Box::new(NullPresenter),
            run: None,
            pending: None,
            paused: false,
            step_count: 0,
            last_outcome: RunState::Idle,
            report: None,
        })
    }

    /// Replace the presenter. Builder form.
    pub fn with_presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.set_presenter(presenter);
        self
    }

    /// Replace the presenter.
    pub fn set_presenter(&mut self, presenter: impl Presenter + 'static) {
        self.presenter = Box::new(presenter);
    }

    /// Start executing `program` against `tape` from slot `(0, 0)`.
    ///
    /// The first step is scheduled with zero delay. A paused run that
    /// still holds a program is finished first, so its continuation
    /// fires before this one starts. If a step is already pending the
    /// call is rejected and the inputs are returned in [`Busy`].
    ///
    /// `on_done` receives the [`RunReport`] exactly once. Without it the
    /// report is kept for [`take_report()`](Self::take_report).
    pub fn run<C: StepHost + 'static>(
        &mut self,
        sched: &mut Scheduler<C>,
        mut program: Program,
        tape: Tape,
        on_done: Option<OnDone>,
    ) -> Result<(), Busy> {
        if self.is_running() {
            tracing::debug!("run rejected, a step is already pending");
            return Err(Busy { program, tape });
        }
        if self.run.is_some() {
            self.finish(sched, RunState::Stopped);
        }

        program.set_next_position(0, 0);
        tracing::debug!(
            tracks = program.track_count(),
            ops_per_track = program.ops_per_track(),
            speed = %self.speed,
            step_limit = self.step_limit,
            "run started"
        );
        self.step_count = 0;
        self.paused = false;
        self.report = None;
        self.run = Some(ActiveRun {
            program,
            tape,
            on_done,
            visits: IndexMap::new(),
            floor: None,
            highlighted: None,
        });
        self.schedule_step(sched, 0);
        Ok(())
    }

    fn schedule_step<C: StepHost + 'static>(&mut self, sched: &mut Scheduler<C>, delay_ms: u64) {
        let id = sched.schedule(delay_ms, |host: &mut C, sched: &mut Scheduler<C>| {
            host.simulator_mut().step(sched);
        });
        self.pending = Some(PendingStep {
            id,
            epoch: sched.epoch(),
        });
    }

    /// Execute one operation and schedule the next step.
    ///
    /// Only acts when called from the scheduler for the step this
    /// simulator scheduled; any other call is logged and ignored.
    pub fn step<C: StepHost + 'static>(&mut self, sched: &mut Scheduler<C>) {
        let pending = self.pending_step();
        if pending.is_none() || sched.firing() != pending {
            tracing::warn!(firing = ?sched.firing(), ?pending, "ignoring stray step");
            return;
        }
        self.pending = None;
        let Some(run) = self.run.as_mut() else {
            return;
        };

        run.program.advance_to_next();
        let position = run.program.current();
        let over_limit = self.step_limit > 0 && self.step_count >= self.step_limit;
        if run.program.is_next_end() || over_limit {
            tracing::debug!(steps = self.step_count, %position, over_limit, "run halted");
            self.presenter.instruction_dimmed(position);
            self.presenter.halted(self.step_count);
            self.finish(sched, RunState::Halted);
            return;
        }

        // Boring-loop accelerator.
        if self.step_limit > 0 {
            let visits = run.visits.entry(position).or_insert(0);
            *visits = visits.saturating_add(1);
            if let Some(floor) = self.config.boring_loop.floor_for(*visits) {
                let before = effective_speed(self.speed, run.floor);
                run.floor = Some(run.floor.map_or(floor, |f| f.max(floor)));
                let after = effective_speed(self.speed, run.floor);
                if after != before {
                    tracing::debug!(%position, visits = *visits, speed = %after, "loop accelerated");
                    self.presenter.speed_forced(after);
                }
            }
        }

        self.step_count += 1;
        let speed = effective_speed(self.speed, run.floor);
        self.presenter.instruction_changed(Highlight {
            previous: run.highlighted.replace(position),
            position,
            speed,
        });

        let code = run.program.current_operation();
        let category = code.category();
        let op = code.decode();
        let profile = speed.profile();
        let timing = VisualTiming::split(profile.tape_time_ms);
        let (track, index) = (i64::from(position.track), i64::from(position.index));

        let implicit_step = match op {
            Op::Print(symbol) => {
                run.tape.print(symbol);
                self.presenter.tape_written(run.tape.head(), symbol, timing);
                true
            }
            Op::Left => {
                run.tape.move_left();
                self.presenter.head_moved(run.tape.head(), Direction::Left, timing);
                true
            }
            Op::Right => {
                run.tape.move_right();
                self.presenter.head_moved(run.tape.head(), Direction::Right, timing);
                true
            }
            Op::Back(n) => {
                run.program.set_next_position(track, index - i64::from(n));
                false
            }
            Op::Down(when) => branch(run, when, track + 1, index),
            Op::Up(when) => branch(run, when, track - 1, index),
            Op::Noop | Op::Unknown => true,
        };
        if implicit_step {
            run.program.set_next_position(track, index + 1);
        }

        let delay_ms = profile.step_delay_ms(category);
        tracing::trace!(step = self.step_count, %position, ?op, delay_ms, "step");
        self.schedule_step(sched, delay_ms);
    }

    /// Cancel the pending step if it still belongs to the scheduler's
    /// current generation.
    fn cancel_pending<C>(&mut self, sched: &mut Scheduler<C>) {
        match self.pending.take() {
            Some(step) if step.epoch.is_current() => {
                sched.cancel(step.id);
            }
            Some(step) => {
                tracing::debug!(event = %step.id, "pending step lost to a scheduler reset");
            }
            None => {}
        }
    }

    fn finish<C>(&mut self, sched: &mut Scheduler<C>, outcome: RunState) {
        self.cancel_pending(sched);
        self.paused = false;
        let Some(run) = self.run.take() else {
            return;
        };
        self.last_outcome = outcome;
        let report = RunReport {
            program: run.program,
            tape: run.tape,
            steps: self.step_count,
            speed: effective_speed(self.speed, run.floor),
        };
        tracing::debug!(steps = report.steps, ?outcome, "run finished");
        match run.on_done {
            Some(on_done) => on_done(report),
            None => self.report = Some(report),
        }
    }

    /// End the run: cancel the pending step, release the program and tape
    /// and deliver the [`RunReport`]. Safe to call at any time.
    pub fn stop<C>(&mut self, sched: &mut Scheduler<C>) {
        self.finish(sched, RunState::Stopped);
    }

    /// Cancel the pending step, keeping all run state.
    ///
    /// Does nothing without an active run.
    pub fn pause<C>(&mut self, sched: &mut Scheduler<C>) {
        if self.run.is_none() {
            return;
        }
        self.cancel_pending(sched);
        self.paused = true;
        tracing::debug!(steps = self.step_count, "run paused");
    }

    /// Reschedule the next step with zero delay if paused, or if a
    /// scheduler reset dropped it. Always clears the paused flag.
    pub fn resume_if_paused<C: StepHost + 'static>(&mut self, sched: &mut Scheduler<C>) {
        self.paused = false;
        if self.run.is_some() && !self.is_running() {
            tracing::debug!(steps = self.step_count, "run resumed");
            self.schedule_step(sched, 0);
        }
    }

    /// Whether a step event is pending.
    pub fn is_running(&self) -> bool {
        self.pending_step().is_some()
    }

    /// Whether the run is suspended by [`pause()`](Self::pause) or
    /// stranded by a scheduler reset.
    pub fn is_paused(&self) -> bool {
        self.run.is_some() && (self.paused || !self.is_running())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        match &self.run {
            Some(_) if self.is_paused() => RunState::Paused,
            Some(_) => RunState::Running,
            None => self.last_outcome,
        }
    }

    /// Id of the pending step event, if any.
    pub fn pending_step(&self) -> Option<EventId> {
        self.pending
            .as_ref()
            .filter(|step| step.epoch.is_current())
            .map(|step| step.id)
    }

    /// Cap the number of executed steps per run; 0 removes the cap.
    ///
    /// A limit of N executes exactly N steps; the run halts when step
    /// N + 1 comes due.
    pub fn set_step_limit(&mut self, limit: u64) {
        self.step_limit = limit;
    }

    /// The step cap; 0 when unlimited.
    pub fn step_limit(&self) -> u64 {
        self.step_limit
    }

    /// Whether a step cap is set.
    pub fn has_step_limit(&self) -> bool {
        self.step_limit != 0
    }

    /// Choose the speed preset. The next scheduled step uses it; loop
    /// acceleration may still hold the run at a faster one.
    pub fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Speed in effect, including loop acceleration.
    pub fn speed(&self) -> Speed {
        effective_speed(self.speed, self.run.as_ref().and_then(|r| r.floor))
    }

    /// Steps executed by the current or last run.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// The running program.
    pub fn program(&self) -> Option<&Program> {
        self.run.as_ref().map(|r| &r.program)
    }

    /// The running tape.
    pub fn tape(&self) -> Option<&Tape> {
        self.run.as_ref().map(|r| &r.tape)
    }

    /// Take the report of the last run started without a continuation.
    pub fn take_report(&mut self) -> Option<RunReport> {
        self.report.take()
    }

    /// The validated configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("state", &self.state())
            .field("pending", &self.pending_step())
            .field("speed", &self.speed())
            .field("step_count", &self.step_count)
            .field("step_limit", &self.step_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    use tapedeck_core::TickId;
    use tapedeck_sched::SchedulerConfig;

    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn harness(step_limit: u64) -> (Scheduler<Simulator>, Simulator) {
        let mut sched = Scheduler::new(SchedulerConfig::default()).unwrap();
        sched.start();
        let sim = Simulator::new(SimulatorConfig {
            step_limit,
            ..SimulatorConfig::default()
        })
        .unwrap();
        (sched, sim)
    }

    fn drive(sched: &mut Scheduler<Simulator>, sim: &mut Simulator, max_ticks: usize) {
        for _ in 0..max_ticks {
            if !sim.is_running() {
                break;
            }
            sched.tick(sim, FRAME);
        }
    }

    fn counter() -> (Rc<Cell<u32>>, OnDone) {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        (calls, Box::new(move |_: RunReport| seen.set(seen.get() + 1)))
    }

    struct Highlights(Rc<RefCell<Vec<Highlight>>>);

    impl Presenter for Highlights {
        fn instruction_changed(&mut self, highlight: Highlight) {
            self.0.borrow_mut().push(highlight);
        }
    }

    #[test]
    fn binary_increment_halts_off_the_board() {
        let (mut sched, mut sim) = harness(0);
        sim.set_speed(Speed::Ludicrous);
        let program = Program::parse(&["D1 1 B9 B3", "0 L . U"]).unwrap();
        let tape = Tape::parse(-1, "11").unwrap();
        sim.run(&mut sched, program, tape, None).unwrap();
        drive(&mut sched, &mut sim, 10_000);

        assert_eq!(sim.state(), RunState::Halted);
        let report = sim.take_report().expect("report kept without continuation");
        assert_eq!(report.steps, 15);
        assert_eq!(report.tape.render(-2..=0), "100");
        assert_eq!(report.tape.head(), -2);
        assert_eq!(report.program.current(), Position::new(0, 2));
        assert!(report.program.is_next_end());
    }

    #[test]
    fn first_step_fires_on_the_next_tick() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["D1 1"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        let first = sim.pending_step().unwrap();
        assert_eq!(sched.due_tick(first), Some(TickId(0)));

        sched.tick(&mut sim, FRAME);
        assert_eq!(sim.step_count(), 1);
        // D1 on a blank cell: branch delay, falls through to slot 1.
        let second = sim.pending_step().unwrap();
        let branch_ms = Speed::Normal.profile().branch_time_ms;
        assert_eq!(sched.due_tick(second), Some(TickId(sched.ticks_for(branch_ms))));
        assert_eq!(sim.program().unwrap().next(), Position::new(0, 1));
    }

    #[test]
    fn delay_follows_op_category() {
        let (mut sched, mut sim) = harness(0);
        sim.set_speed(Speed::Slow);
        let program = Program::parse(&[". 1 R"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        let profile = Speed::Slow.profile();

        sched.tick(&mut sim, FRAME);
        let mut fired_at = 0;
        for (step, ms) in [
            (1, profile.empty_step_time_ms),
            (2, profile.step_time_ms),
            (3, profile.step_time_ms),
        ] {
            assert_eq!(sim.step_count(), step);
            let due = sched.due_tick(sim.pending_step().unwrap()).unwrap();
            assert_eq!(due.0, fired_at + sched.ticks_for(ms));
            while sched.current_tick() <= due {
                sched.tick(&mut sim, FRAME);
            }
            fired_at = due.0;
        }
    }

    #[test]
    fn stray_step_is_ignored() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["1 1 1"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        sim.step(&mut sched);
        assert_eq!(sim.step_count(), 0);
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn stop_is_idempotent_and_reports_once() {
        let (mut sched, mut sim) = harness(0);
        let (calls, on_done) = counter();
        let program = Program::parse(&["1 R 1 R"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), Some(on_done)).unwrap();
        sched.tick(&mut sim, FRAME);
        sim.stop(&mut sched);
        sim.stop(&mut sched);
        assert_eq!(calls.get(), 1);
        assert_eq!(sim.state(), RunState::Stopped);
        assert!(!sim.is_running());
        assert!(sim.program().is_none());
        assert_eq!(sched.pending_count(), 0);
        assert!(sim.take_report().is_none(), "continuation consumed the report");
    }

    #[test]
    fn run_while_running_is_rejected() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["1"]).unwrap();
        sim.run(&mut sched, program.clone(), Tape::new(), None).unwrap();
        let busy = sim
            .run(&mut sched, program.clone(), Tape::parse(0, "0").unwrap(), None)
            .unwrap_err();
        assert_eq!(busy.program, program);
        assert_eq!(busy.tape.read(0), Symbol::Zero);
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn pause_and_resume() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["1 1 1 1"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        sched.tick(&mut sim, FRAME);
        sim.pause(&mut sched);
        assert!(sim.is_paused());
        assert!(!sim.is_running());
        assert_eq!(sim.state(), RunState::Paused);
        assert_eq!(sched.pending_count(), 0);

        for _ in 0..200 {
            sched.tick(&mut sim, FRAME);
        }
        assert_eq!(sim.step_count(), 1);

        sim.resume_if_paused(&mut sched);
        sim.resume_if_paused(&mut sched);
        assert_eq!(sched.pending_count(), 1);
        drive(&mut sched, &mut sim, 10_000);
        assert_eq!(sim.state(), RunState::Halted);
        assert_eq!(sim.take_report().unwrap().steps, 4);
    }

    #[test]
    fn resume_without_pause_is_noop() {
        let (mut sched, mut sim) = harness(0);
        sim.resume_if_paused(&mut sched);
        sim.pause(&mut sched);
        assert!(!sim.is_paused());
        assert_eq!(sim.state(), RunState::Idle);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn scheduler_reset_releases_the_pending_step() {
        let (mut sched, mut sim) = harness(0);
        let (calls, on_done) = counter();
        let program = Program::parse(&["1 1 1 1"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), Some(on_done)).unwrap();
        sched.tick(&mut sim, FRAME);
        sched.reset();
        sched.start();
        assert!(!sim.is_running());
        assert_eq!(sim.pending_step(), None);
        assert_eq!(sim.state(), RunState::Paused);

        // Ids restart at 0, so these reuse the numbers of the dropped steps.
        let fired = Rc::new(Cell::new(0));
        for _ in 0..2 {
            let seen = Rc::clone(&fired);
            sched.schedule(0, move |_: &mut Simulator, _| seen.set(seen.get() + 1));
        }

        let program = Program::parse(&["1"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        assert_eq!(calls.get(), 1, "stranded run reported when replaced");
        assert!(sim.is_running());
        sim.stop(&mut sched);
        sched.tick(&mut sim, FRAME);
        assert_eq!(fired.get(), 2);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn stranded_run_resumes_after_reset() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["1 R 1 R"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        sched.tick(&mut sim, FRAME);
        sched.reset();
        sched.start();

        let seen = Rc::new(Cell::new(false));
        let flag = Rc::clone(&seen);
        sched.schedule(0, move |_: &mut Simulator, _| flag.set(true));
        sim.pause(&mut sched);
        assert_eq!(sched.pending_count(), 1, "pause leaves the new event alone");

        sim.resume_if_paused(&mut sched);
        assert!(sim.is_running());
        assert!(!sim.is_paused());
        drive(&mut sched, &mut sim, 10_000);
        assert!(seen.get());
        let report = sim.take_report().unwrap();
        assert_eq!(report.steps, 4);
        assert_eq!(report.tape.render(0..=1), "11");
    }

    #[test]
    fn new_run_finishes_paused_run_first() {
        let (mut sched, mut sim) = harness(0);
        let (first_calls, first_done) = counter();
        let program = Program::parse(&["1 1"]).unwrap();
        sim.run(&mut sched, program.clone(), Tape::new(), Some(first_done)).unwrap();
        sim.pause(&mut sched);
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        assert_eq!(first_calls.get(), 1);
        assert!(sim.is_running());
        assert!(!sim.is_paused());
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn step_limit_caps_executed_steps() {
        let (mut sched, mut sim) = harness(40);
        let program = Program::parse(&["R R B2"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        drive(&mut sched, &mut sim, 100_000);
        let report = sim.take_report().unwrap();
        assert_eq!(report.steps, 40);
        assert_eq!(sim.state(), RunState::Halted);
    }

    #[test]
    fn loop_acceleration_never_reverts() {
        let (mut sched, mut sim) = harness(40);
        let seen = Rc::new(RefCell::new(Vec::new()));
        sim.set_presenter(Highlights(Rc::clone(&seen)));
        let program = Program::parse(&["0 R B2"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        drive(&mut sched, &mut sim, 100_000);

        let speeds: Vec<Speed> = seen.borrow().iter().map(|h| h.speed).collect();
        assert_eq!(speeds.len(), 40);
        // Slot (0, 0) runs on steps 1, 4, 7, ...: visit 5 is step 13,
        // visit 7 is step 19.
        assert!(speeds[..12].iter().all(|s| *s == Speed::Normal));
        assert!(speeds[12..18].iter().all(|s| *s == Speed::Fast));
        assert!(speeds[18..].iter().all(|s| *s == Speed::Ludicrous));
        assert_eq!(sim.take_report().unwrap().speed, Speed::Ludicrous);
    }

    #[test]
    fn no_acceleration_without_step_limit() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["0 R B2"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        for _ in 0..5_000 {
            sched.tick(&mut sim, FRAME);
        }
        assert!(sim.step_count() > 20);
        assert_eq!(sim.speed(), Speed::Normal);
        sim.stop(&mut sched);
    }

    #[test]
    fn empty_program_halts_without_steps() {
        let (mut sched, mut sim) = harness(0);
        let (calls, on_done) = counter();
        let program = Program::new(vec![vec![]]).unwrap();
        sim.run(&mut sched, program, Tape::new(), Some(on_done)).unwrap();
        drive(&mut sched, &mut sim, 10);
        assert_eq!(calls.get(), 1);
        assert_eq!(sim.step_count(), 0);
    }

    #[test]
    fn unknown_ops_fall_through() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["?? B1 *1"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        drive(&mut sched, &mut sim, 10_000);
        let report = sim.take_report().unwrap();
        assert_eq!(report.steps, 3);
        assert_eq!(report.tape.read(0), Symbol::One);
    }

    #[test]
    fn conditional_up_only_when_symbol_matches() {
        let (mut sched, mut sim) = harness(0);
        sim.set_speed(Speed::Ludicrous);
        // D, empty, U0 over a blank falls through, U_ jumps to (0, 2),
        // print 1, off the end.
        let program = Program::parse(&["D . 1", ". U0 U_"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        drive(&mut sched, &mut sim, 10_000);
        let report = sim.take_report().unwrap();
        assert_eq!(report.steps, 5);
        assert_eq!(report.tape.read(0), Symbol::One);
    }

    #[test]
    fn down_off_the_last_track_ends_the_run() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["D 1"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        drive(&mut sched, &mut sim, 10_000);
        let report = sim.take_report().unwrap();
        assert_eq!(report.steps, 1);
        assert_eq!(report.tape.read(0), Symbol::Blank);
    }

    #[test]
    fn set_speed_applies_to_next_delay() {
        let (mut sched, mut sim) = harness(0);
        let program = Program::parse(&["1 1 1"]).unwrap();
        sim.run(&mut sched, program, Tape::new(), None).unwrap();
        sim.set_speed(Speed::Fast);
        sched.tick(&mut sim, FRAME);
        let due = sched.due_tick(sim.pending_step().unwrap()).unwrap();
        assert_eq!(due, TickId(sched.ticks_for(Speed::Fast.profile().step_time_ms)));
    }
}
