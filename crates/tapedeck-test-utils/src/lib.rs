//! Test utilities for tapedeck development.
//!
//! Provides a [`RecordingPresenter`] that logs every visual transition,
//! helpers that drive a scheduler with a fixed frame time, and program
//! fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tapedeck_core::{Position, Speed, Symbol};
use tapedeck_machine::{
    Direction, Highlight, OnDone, Presenter, RunReport, Simulator, SimulatorConfig, VisualTiming,
};
use tapedeck_sched::{Scheduler, SchedulerConfig};

/// One frame at the default 60 Hz rate, rounded down so the throttle
/// never sees an overrun.
pub const FRAME: Duration = Duration::from_millis(16);

/// A presenter call, as recorded by [`RecordingPresenter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresenterEvent {
    Highlight(Highlight),
    Dimmed(Position),
    Written {
        head: i64,
        symbol: Symbol,
        timing: VisualTiming,
    },
    Moved {
        head: i64,
        direction: Direction,
        timing: VisualTiming,
    },
    SpeedForced(Speed),
    Halted(u64),
}

/// Shared log of presenter calls.
pub type EventLog = Rc<RefCell<Vec<PresenterEvent>>>;

/// Presenter that appends every call to a shared [`EventLog`].
///
/// Clone the log with [`log()`](RecordingPresenter::log) before handing
/// the presenter to a simulator.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    log: EventLog,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> EventLog {
        Rc::clone(&self.log)
    }
}

impl Presenter for RecordingPresenter {
    fn instruction_changed(&mut self, highlight: Highlight) {
        self.log.borrow_mut().push(PresenterEvent::Highlight(highlight));
    }

    fn instruction_dimmed(&mut self, position: Position) {
        self.log.borrow_mut().push(PresenterEvent::Dimmed(position));
    }

    fn tape_written(&mut self, head: i64, symbol: Symbol, timing: VisualTiming) {
        self.log.borrow_mut().push(PresenterEvent::Written {
            head,
            symbol,
            timing,
        });
    }

    fn head_moved(&mut self, head: i64, direction: Direction, timing: VisualTiming) {
        self.log.borrow_mut().push(PresenterEvent::Moved {
            head,
            direction,
            timing,
        });
    }

    fn speed_forced(&mut self, speed: Speed) {
        self.log.borrow_mut().push(PresenterEvent::SpeedForced(speed));
    }

    fn halted(&mut self, steps: u64) {
        self.log.borrow_mut().push(PresenterEvent::Halted(steps));
    }
}

/// Positions highlighted so far, in order.
pub fn highlighted_positions(log: &EventLog) -> Vec<Position> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            PresenterEvent::Highlight(h) => Some(h.position),
            _ => None,
        })
        .collect()
}

/// A started scheduler and a simulator recording into the returned log.
pub fn recording_harness(step_limit: u64) -> (Scheduler<Simulator>, Simulator, EventLog) {
    let mut sched = Scheduler::new(SchedulerConfig::default()).expect("default scheduler config");
    sched.start();
    let presenter = RecordingPresenter::new();
    let log = presenter.log();
    let sim = Simulator::new(SimulatorConfig {
        step_limit,
        ..SimulatorConfig::default()
    })
    .expect("default simulator config")
    .with_presenter(presenter);
    (sched, sim, log)
}

/// Tick with [`FRAME`] until the simulator has no pending step or
/// `max_ticks` have passed. Returns the ticks processed.
pub fn drive(sched: &mut Scheduler<Simulator>, sim: &mut Simulator, max_ticks: u64) -> u64 {
    let mut ticks = 0;
    while ticks < max_ticks && sim.is_running() {
        sched.tick(sim, FRAME);
        ticks += 1;
    }
    ticks
}

/// Continuation that appends each report it receives to a shared list.
pub fn capture_report() -> (Rc<RefCell<Vec<RunReport>>>, OnDone) {
    let reports = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reports);
    (reports, Box::new(move |report: RunReport| sink.borrow_mut().push(report)))
}
