//! A scheduler and a simulator bundled for headless hosts.

use std::time::Duration;

use tapedeck_core::ConfigError;
use tapedeck_sched::{Scheduler, SchedulerConfig, TickReport};

use crate::config::SimulatorConfig;
use crate::program::Program;
use crate::simulator::{Busy, OnDone, RunReport, Simulator};
use crate::tape::Tape;

/// Owns a [`Scheduler`] whose context is a [`Simulator`].
///
/// ```
/// use std::time::Duration;
/// use tapedeck_machine::{Machine, Program, SimulatorConfig, Tape};
/// use tapedeck_sched::SchedulerConfig;
///
/// let mut machine = Machine::new(SchedulerConfig::default(), SimulatorConfig::default()).unwrap();
/// machine.run(Program::parse(&["1 R 1"]).unwrap(), Tape::new(), None).unwrap();
/// let report = machine
///     .run_to_completion(Duration::from_millis(16), 10_000)
///     .unwrap();
/// assert_eq!(report.tape.render(0..=1), "11");
/// ```
#[derive(Debug)]
pub struct Machine {
    scheduler: Scheduler<Simulator>,
    simulator: Simulator,
}

impl Machine {
    /// Validate both configurations and build an idle machine.
    pub fn new(scheduler: SchedulerConfig, simulator: SimulatorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            scheduler: Scheduler::new(scheduler)?,
            simulator: Simulator::new(simulator)?,
        })
    }

    /// Start a run and the scheduler clock.
    pub fn run(&mut self, program: Program, tape: Tape, on_done: Option<OnDone>) -> Result<(), Busy> {
        self.simulator.run(&mut self.scheduler, program, tape, on_done)?;
        self.scheduler.start();
        Ok(())
    }

    /// Suspend the run.
    pub fn pause(&mut self) {
        self.simulator.pause(&mut self.scheduler);
    }

    /// Continue a paused run.
    pub fn resume_if_paused(&mut self) {
        self.simulator.resume_if_paused(&mut self.scheduler);
    }

    /// End the run.
    pub fn stop(&mut self) {
        self.simulator.stop(&mut self.scheduler);
    }

    /// Advance one tick.
    pub fn tick(&mut self, frame_time: Duration) -> Option<TickReport> {
        self.scheduler.tick(&mut self.simulator, frame_time)
    }

    /// Tick until the run ends or `max_ticks` ticks have passed.
    ///
    /// Returns the report kept by the simulator, which is `None` if the
    /// run is still going or was started with a continuation.
    pub fn run_to_completion(&mut self, frame_time: Duration, max_ticks: u64) -> Option<RunReport> {
        for _ in 0..max_ticks {
            if !self.simulator.is_running() {
                break;
            }
            self.tick(frame_time);
        }
        self.simulator.take_report()
    }

    /// The simulator.
    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// The simulator, for speed and step-limit changes.
    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.simulator
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &Scheduler<Simulator> {
        &self.scheduler
    }

    /// Split borrow of both halves, for hosts that drive the scheduler
    /// themselves (e.g. with a [`FrameDriver`](tapedeck_sched::FrameDriver)).
    pub fn parts_mut(&mut self) -> (&mut Scheduler<Simulator>, &mut Simulator) {
        (&mut self.scheduler, &mut self.simulator)
    }
}
