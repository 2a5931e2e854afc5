//! Count upwards in binary on a real-time frame loop.
//!
//! Runs the two-track increment program repeatedly, printing the tape
//! after every write. Pass a speed name as the first argument
//! (`slow`, `tutorial`, `normal`, `fast`, `ludicrous`) and set
//! `RUST_LOG=tapedeck_machine=debug` to watch the interpreter.

use std::error::Error;

use tapedeck_core::{Speed, Symbol};
use tapedeck_machine::{Machine, Presenter, Program, SimulatorConfig, Tape, VisualTiming};
use tapedeck_sched::{FrameDriver, SchedulerConfig};
use tracing_subscriber::EnvFilter;

struct TapePrinter;

impl Presenter for TapePrinter {
    fn tape_written(&mut self, head: i64, symbol: Symbol, _timing: VisualTiming) {
        println!("  write {symbol} at {head}");
    }

    fn halted(&mut self, steps: u64) {
        println!("  halted after {steps} steps");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let speed = match std::env::args().nth(1) {
        Some(name) => name.parse::<Speed>()?,
        None => Speed::Fast,
    };
    println!("=== tapedeck binary counter ({speed}) ===\n");

    let mut machine = Machine::new(
        SchedulerConfig::default(),
        SimulatorConfig {
            speed,
            ..SimulatorConfig::default()
        },
    )?;
    machine.simulator_mut().set_presenter(TapePrinter);

    let increment = Program::parse(&["D1 1 B9 B3", "0 L . U"])?;
    let mut tape = Tape::new();

    for n in 1..=8 {
        machine.run(increment.clone(), tape, None)?;
        let (sched, sim) = machine.parts_mut();
        let driver = FrameDriver::for_scheduler(sched);
        let frames = driver.run_until(sched, sim, |sim| !sim.is_running());

        let Some(report) = machine.simulator_mut().take_report() else {
            return Err("run ended without a report".into());
        };
        println!(
            "{n}: {} ({} steps, {} frames)",
            report.tape.render(report.tape.written_range()),
            report.steps,
            frames.frames
        );
        tape = report.tape.with_head(0);
    }
    Ok(())
}
