//! Benchmark profiles for the tapedeck scheduler and interpreter.
//!
//! - [`looping_program`]: single-track loop with every op category
//! - [`bench_machine`]: a [`Machine`] at ludicrous speed with a step limit

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tapedeck_core::Speed;
use tapedeck_machine::{Machine, Program, SimulatorConfig};
use tapedeck_sched::SchedulerConfig;

/// `len` slots cycling through print, move, empty and conditional
/// branch ops, closed by a jump back to slot 0.
///
/// `len` is clamped to `3..=10` so the closing `B<n>` stays in range.
pub fn looping_program(len: usize) -> Program {
    const BODY: [&str; 4] = ["1", "R", ".", "D0"];
    let len = len.clamp(3, 10);
    let mut row: Vec<&str> = BODY.iter().copied().cycle().take(len - 1).collect();
    let back = format!("B{}", len - 1);
    row.push(&back);
    Program::parse(&[row.join(" ").as_str()]).expect("benchmark program is well formed")
}

/// A machine that runs at most `step_limit` steps at ludicrous speed.
pub fn bench_machine(step_limit: u64) -> Machine {
    Machine::new(
        SchedulerConfig::default(),
        SimulatorConfig {
            speed: Speed::Ludicrous,
            step_limit,
            ..SimulatorConfig::default()
        },
    )
    .expect("benchmark config is valid")
}
