//! Tapedeck: a deterministic, interruptible animation core for a small
//! Turing-machine game.
//!
//! This is the facade crate re-exporting the public API of the tapedeck
//! sub-crates. Most hosts only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use tapedeck::prelude::*;
//!
//! let mut machine = Machine::new(SchedulerConfig::default(), SimulatorConfig {
//!     speed: Speed::Ludicrous,
//!     ..SimulatorConfig::default()
//! })
//! .unwrap();
//!
//! // Increment the binary number 11 (three) written leftwards from cell 0.
//! let program = Program::parse(&["D1 1 B9 B3", "0 L . U"]).unwrap();
//! let tape = Tape::parse(-1, "11").unwrap();
//! machine.run(program, tape, None).unwrap();
//!
//! let report = machine.run_to_completion(Duration::from_millis(16), 10_000).unwrap();
//! assert_eq!(report.tape.render(-2..=0), "100");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tapedeck-core` | Ids, symbols, op codes, speed presets, errors |
//! | [`sched`] | `tapedeck-sched` | Discrete-event scheduler, throttle, frame driver |
//! | [`machine`] | `tapedeck-machine` | Program, tape, simulator, presenter |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ids, symbols, op codes, speed presets and error types (`tapedeck-core`).
pub use tapedeck_core as types;

/// The discrete-event scheduler (`tapedeck-sched`).
///
/// [`sched::Scheduler`] turns millisecond durations into ticks and fires
/// callbacks in `(due tick, schedule order)` order. [`sched::FrameDriver`]
/// paces it against wall-clock time for headless hosts.
pub use tapedeck_sched as sched;

/// The interpreter (`tapedeck-machine`).
///
/// [`machine::Simulator`] steps a [`machine::Program`] against a
/// [`machine::Tape`]; [`machine::Machine`] bundles it with a scheduler.
pub use tapedeck_machine as machine;

/// Common imports for typical tapedeck usage.
///
/// ```rust
/// use tapedeck::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tapedeck_core::{EventId, Op, OpCode, Position, Speed, SpeedProfile, Symbol, TickId};

    // Errors
    pub use tapedeck_core::{ConfigError, ProgramError};

    // Scheduler
    pub use tapedeck_sched::{FrameDriver, Scheduler, SchedulerConfig, ThrottleConfig, TickReport};

    // Interpreter
    pub use tapedeck_machine::{
        Machine, NullPresenter, Presenter, Program, RunReport, RunState, Simulator,
        SimulatorConfig, StepHost, Tape,
    };
}
