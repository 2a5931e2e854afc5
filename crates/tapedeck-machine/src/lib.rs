//! Turing-machine interpreter for tapedeck.
//!
//! A [`Program`] of up to three tracks runs against a sparse [`Tape`].
//! The [`Simulator`] executes one operation per scheduled step, choosing
//! each step's delay from the active speed profile, and reports visual
//! transitions to a [`Presenter`]. [`Machine`] bundles a scheduler with a
//! simulator for hosts that do not share the scheduler with anything else.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod machine;
pub mod presenter;
pub mod program;
pub mod simulator;
pub mod tape;

pub use config::{BoringLoopConfig, SimulatorConfig};
pub use machine::Machine;
pub use presenter::{Highlight, NullPresenter, Presenter, VisualTiming};
pub use program::{Program, MAX_TRACKS};
pub use simulator::{Busy, OnDone, RunReport, RunState, Simulator, StepHost};
pub use tape::{Direction, Tape};
