//! Core types for the tapedeck Turing-machine animation core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by the scheduler and the interpreter: tick and
//! event identifiers, instruction positions, tape symbols, operation
//! codes, speed presets, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod op;
pub mod speed;
pub mod symbol;

pub use error::{ConfigError, ParseSpeedError, ParseSymbolError, ProgramError};
pub use id::{EventId, Position, TickId};
pub use op::{Op, OpCategory, OpCode, EDITABLE_MARKER, EDIT_ROTATION};
pub use speed::{Speed, SpeedProfile};
pub use symbol::Symbol;
