//! Reusable program and tape fixtures.
//!
//! - [`binary_increment`]: two-track increment of a little-endian binary
//!   number written leftwards from cell 0.
//! - [`spin_loop`]: print, move, jump back; never terminates on its own.
//! - [`walk_off`]: straight-line program that runs off the end.

use tapedeck_core::Symbol;
use tapedeck_machine::{Program, Tape};

/// Increments the number under and left of the head.
///
/// Track 0 tests the head cell: on `1` it drops to track 1, which writes
/// `0`, moves left and climbs back; on anything else it writes `1` and
/// jumps off the board.
pub fn binary_increment() -> Program {
    Program::parse(&["D1 1 B9 B3", "0 L . U"]).expect("fixture program is well formed")
}

/// `11` at cells -1 and 0 (the number 3), head at 0.
pub fn three() -> Tape {
    Tape::with_symbols(-1, &[Symbol::One, Symbol::One])
}

/// `0 R B2`: writes zeros rightwards forever.
pub fn spin_loop() -> Program {
    Program::parse(&["0 R B2"]).expect("fixture program is well formed")
}

/// `len` slots of `R` on one track.
pub fn walk_off(len: usize) -> Program {
    let row = vec!["R"; len].join(" ");
    Program::parse(&[row.as_str()]).expect("fixture program is well formed")
}
