//! Operation codes and their decoded form.
//!
//! Programs store raw tokens ([`OpCode`]) because the closed vocabulary
//! is small and the token text itself drives step timing. Semantic
//! dispatch goes through [`OpCode::decode`], which is total: anything
//! outside the vocabulary decodes to [`Op::Unknown`].
//!
//! | token | op |
//! |-------|----|
//! | `""` | [`Op::Noop`] |
//! | `0` `1` `_` | [`Op::Print`] |
//! | `L` `R` | [`Op::Left`] [`Op::Right`] |
//! | `B2`..`B9` | [`Op::Back`] |
//! | `D` `D0` `D1` `D_` | [`Op::Down`] |
//! | `U` `U0` `U1` `U_` | [`Op::Up`] |

use std::fmt;

use crate::symbol::Symbol;

/// Prefix marking a player-editable slot.
pub const EDITABLE_MARKER: char = '*';

/// Tokens an editable slot cycles through, in order. The rotation wraps.
pub const EDIT_ROTATION: [&str; 6] = ["", "0", "1", "_", "L", "R"];

/// Timing class of an operation, chosen from its token text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpCategory {
    /// Empty slot; paced by `empty_step_time_ms`.
    Empty,
    /// Token starting with `U`, `D` or `B`; paced by `branch_time_ms`.
    Branch,
    /// Everything else; paced by `step_time_ms`.
    Step,
}

/// Decoded operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Empty slot.
    Noop,
    /// Write a symbol at the head.
    Print(Symbol),
    /// Move the head one cell left.
    Left,
    /// Move the head one cell right.
    Right,
    /// Jump back `n` slots on the same track (`2..=9`).
    Back(u8),
    /// Switch to the track below, unconditionally or when the head reads
    /// the given symbol.
    Down(Option<Symbol>),
    /// Switch to the track above, unconditionally or when the head reads
    /// the given symbol.
    Up(Option<Symbol>),
    /// Token outside the vocabulary. Behaves like [`Op::Noop`].
    Unknown,
}

/// A raw operation token, optionally carrying the editable marker.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct OpCode(String);

impl OpCode {
    /// The empty (no-op) token.
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Wrap a raw token as given, marker included if present.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// A player-editable slot holding `token`.
    pub fn editable(token: &str) -> Self {
        let mut raw = String::with_capacity(token.len() + 1);
        raw.push(EDITABLE_MARKER);
        raw.push_str(token);
        Self(raw)
    }

    /// The raw text, marker included.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Whether the slot is player-editable.
    pub fn is_editable(&self) -> bool {
        self.0.starts_with(EDITABLE_MARKER)
    }

    /// The token with the editable marker stripped.
    pub fn token(&self) -> &str {
        self.0.strip_prefix(EDITABLE_MARKER).unwrap_or(&self.0)
    }

    /// Whether the token (marker stripped) is empty.
    pub fn is_empty(&self) -> bool {
        self.token().is_empty()
    }

    /// Timing class from the token's leading character.
    pub fn category(&self) -> OpCategory {
        match self.token().chars().next() {
            None => OpCategory::Empty,
            Some('U' | 'D' | 'B') => OpCategory::Branch,
            Some(_) => OpCategory::Step,
        }
    }

    /// Decode the token. Never fails.
    pub fn decode(&self) -> Op {
        let token = self.token();
        let mut chars = token.chars();
        let (first, second, rest) = (chars.next(), chars.next(), chars.next());
        if rest.is_some() {
            return Op::Unknown;
        }
        match (first, second) {
            (None, _) => Op::Noop,
            (Some('L'), None) => Op::Left,
            (Some('R'), None) => Op::Right,
            (Some('D'), None) => Op::Down(None),
            (Some('U'), None) => Op::Up(None),
            (Some(c), None) => Symbol::from_char(c).map_or(Op::Unknown, Op::Print),
            (Some('B'), Some(d)) => match d.to_digit(10) {
                Some(n @ 2..=9) => Op::Back(n as u8),
                _ => Op::Unknown,
            },
            (Some('D'), Some(c)) => Symbol::from_char(c).map_or(Op::Unknown, |s| Op::Down(Some(s))),
            (Some('U'), Some(c)) => Symbol::from_char(c).map_or(Op::Unknown, |s| Op::Up(Some(s))),
            _ => Op::Unknown,
        }
    }

    /// The next token in [`EDIT_ROTATION`], keeping the marker.
    ///
    /// Returns `None` for fixed slots. A token outside the rotation
    /// restarts it from the first entry.
    pub fn cycled(&self) -> Option<OpCode> {
        if !self.is_editable() {
            return None;
        }
        let next = EDIT_ROTATION
            .iter()
            .position(|t| *t == self.token())
            .map_or(0, |i| (i + 1) % EDIT_ROTATION.len());
        Some(OpCode::editable(EDIT_ROTATION[next]))
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OpCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for OpCode {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
