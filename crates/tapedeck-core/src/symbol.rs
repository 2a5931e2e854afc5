//! Ternary tape symbols.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseSymbolError;

/// A symbol stored in a tape cell.
///
/// Unwritten cells read as [`Symbol::Blank`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// The digit `0`.
    Zero,
    /// The digit `1`.
    One,
    /// The empty cell, written `_`.
    #[default]
    Blank,
}

impl Symbol {
    /// Map a token character to a symbol.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Zero),
            '1' => Some(Self::One),
            '_' => Some(Self::Blank),
            _ => None,
        }
    }

    /// The token character for this symbol.
    pub fn as_char(self) -> char {
        match self {
            Self::Zero => '0',
            Self::One => '1',
            Self::Blank => '_',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Symbol {
    type Err = ParseSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| ParseSymbolError {
                input: s.to_string(),
            }),
            _ => Err(ParseSymbolError {
                input: s.to_string(),
            }),
        }
    }
}
