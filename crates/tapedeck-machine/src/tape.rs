//! Sparse, unbounded ternary tape with a single head.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use tapedeck_core::{ParseSymbolError, Symbol};

/// Head movement direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards negative positions.
    Left,
    /// Towards positive positions.
    Right,
}

/// A tape of cells indexed by `i64`, blank wherever nothing was written.
///
/// Only explicitly written cells are stored; printing a blank keeps an
/// entry so [`written_range`](Tape::written_range) still covers it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tape {
    cells: BTreeMap<i64, Symbol>,
    head: i64,
}

impl Tape {
    /// An all-blank tape with the head at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tape holding `symbols` starting at `origin`, head at 0.
    pub fn with_symbols(origin: i64, symbols: &[Symbol]) -> Self {
        let cells = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (origin + i as i64, *s))
            .collect();
        Self { cells, head: 0 }
    }

    /// Parse a token string such as `"1_0"` starting at `origin`.
    pub fn parse(origin: i64, text: &str) -> Result<Self, ParseSymbolError> {
        let symbols = text
            .chars()
            .map(|c| {
                Symbol::from_char(c).ok_or_else(|| ParseSymbolError {
                    input: c.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::with_symbols(origin, &symbols))
    }

    /// Place the head at `head`. Builder form for setting up puzzles.
    pub fn with_head(mut self, head: i64) -> Self {
        self.head = head;
        self
    }

    /// Head position.
    pub fn head(&self) -> i64 {
        self.head
    }

    /// Symbol under the head.
    pub fn current_symbol(&self) -> Symbol {
        self.read(self.head)
    }

    /// Symbol at `pos`.
    pub fn read(&self, pos: i64) -> Symbol {
        self.cells.get(&pos).copied().unwrap_or_default()
    }

    /// Write `symbol` under the head.
    pub fn print(&mut self, symbol: Symbol) {
        self.cells.insert(self.head, symbol);
    }

    /// Move the head one cell left.
    pub fn move_left(&mut self) {
        self.head -= 1;
    }

    /// Move the head one cell right.
    pub fn move_right(&mut self) {
        self.head += 1;
    }

    /// Move the head one cell in `direction`.
    pub fn step(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
        }
    }

    /// Smallest range covering every written cell and the head.
    pub fn written_range(&self) -> RangeInclusive<i64> {
        let lo = self.cells.keys().next().map_or(self.head, |&k| k.min(self.head));
        let hi = self
            .cells
            .keys()
            .next_back()
            .map_or(self.head, |&k| k.max(self.head));
        lo..=hi
    }

    /// Tokens for every cell in `range`.
    pub fn render(&self, range: RangeInclusive<i64>) -> String {
        range.map(|pos| self.read(pos).as_char()).collect()
    }
}

impl fmt::Display for Tape {
    /// Written range with the head cell bracketed, e.g. `1[0]0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pos in self.written_range() {
            let c = self.read(pos).as_char();
            if pos == self.head {
                write!(f, "[{c}]")?;
            } else {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
