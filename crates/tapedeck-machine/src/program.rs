//! Program model: parallel tracks of operation slots plus the
//! interpreter's `current` and `next` positions.
//!
//! `next` is only ever assigned an in-bounds position. Transitions that
//! would leave the board raise the End flag instead, which is how a
//! program halts.

use std::fmt;

use smallvec::SmallVec;
use tapedeck_core::{OpCode, Position, ProgramError};

/// Maximum number of tracks a program may have.
pub const MAX_TRACKS: usize = 3;

static EMPTY_OP: OpCode = OpCode::empty();

/// Operation tables and instruction positions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    tracks: SmallVec<[Vec<OpCode>; MAX_TRACKS]>,
    ops_per_track: usize,
    current: Position,
    next: Position,
    next_is_end: bool,
}

fn check_shape(tracks: &[Vec<OpCode>]) -> Result<usize, ProgramError> {
    let first = tracks.first().ok_or(ProgramError::NoTracks)?;
    if tracks.len() > MAX_TRACKS {
        return Err(ProgramError::TooManyTracks {
            count: tracks.len(),
            max: MAX_TRACKS,
        });
    }
    let expected = first.len();
    if let Some((track, ops)) = tracks
        .iter()
        .enumerate()
        .find(|(_, ops)| ops.len() != expected)
    {
        return Err(ProgramError::RaggedTracks {
            track,
            len: ops.len(),
            expected,
        });
    }
    Ok(expected)
}

impl Program {
    /// Build a program from operation tables.
    ///
    /// Requires 1 to [`MAX_TRACKS`] tracks of equal length.
    pub fn new(tracks: Vec<Vec<OpCode>>) -> Result<Self, ProgramError> {
        let ops_per_track = check_shape(&tracks)?;
        Ok(Self {
            tracks: tracks.into_iter().collect(),
            ops_per_track,
            current: Position::ORIGIN,
            next: Position::ORIGIN,
            next_is_end: false,
        })
    }

    /// Build a program from whitespace-separated token rows.
    ///
    /// `.` stands for an empty slot; a leading `*` marks an editable one.
    ///
    /// ```
    /// use tapedeck_machine::Program;
    ///
    /// let program = Program::parse(&["D1 1 B9", "0 . U"]).unwrap();
    /// assert_eq!(program.track_count(), 2);
    /// assert_eq!(program.ops_per_track(), 3);
    /// ```
    pub fn parse(rows: &[&str]) -> Result<Self, ProgramError> {
        let tracks = rows
            .iter()
            .map(|row| {
                row.split_whitespace()
                    .map(|token| match token {
                        "." => OpCode::empty(),
                        "*." => OpCode::editable(""),
                        other => OpCode::new(other),
                    })
                    .collect()
            })
            .collect();
        Self::new(tracks)
    }

    /// Replace every operation and rewind both positions to the origin.
    ///
    /// On error the program is left unchanged.
    pub fn change(&mut self, tracks: Vec<Vec<OpCode>>) -> Result<(), ProgramError> {
        self.ops_per_track = check_shape(&tracks)?;
        self.tracks = tracks.into_iter().collect();
        self.current = Position::ORIGIN;
        self.next = Position::ORIGIN;
        self.next_is_end = false;
        Ok(())
    }

    /// Number of tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Slots per track.
    pub fn ops_per_track(&self) -> usize {
        self.ops_per_track
    }

    fn in_bounds(&self, track: i64, index: i64) -> Option<Position> {
        let track = usize::try_from(track).ok()?;
        let index = usize::try_from(index).ok()?;
        if track >= self.tracks.len() || index >= self.ops_per_track {
            return None;
        }
        Some(Position::new(u32::try_from(track).ok()?, u32::try_from(index).ok()?))
    }

    /// Point `next` at `(track, index)`, or raise End if that slot does
    /// not exist. End leaves `next` untouched.
    pub fn set_next_position(&mut self, track: i64, index: i64) {
        match self.in_bounds(track, index) {
            Some(pos) => {
                self.next = pos;
                self.next_is_end = false;
            }
            None => self.next_is_end = true,
        }
    }

    /// Move `current` to `next` unless End is raised.
    pub fn advance_to_next(&mut self) {
        if !self.next_is_end {
            self.current = self.next;
        }
    }

    /// Whether the next transition leaves the board.
    pub fn is_next_end(&self) -> bool {
        self.next_is_end
    }

    /// The just-executed (or about-to-execute) position.
    pub fn current(&self) -> Position {
        self.current
    }

    /// The position the next step will execute.
    pub fn next(&self) -> Position {
        self.next
    }

    /// The op at `current`, or the empty token if there is none.
    pub fn current_operation(&self) -> &OpCode {
        self.op_at(self.current).unwrap_or(&EMPTY_OP)
    }

    /// The op stored at `pos`.
    pub fn op_at(&self, pos: Position) -> Option<&OpCode> {
        self.tracks
            .get(pos.track as usize)
            .and_then(|ops| ops.get(pos.index as usize))
    }

    /// Overwrite the op at `pos`. Returns `false` if `pos` is off the board.
    pub fn set_op(&mut self, pos: Position, op: OpCode) -> bool {
        match self
            .tracks
            .get_mut(pos.track as usize)
            .and_then(|ops| ops.get_mut(pos.index as usize))
        {
            Some(slot) => {
                *slot = op;
                true
            }
            None => false,
        }
    }

    /// Advance an editable slot to the next token in its rotation.
    ///
    /// Fixed slots and off-board positions are left alone and return
    /// `false`.
    pub fn cycle_op(&mut self, pos: Position) -> bool {
        match self.op_at(pos).and_then(OpCode::cycled) {
            Some(next) => self.set_op(pos, next),
            None => false,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ops) in self.tracks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, op) in ops.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                match op.raw() {
                    "" => f.write_str(".")?,
                    "*" => f.write_str("*.")?,
                    raw => f.write_str(raw)?,
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_four() -> Program {
        Program::parse(&["D1 1 B9 B3", "0 L . U"]).unwrap()
    }

    #[test]
    fn parse_builds_equal_tracks() {
        let p = two_by_four();
        assert_eq!(p.track_count(), 2);
        assert_eq!(p.ops_per_track(), 4);
        assert_eq!(p.op_at(Position::new(1, 2)), Some(&OpCode::empty()));
        assert_eq!(p.op_at(Position::new(0, 3)).map(OpCode::raw), Some("B3"));
        assert_eq!(p.op_at(Position::new(2, 0)), None);
    }

    #[test]
    fn shape_errors() {
        assert_eq!(Program::new(vec![]), Err(ProgramError::NoTracks));
        assert_eq!(
            Program::parse(&["1", "1", "1", "1"]),
            Err(ProgramError::TooManyTracks { count: 4, max: 3 })
        );
        assert_eq!(
            Program::parse(&["1 1 1", "1 1"]),
            Err(ProgramError::RaggedTracks {
                track: 1,
                len: 2,
                expected: 3
            })
        );
    }

    #[test]
    fn set_next_out_of_bounds_raises_end_and_keeps_next() {
        let mut p = two_by_four();
        p.set_next_position(1, 2);
        assert_eq!(p.next(), Position::new(1, 2));
        for (track, index) in [(2, 0), (-1, 0), (0, 4), (0, -1), (7, 7)] {
            p.set_next_position(track, index);
            assert!(p.is_next_end(), "({track}, {index})");
            assert_eq!(p.next(), Position::new(1, 2));
        }
        p.set_next_position(0, 0);
        assert!(!p.is_next_end());
    }

    #[test]
    fn advance_respects_end() {
        let mut p = two_by_four();
        p.set_next_position(1, 3);
        p.advance_to_next();
        assert_eq!(p.current(), Position::new(1, 3));
        assert_eq!(p.current_operation().raw(), "U");

        p.set_next_position(1, 4);
        p.advance_to_next();
        assert_eq!(p.current(), Position::new(1, 3));
    }

    #[test]
    fn change_resets_positions() {
        let mut p = two_by_four();
        p.set_next_position(1, 1);
        p.advance_to_next();
        p.set_next_position(9, 9);
        p.change(vec![vec![OpCode::new("R")]]).unwrap();
        assert_eq!(p.current(), Position::ORIGIN);
        assert_eq!(p.next(), Position::ORIGIN);
        assert!(!p.is_next_end());
        assert_eq!(p.ops_per_track(), 1);
    }

    #[test]
    fn failed_change_leaves_program_intact() {
        let mut p = two_by_four();
        let before = p.clone();
        assert!(p.change(vec![vec![], vec![OpCode::new("1")]]).is_err());
        assert_eq!(p, before);
    }

    #[test]
    fn empty_tracks_read_as_noop() {
        let p = Program::new(vec![vec![]]).unwrap();
        assert_eq!(p.ops_per_track(), 0);
        assert!(p.current_operation().is_empty());
    }

    #[test]
    fn cycle_only_touches_editable_slots() {
        let mut p = Program::parse(&["*. L"]).unwrap();
        assert!(p.cycle_op(Position::new(0, 0)));
        assert_eq!(p.op_at(Position::new(0, 0)).map(OpCode::raw), Some("*0"));
        assert!(!p.cycle_op(Position::new(0, 1)));
        assert!(!p.cycle_op(Position::new(1, 0)));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let p = Program::parse(&["*. 1 B9", "0 . U_"]).unwrap();
        let text = p.to_string();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(Program::parse(&rows).unwrap(), p);
    }
}
