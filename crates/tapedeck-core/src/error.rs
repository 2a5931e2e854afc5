//! Error types for tapedeck.
//!
//! Stepping, scheduling and cancellation are total and never fail; these
//! enums cover the construction paths only: configuration validation,
//! program shape checks, and parsing of user-facing names.

use std::error::Error;
use std::fmt;

/// Errors detected while validating scheduler or simulator configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A `ThrottleConfig` invariant is violated.
    InvalidThrottle {
        /// Which invariant was violated.
        reason: String,
    },
    /// A `BoringLoopConfig` invariant is violated.
    InvalidBoringLoop {
        /// Which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThrottle { reason } => write!(f, "invalid throttle config: {reason}"),
            Self::InvalidBoringLoop { reason } => {
                write!(f, "invalid boring-loop config: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Errors from building or replacing a program's operation tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramError {
    /// The program has no tracks.
    NoTracks,
    /// More tracks than the board can show.
    TooManyTracks {
        /// Number of tracks supplied.
        count: usize,
        /// Maximum supported.
        max: usize,
    },
    /// A track's length differs from the first track's.
    RaggedTracks {
        /// Offending track.
        track: usize,
        /// Its length.
        len: usize,
        /// Length of track 0.
        expected: usize,
    },
}

impl fmt::Display for ProgramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTracks => write!(f, "program has no tracks"),
            Self::TooManyTracks { count, max } => {
                write!(f, "program has {count} tracks, at most {max} are supported")
            }
            Self::RaggedTracks {
                track,
                len,
                expected,
            } => write!(
                f,
                "track {track} has {len} operations, expected {expected}"
            ),
        }
    }
}

impl Error for ProgramError {}

/// Unrecognized speed preset name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseSpeedError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseSpeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown speed '{}'", self.input)
    }
}

impl Error for ParseSpeedError {}

/// Input is not one of `0`, `1`, `_`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseSymbolError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseSymbolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid tape symbol '{}'", self.input)
    }
}

impl Error for ParseSymbolError {}
