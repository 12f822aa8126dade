//! Error types surfaced by the engine.

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use thiserror::Error;

use crate::token::Pos;

/// Failure to build a [`TimeRange`](crate::TimeRange) from formatted text.
#[derive(Error, Debug)]
pub enum RangeParseError {
    /// The timestamp text did not match the format string.
    #[error("invalid timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),

    /// The wall-clock value does not exist in the requested zone.
    #[error("nonexistent local time {0} in {1}")]
    NonexistentLocal(NaiveDateTime, Tz),
}

/// An error produced while parsing a query statement.
///
/// Queries and filters never fail at runtime; out-of-range inputs simply
/// yield no match. Everything that can go wrong is reported here, with the
/// position of the offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A specific diagnostic tied to a position.
    #[error("{message} at {pos}")]
    Message { message: String, pos: Pos },

    /// The parser met a token it has no rule for.
    #[error("found {found}, expected {} at {pos}", .expected.join(", "))]
    Unexpected {
        found: String,
        expected: Vec<&'static str>,
        pos: Pos,
    },
}

impl ParseError {
    pub(crate) fn message(message: impl Into<String>, pos: Pos) -> ParseError {
        ParseError::Message {
            message: message.into(),
            pos,
        }
    }

    pub(crate) fn unexpected(found: impl ToString, expected: &[&'static str], pos: Pos) -> ParseError {
        ParseError::Unexpected {
            found: found.to_string(),
            expected: expected.to_vec(),
            pos,
        }
    }
}
