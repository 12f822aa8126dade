//! # trql
//!
//! Calendar algebra over half-open time ranges, driven by a small
//! time-range query language (TRQL).
//!
//! Given a bounded window and a statement like
//! `DAY THURSDAY OF 4 MONTH IN YEAR 2016`, the engine enumerates every
//! sub-interval of the window that satisfies it. Everything is a pure value:
//! queries locate the first matching sub-window, filters enumerate all of
//! them, and the parser turns text into a composed filter that can be
//! applied to any number of windows.
//!
//! ```
//! use trql::TimeRange;
//!
//! let window = TimeRange::parse("%m-%d-%y", "11-11-16", "11-30-16").unwrap();
//! let thanksgiving = trql::parse("DAY THURSDAY OF 4 MONTH NOVEMBER").unwrap();
//! let matches = thanksgiving.apply(window);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].start.to_rfc3339(), "2016-11-24T00:00:00+00:00");
//! ```
//!
//! ## Modules
//!
//! - [`timerange`] — the half-open [`TimeRange`] value and bulk operations
//! - [`query`] — calendar primitives locating the first matching sub-window
//! - [`filter`] — the algebra composing queries into enumerating filters
//! - [`scanner`] / [`token`] — the lexer and its token table
//! - [`parser`] — recursive descent from text to a composed filter
//! - [`error`] — error types

pub mod error;
pub mod filter;
pub mod parser;
pub mod query;
pub mod scanner;
pub mod timerange;
pub mod token;

pub use error::{ParseError, RangeParseError};
pub use filter::Filter;
pub use parser::{parse, Parser};
pub use query::Query;
pub use scanner::Scanner;
pub use timerange::{merge, search_index, sort, TimeRange};
pub use token::{Pos, Token};
