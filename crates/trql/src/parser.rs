//! Recursive-descent parser for the time-range query language.
//!
//! Grammar, keywords case-insensitive:
//!
//! ```text
//! program ← expr EOF
//! expr    ← filter ( op filter )*
//! op      ← AND | IN | OF [ IDENT ]
//! filter  ← '(' expr ')'
//!         | NOT filter
//!         | YEAR IDENT
//!         | MONTH [ month ]
//!         | WEEK  [ weekday ]
//!         | DAY   dayArgs
//!         | TIME  IDENT IDENT
//! ```
//!
//! `AND`, `IN`, and `OF` share a single precedence level and fold left into
//! the running filter; grouping takes explicit parentheses. `AND` unions,
//! `IN` intersects, and `OF` selects the k-th match within each group of the
//! filter that follows it, switching `MONTH`, `WEEK`, and `DAY` over to
//! their full-span readings.

use chrono::NaiveTime;

use crate::error::ParseError;
use crate::filter::Filter;
use crate::query::{weekday_delta, Query};
use crate::scanner::Scanner;
use crate::token::{Pos, Token};

/// `TIME` arguments are four-digit 24-hour literals, e.g. `1504`.
const TIME_FORMAT: &str = "%H%M";

/// Parse a statement into a [`Filter`].
pub fn parse(input: &str) -> Result<Filter, ParseError> {
    Parser::new(input).parse()
}

/// A recursive-descent parser over the token stream, with a one-token
/// push-back buffer.
///
/// The parser consumes its scanner; the resulting filter owns only the
/// configuration captured from the text.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    buf: Option<(Token, Pos)>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Parser<'a> {
        Parser {
            scanner: Scanner::new(input),
            buf: None,
        }
    }

    /// Parse the whole statement, requiring it to end cleanly.
    pub fn parse(&mut self) -> Result<Filter, ParseError> {
        let filter = self.parse_expr()?;

        let (tok, pos) = self.scan_skip_ws();
        if tok != Token::Eof {
            return Err(ParseError::unexpected(tok, &["EOF"], pos));
        }
        Ok(filter)
    }

    /// Fold `AND`/`IN`/`OF` operands into the running filter, left to right.
    fn parse_expr(&mut self) -> Result<Filter, ParseError> {
        let mut filter = self.parse_filter()?;

        loop {
            let (tok, pos) = self.scan_skip_ws();
            match tok {
                Token::Eof => return Ok(filter),
                Token::RParen => {
                    // The parenthesized caller consumes the closer.
                    self.unscan(tok, pos);
                    return Ok(filter);
                }
                Token::And => filter = filter.union([self.parse_filter()?]),
                Token::In => filter = filter.intersect([self.parse_filter()?]),
                Token::Of => {
                    let order = self.parse_order()?;
                    let groups = self.parse_ordinal_filter(order)?;
                    filter = filter.ordinal(order, groups);
                }
                other => {
                    return Err(ParseError::unexpected(other, &["AND", "IN", "OF"], pos));
                }
            }
        }
    }

    /// One filter production.
    fn parse_filter(&mut self) -> Result<Filter, ParseError> {
        let (tok, pos) = self.scan_skip_ws();
        match tok {
            Token::LParen => {
                let filter = self.parse_expr()?;
                let (tok, pos) = self.scan_skip_ws();
                if tok != Token::RParen {
                    return Err(ParseError::unexpected(tok, &[")"], pos));
                }
                Ok(filter)
            }
            Token::Not => Ok(self.parse_filter()?.not()),
            Token::Year => self.parse_year_filter(),
            Token::Month => self.parse_month_filter(0),
            Token::Week => self.parse_week_filter(0),
            Token::Day => self.parse_day_filter(0),
            Token::Time => self.parse_time_filter(),
            other => Err(ParseError::unexpected(
                other,
                &["(", "NOT", "YEAR", "MONTH", "WEEK", "DAY", "TIME"],
                pos,
            )),
        }
    }

    /// The optional signed integer after `OF`; defaults to 1 when the next
    /// token is not an identifier.
    fn parse_order(&mut self) -> Result<i64, ParseError> {
        let (tok, pos) = self.scan_skip_ws();
        match tok {
            Token::Ident(lit) => {
                let order: i64 = lit
                    .parse()
                    .map_err(|_| ParseError::message("unable to parse number", pos))?;
                if order == 0 {
                    return Err(ParseError::message("ordinal cannot be zero", pos));
                }
                Ok(order)
            }
            other => {
                self.unscan(other, pos);
                Ok(1)
            }
        }
    }

    /// The grouping filter after `OF`; only the span keywords qualify.
    fn parse_ordinal_filter(&mut self, order: i64) -> Result<Filter, ParseError> {
        let (tok, pos) = self.scan_skip_ws();
        match tok {
            Token::Month => self.parse_month_filter(order),
            Token::Week => self.parse_week_filter(order),
            Token::Day => self.parse_day_filter(order),
            other => Err(ParseError::unexpected(other, &["MONTH", "WEEK", "DAY"], pos)),
        }
    }

    fn parse_year_filter(&mut self) -> Result<Filter, ParseError> {
        let (tok, pos) = self.scan_skip_ws();
        match tok {
            Token::Ident(lit) => {
                let year: i32 = lit
                    .parse()
                    .map_err(|_| ParseError::message("unable to parse year", pos))?;
                if year <= 0 {
                    return Err(ParseError::message("year must be greater than 0", pos));
                }
                Ok(Query::Year(year).filter())
            }
            _ => Err(ParseError::message("missing year", pos)),
        }
    }

    /// `MONTH [m]`. Under `OF` the full natural month; otherwise the clipped
    /// one. A missing month anchors to the window's start.
    fn parse_month_filter(&mut self, order: i64) -> Result<Filter, ParseError> {
        let (tok, pos) = self.scan_skip_ws();
        let month = match tok {
            Token::MonthOfYear(month) => Some(month),
            other => {
                self.unscan(other, pos);
                None
            }
        };

        if order != 0 {
            Ok(Query::TheMonth(month).filter())
        } else {
            Ok(Query::Month(month).filter())
        }
    }

    /// `WEEK [w]`. Under a positive `OF v` this is a window of `2v-1` weeks
    /// around the v-th forward block; otherwise the next seven-day run.
    fn parse_week_filter(&mut self, order: i64) -> Result<Filter, ParseError> {
        let (tok, pos) = self.scan_skip_ws();
        let weekday = match tok {
            Token::DayOfWeek(weekday) => Some(weekday),
            other => {
                self.unscan(other, pos);
                None
            }
        };

        if order > 0 {
            Ok(Query::TheWeek {
                weekday,
                days: 7,
                offset: 1 - order,
                count: 2 * order - 1,
            }
            .filter())
        } else {
            Ok(Query::Week { weekday, days: 7 }.filter())
        }
    }

    /// `DAY …`, disambiguated by what follows: numeric offset and run
    /// length, the consecutive-weekday sugar, or nothing at all.
    fn parse_day_filter(&mut self, order: i64) -> Result<Filter, ParseError> {
        let (tok, pos) = self.scan_skip_ws();
        match tok {
            Token::Ident(lit) => {
                let offset: i64 = lit
                    .parse()
                    .map_err(|_| ParseError::message("could not parse days", pos))?;

                let (tok, pos) = self.scan_skip_ws();
                if let Token::Ident(lit) = tok {
                    let count: i64 = lit.parse().map_err(|_| {
                        ParseError::message("could not parse number of consecutive days", pos)
                    })?;
                    let query = if order != 0 {
                        Query::TheDays { offset, count }
                    } else {
                        Query::Days { offset, count }
                    };
                    return Ok(query.filter());
                }

                self.unscan(tok, pos);
                let query = if order != 0 {
                    Query::TheDays {
                        offset: 0,
                        count: offset,
                    }
                } else {
                    Query::Days {
                        offset: 0,
                        count: offset,
                    }
                };
                Ok(query.filter())
            }

            Token::DayOfWeek(weekday) => {
                if order != 0 {
                    return Err(ParseError::message(
                        "can not parse weekdays with ordinal, use WEEK instead",
                        pos,
                    ));
                }

                let (tok, pos) = self.scan_skip_ws();
                let days = match tok {
                    // Inclusive: DAY MONDAY WEDNESDAY covers three days.
                    Token::DayOfWeek(until) => weekday_delta(weekday, until) + 1,
                    other => {
                        self.unscan(other, pos);
                        1
                    }
                };
                Ok(Query::Week {
                    weekday: Some(weekday),
                    days,
                }
                .filter())
            }

            other => {
                self.unscan(other, pos);
                let query = if order != 0 {
                    Query::TheDays {
                        offset: 1 - order,
                        count: 2 * order - 1,
                    }
                } else {
                    Query::Days { offset: 0, count: 1 }
                };
                Ok(query.filter())
            }
        }
    }

    fn parse_time_filter(&mut self) -> Result<Filter, ParseError> {
        let from = self.parse_time_arg()?;
        let to = self.parse_time_arg()?;
        Ok(Query::Times { from, to }.filter())
    }

    fn parse_time_arg(&mut self) -> Result<NaiveTime, ParseError> {
        let (tok, pos) = self.scan_skip_ws();
        let Token::Ident(lit) = tok else {
            return Err(ParseError::unexpected(tok, &["IDENT"], pos));
        };
        NaiveTime::parse_from_str(&lit, TIME_FORMAT)
            .map_err(|_| ParseError::message("invalid time format", pos))
    }

    /// Next token, reading the push-back buffer first.
    fn scan(&mut self) -> (Token, Pos) {
        match self.buf.take() {
            Some(buffered) => buffered,
            None => self.scanner.scan(),
        }
    }

    /// Next non-whitespace token. Whitespace runs arrive as single tokens,
    /// so one skip suffices.
    fn scan_skip_ws(&mut self) -> (Token, Pos) {
        let (tok, pos) = self.scan();
        if matches!(tok, Token::Ws(_)) {
            return self.scan();
        }
        (tok, pos)
    }

    /// Push the last token back; the next scan returns it again.
    fn unscan(&mut self, tok: Token, pos: Pos) {
        debug_assert!(self.buf.is_none(), "parser push-back already occupied");
        self.buf = Some((tok, pos));
    }
}
