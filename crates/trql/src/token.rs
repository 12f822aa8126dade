//! Token definitions for the time-range query language.

use std::fmt;

use chrono::{Month, Weekday};
use serde::Serialize;

/// A lexical token.
///
/// Keywords match case-insensitively; any other run of letters and digits is
/// carried through as an [`Token::Ident`] with its original spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A character the scanner has no rule for. Carries the character.
    Illegal(char),
    /// End of input.
    Eof,
    /// A run of contiguous whitespace, collapsed into one token.
    Ws(String),
    /// A bare identifier: numeric arguments and unreserved words.
    Ident(String),

    LParen,
    RParen,

    // Operators.
    And,
    In,
    Of,
    Not,

    // Keywords.
    Year,
    Month,
    Week,
    Day,
    Time,

    /// JANUARY through DECEMBER.
    MonthOfYear(Month),
    /// MONDAY through SUNDAY.
    DayOfWeek(Weekday),
}

impl Token {
    /// True for the twelve month-of-year tokens.
    pub fn is_month_of_year(&self) -> bool {
        matches!(self, Token::MonthOfYear(_))
    }

    /// True for the seven day-of-week tokens.
    pub fn is_day_of_week(&self) -> bool {
        matches!(self, Token::DayOfWeek(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Illegal(ch) => write!(f, "{ch}"),
            Token::Eof => f.write_str("EOF"),
            Token::Ws(lit) => f.write_str(lit),
            Token::Ident(lit) => f.write_str(lit),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::And => f.write_str("AND"),
            Token::In => f.write_str("IN"),
            Token::Of => f.write_str("OF"),
            Token::Not => f.write_str("NOT"),
            Token::Year => f.write_str("YEAR"),
            Token::Month => f.write_str("MONTH"),
            Token::Week => f.write_str("WEEK"),
            Token::Day => f.write_str("DAY"),
            Token::Time => f.write_str("TIME"),
            Token::MonthOfYear(month) => f.write_str(month_name(*month)),
            Token::DayOfWeek(weekday) => f.write_str(weekday_name(*weekday)),
        }
    }
}

/// Map an identifier onto its reserved token, or [`Token::Ident`] when it is
/// not a reserved word. Matching is case-insensitive.
pub fn lookup(ident: &str) -> Token {
    match ident.to_ascii_lowercase().as_str() {
        "and" => Token::And,
        "in" => Token::In,
        "of" => Token::Of,
        "not" => Token::Not,

        "year" => Token::Year,
        "month" => Token::Month,
        "week" => Token::Week,
        "day" => Token::Day,
        "time" => Token::Time,

        "january" => Token::MonthOfYear(Month::January),
        "february" => Token::MonthOfYear(Month::February),
        "march" => Token::MonthOfYear(Month::March),
        "april" => Token::MonthOfYear(Month::April),
        "may" => Token::MonthOfYear(Month::May),
        "june" => Token::MonthOfYear(Month::June),
        "july" => Token::MonthOfYear(Month::July),
        "august" => Token::MonthOfYear(Month::August),
        "september" => Token::MonthOfYear(Month::September),
        "october" => Token::MonthOfYear(Month::October),
        "november" => Token::MonthOfYear(Month::November),
        "december" => Token::MonthOfYear(Month::December),

        "monday" => Token::DayOfWeek(Weekday::Mon),
        "tuesday" => Token::DayOfWeek(Weekday::Tue),
        "wednesday" => Token::DayOfWeek(Weekday::Wed),
        "thursday" => Token::DayOfWeek(Weekday::Thu),
        "friday" => Token::DayOfWeek(Weekday::Fri),
        "saturday" => Token::DayOfWeek(Weekday::Sat),
        "sunday" => Token::DayOfWeek(Weekday::Sun),

        _ => Token::Ident(ident.to_string()),
    }
}

fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "JANUARY",
        Month::February => "FEBRUARY",
        Month::March => "MARCH",
        Month::April => "APRIL",
        Month::May => "MAY",
        Month::June => "JUNE",
        Month::July => "JULY",
        Month::August => "AUGUST",
        Month::September => "SEPTEMBER",
        Month::October => "OCTOBER",
        Month::November => "NOVEMBER",
        Month::December => "DECEMBER",
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// Zero-based line and character position of the first rune of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} col {}", self.line + 1, self.column + 1)
    }
}
