//! Calendar query primitives.
//!
//! A [`Query`] maps a window to the *first* sub-window satisfying its
//! calendar predicate, already clipped to the window, or to nothing. The
//! primitives come in two flavors: the plain ones (`Month`, `Week`, `Days`)
//! clip their answer to the window, while the full-span ones (`TheMonth`,
//! `TheWeek`, `TheDays`) report the whole natural span even where it
//! straddles the window — which is what ordinal selection needs before it
//! clips the final pick.
//!
//! All date stepping is calendar-aware: months advance by year/month
//! arithmetic and days land on midnight of the target date in the window's
//! own zone, never on fixed 24-hour offsets.

use chrono::{DateTime, Datelike, Month, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Weekday};
use chrono_tz::Tz;

use crate::filter::Filter;
use crate::timerange::TimeRange;

/// A calendar predicate locating the first matching sub-window.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// The portion of the window falling in the given calendar year.
    Year(i32),
    /// The first occurrence of the month at or after the window's start,
    /// clipped to the window. `None` means the month the window starts in.
    Month(Option<Month>),
    /// The full natural month, unclipped. `None` anchors to the window's
    /// start, even when that floors to a day before the window.
    TheMonth(Option<Month>),
    /// The first run of `days` consecutive days starting on the weekday,
    /// clipped to the window. `None` starts on the window's own weekday.
    Week { weekday: Option<Weekday>, days: i64 },
    /// A full run of `days * count` days, shifted by `offset` blocks of
    /// `days` from the anchor weekday. Unclipped.
    TheWeek {
        weekday: Option<Weekday>,
        days: i64,
        offset: i64,
        count: i64,
    },
    /// The first run of `count` days shifted by `offset` days, clipped. A
    /// non-positive offset shrinks the run instead, preserving its end.
    Days { offset: i64, count: i64 },
    /// The full run of `count` days shifted by `offset` days. Unclipped.
    TheDays { offset: i64, count: i64 },
    /// The daily wall-clock window from `from` to `to`. Equal endpoints mean
    /// the whole day.
    Times { from: NaiveTime, to: NaiveTime },
}

impl Query {
    /// Parse `from` and `to` with the given format and build a daily
    /// time-of-day window query.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`chrono::ParseError`] when either argument
    /// does not match the format.
    pub fn times(format: &str, from: &str, to: &str) -> Result<Query, chrono::ParseError> {
        Ok(Query::Times {
            from: NaiveTime::parse_from_str(from, format)?,
            to: NaiveTime::parse_from_str(to, format)?,
        })
    }

    /// Find the first sub-window of `input` matching this query.
    ///
    /// A successful answer always has positive duration. The clipped
    /// primitives additionally guarantee containment in `input`; the full-
    /// span primitives only guarantee overlap.
    pub fn apply(&self, input: TimeRange) -> Option<TimeRange> {
        match *self {
            Query::Year(year) => apply_year(input, year),
            Query::Month(month) => apply_month(input, month),
            Query::TheMonth(month) => apply_the_month(input, month),
            Query::Week { weekday, days } => apply_week(input, weekday, days),
            Query::TheWeek {
                weekday,
                days,
                offset,
                count,
            } => apply_the_week(input, weekday, days, offset, count),
            Query::Days { offset, count } => apply_days(input, offset, count),
            Query::TheDays { offset, count } => apply_the_days(input, offset, count),
            Query::Times { from, to } => apply_times(input, from, to),
        }
    }

    /// Lift into a [`Filter`] that enumerates every occurrence in order.
    pub fn filter(self) -> Filter {
        Filter::Each(self)
    }
}

fn apply_year(input: TimeRange, year: i32) -> Option<TimeRange> {
    let tz = input.start.timezone();

    let start = match input.start.year() {
        y if y == year => input.start,
        y if y < year => tz.with_ymd_and_hms(year, 1, 1, 0, 0, 0).earliest()?,
        _ => return None,
    };

    let end = match input.end.year() {
        y if y == year => input.end,
        y if y > year => tz.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).earliest()?,
        _ => return None,
    };

    positive(start, end)
}

fn apply_month(input: TimeRange, month: Option<Month>) -> Option<TimeRange> {
    let delta = month.map_or(0, |m| month_delta(input.start.month(), m.number_from_month()));
    let start = if delta > 0 {
        month_floor_offset(input.start, delta)?
    } else {
        input.start
    };
    if start >= input.end {
        return None;
    }

    let mut end = month_floor_offset(start, 1)?;
    if end > input.end {
        end = input.end;
    }
    positive(start, end)
}

fn apply_the_month(input: TimeRange, month: Option<Month>) -> Option<TimeRange> {
    let delta = month.map_or(0, |m| month_delta(input.start.month(), m.number_from_month()));
    let start = month_floor_offset(input.start, delta)?;
    let end = month_floor_offset(start, 1)?;
    spanning(start, end, input)
}

fn apply_week(input: TimeRange, weekday: Option<Weekday>, days: i64) -> Option<TimeRange> {
    let delta = weekday.map_or(0, |w| weekday_delta(input.start.weekday(), w));
    let start = if delta > 0 {
        day_floor_offset(input.start, delta)?
    } else {
        input.start
    };
    if start >= input.end {
        return None;
    }

    let mut end = day_floor_offset(start, days)?;
    if end > input.end {
        end = input.end;
    }
    positive(start, end)
}

fn apply_the_week(
    input: TimeRange,
    weekday: Option<Weekday>,
    days: i64,
    offset: i64,
    count: i64,
) -> Option<TimeRange> {
    let delta = weekday.map_or(0, |w| weekday_delta(input.start.weekday(), w));
    let start = day_floor_offset(input.start, delta + days * offset)?;
    let end = day_floor_offset(start, days * count)?;
    spanning(start, end, input)
}

fn apply_days(input: TimeRange, offset: i64, count: i64) -> Option<TimeRange> {
    let (start, count) = if offset > 0 {
        (day_floor_offset(input.start, offset)?, count)
    } else {
        (input.start, count + offset)
    };
    if start >= input.end {
        return None;
    }

    let mut end = day_floor_offset(start, count)?;
    if end <= input.start {
        return None;
    }
    if end > input.end {
        end = input.end;
    }
    positive(start, end)
}

fn apply_the_days(input: TimeRange, offset: i64, count: i64) -> Option<TimeRange> {
    let start = day_floor_offset(input.start, offset)?;
    let end = day_floor_offset(start, count)?;
    spanning(start, end, input)
}

fn apply_times(input: TimeRange, from: NaiveTime, to: NaiveTime) -> Option<TimeRange> {
    let span = match modulo((to - from).num_seconds(), 86_400) {
        // Equal endpoints mean the whole day.
        0 => TimeDelta::days(1),
        seconds => TimeDelta::seconds(seconds),
    };

    // Align to the wall clock of the window's start, back up a day, then
    // walk forward to the earliest occurrence still reaching the window.
    let delta = TimeDelta::hours(from.hour() as i64 - input.start.hour() as i64)
        + TimeDelta::minutes(from.minute() as i64 - input.start.minute() as i64);
    let mut start = input.start + delta - TimeDelta::days(1);
    let mut end = start + span;
    while end <= input.start {
        start += TimeDelta::days(1);
        end = start + span;
    }

    if start < input.start {
        start = input.start;
    }
    if start >= input.end {
        return None;
    }
    if end > input.end {
        end = input.end;
    }
    positive(start, end)
}

// ── Calendar helpers ────────────────────────────────────────────────────────

/// Modulo that stays non-negative for positive divisors.
fn modulo(x: i64, y: i64) -> i64 {
    ((x % y) + y) % y
}

/// Months from one month-of-year number to the next occurrence of another.
fn month_delta(from: u32, to: u32) -> i64 {
    modulo(to as i64 - from as i64, 12)
}

/// Days from one weekday to the next occurrence of another.
pub(crate) fn weekday_delta(from: Weekday, to: Weekday) -> i64 {
    modulo(
        to.num_days_from_sunday() as i64 - from.num_days_from_sunday() as i64,
        7,
    )
}

/// Midnight of the date `days` after the instant's date, in its zone.
///
/// Yields nothing for a date whose midnight does not exist in the zone.
fn day_floor_offset(instant: DateTime<Tz>, days: i64) -> Option<DateTime<Tz>> {
    let date = instant.date_naive().checked_add_signed(TimeDelta::days(days))?;
    local_midnight(instant.timezone(), date)
}

/// Midnight of day 1 of the month `months` after the instant's month.
fn month_floor_offset(instant: DateTime<Tz>, months: i64) -> Option<DateTime<Tz>> {
    let total = instant.year() as i64 * 12 + instant.month0() as i64 + months;
    let date = NaiveDate::from_ymd_opt(
        total.div_euclid(12).try_into().ok()?,
        total.rem_euclid(12) as u32 + 1,
        1,
    )?;
    local_midnight(instant.timezone(), date)
}

fn local_midnight(tz: Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(NaiveTime::MIN)).earliest()
}

fn positive(start: DateTime<Tz>, end: DateTime<Tz>) -> Option<TimeRange> {
    (start < end).then_some(TimeRange { start, end })
}

/// Keep an unclipped span only when it is non-empty and overlaps the input.
fn spanning(start: DateTime<Tz>, end: DateTime<Tz>, input: TimeRange) -> Option<TimeRange> {
    (start < end && start < input.end && end > input.start).then_some(TimeRange { start, end })
}
