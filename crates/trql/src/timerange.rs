//! Half-open time intervals and bulk operations over them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::RangeParseError;

/// A half-open interval of instants covering `[start, end)`.
///
/// The zone travels with the endpoints: all calendar arithmetic performed on
/// a range happens in the zone its start carries. `start == end` is a valid
/// value with zero duration; consumers treat it as no match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeRange {
    /// Parse two formatted timestamps into a range, interpreted in UTC.
    ///
    /// # Errors
    ///
    /// Returns [`RangeParseError::Timestamp`] if either value does not match
    /// the format string.
    pub fn parse(format: &str, start: &str, end: &str) -> Result<TimeRange, RangeParseError> {
        Self::parse_in(format, start, end, Tz::UTC)
    }

    /// Parse two formatted timestamps into a range in the given zone.
    ///
    /// Timestamps may omit the clock (midnight is assumed) or the date (the
    /// epoch date is assumed), so a plain `%m-%d-%y` or a bare `%I:%M%p`
    /// format both work.
    pub fn parse_in(
        format: &str,
        start: &str,
        end: &str,
        tz: Tz,
    ) -> Result<TimeRange, RangeParseError> {
        Ok(TimeRange {
            start: parse_stamp(format, start, tz)?,
            end: parse_stamp(format, end, tz)?,
        })
    }

    /// The difference between the end and start instants.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

fn parse_stamp(format: &str, value: &str, tz: Tz) -> Result<DateTime<Tz>, RangeParseError> {
    let naive = parse_naive(format, value)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or(RangeParseError::NonexistentLocal(naive, tz))
}

fn parse_naive(format: &str, value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match NaiveDateTime::parse_from_str(value, format) {
        Ok(stamp) => Ok(stamp),
        Err(err) => {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Ok(date.and_time(NaiveTime::MIN));
            }
            if let Ok(time) = NaiveTime::parse_from_str(value, format) {
                return Ok(NaiveDate::default().and_time(time));
            }
            Err(err)
        }
    }
}

/// Order ranges by ascending start, ties broken by ascending end.
pub fn sort(ranges: &mut [TimeRange]) {
    ranges.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));
}

/// Sort the ranges, then collapse every overlapping or touching pair.
///
/// Afterwards the list is sorted and pairwise disjoint, with
/// `prev.end < next.start` holding strictly for every neighboring pair.
/// Idempotent.
pub fn merge(ranges: &mut Vec<TimeRange>) {
    sort(ranges);

    let mut index = 0;
    while index + 1 < ranges.len() {
        if ranges[index].end < ranges[index + 1].start {
            index += 1;
        } else {
            if ranges[index].end < ranges[index + 1].end {
                ranges[index].end = ranges[index + 1].end;
            }
            ranges.remove(index + 1);
        }
    }
}

/// First index whose range fully contains `v`, scanning left to right.
pub fn search_index(ranges: &[TimeRange], v: &TimeRange) -> Option<usize> {
    ranges
        .iter()
        .position(|range| v.start >= range.start && v.end <= range.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KITCHEN: &str = "%I:%M%p";

    fn kitchen(start: &str, end: &str) -> TimeRange {
        TimeRange::parse(KITCHEN, start, end).unwrap()
    }

    // ── Parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_invalid_format() {
        let result = TimeRange::parse("xyz", "12:00AM", "7:00AM");
        assert!(matches!(result, Err(RangeParseError::Timestamp(_))));
    }

    #[test]
    fn test_parse_valid_range() {
        let range = kitchen("12:00AM", "7:00AM");
        assert_eq!(range.duration(), TimeDelta::hours(7));
    }

    #[test]
    fn test_parse_date_only_lands_at_midnight() {
        let range = TimeRange::parse("%m-%d-%y", "06-12-13", "06-13-13").unwrap();
        assert_eq!(range.duration(), TimeDelta::days(1));
        assert_eq!(range.start.to_rfc3339(), "2013-06-12T00:00:00+00:00");
    }

    #[test]
    fn test_parse_in_zone() {
        let range = TimeRange::parse_in(
            "%m-%d-%y %H:%M",
            "03-15-26 10:00",
            "03-15-26 12:00",
            chrono_tz::America::New_York,
        )
        .unwrap();
        // March 15 2026 is EDT (UTC-4).
        assert_eq!(range.start.to_rfc3339(), "2026-03-15T10:00:00-04:00");
    }

    // ── Sorting and searching ───────────────────────────────────────────

    fn slots() -> Vec<TimeRange> {
        vec![
            kitchen("12:00AM", "5:00AM"),
            kitchen("1:00AM", "5:00AM"),
            kitchen("12:00AM", "3:00AM"),
            kitchen("4:00AM", "7:00AM"),
            kitchen("8:00AM", "2:00PM"),
        ]
    }

    #[test]
    fn test_sort_orders_by_start_then_end() {
        let mut ranges = slots();
        sort(&mut ranges);
        assert_eq!(
            ranges,
            vec![
                kitchen("12:00AM", "3:00AM"),
                kitchen("12:00AM", "5:00AM"),
                kitchen("1:00AM", "5:00AM"),
                kitchen("4:00AM", "7:00AM"),
                kitchen("8:00AM", "2:00PM"),
            ]
        );
    }

    #[test]
    fn test_search_index_not_found() {
        let ranges = slots();
        assert_eq!(search_index(&ranges, &kitchen("12:00AM", "2:00PM")), None);
        assert_eq!(search_index(&ranges, &kitchen("2:00AM", "6:00AM")), None);
        assert_eq!(search_index(&ranges, &kitchen("6:00AM", "10:00AM")), None);
    }

    #[test]
    fn test_search_index_finds_first_container() {
        let mut ranges = slots();
        sort(&mut ranges);
        let found = search_index(&ranges, &kitchen("12:00AM", "3:00AM")).unwrap();
        assert_eq!(ranges[found], kitchen("12:00AM", "3:00AM"));
        let found = search_index(&ranges, &kitchen("12:00AM", "5:00AM")).unwrap();
        assert_eq!(ranges[found], kitchen("12:00AM", "5:00AM"));
    }

    // ── Merging ─────────────────────────────────────────────────────────

    #[test]
    fn test_merge_collapses_overlaps() {
        let mut ranges = vec![
            kitchen("2:00PM", "4:00PM"),
            kitchen("12:00PM", "5:00PM"),
            kitchen("6:00PM", "9:00PM"),
            kitchen("9:00PM", "10:00PM"),
            kitchen("10:00AM", "3:00PM"),
        ];
        merge(&mut ranges);
        assert_eq!(
            ranges,
            vec![kitchen("10:00AM", "5:00PM"), kitchen("6:00PM", "10:00PM")]
        );
    }

    #[test]
    fn test_merge_collapses_touching_ranges() {
        let mut ranges = vec![kitchen("1:00AM", "2:00AM"), kitchen("2:00AM", "3:00AM")];
        merge(&mut ranges);
        assert_eq!(ranges, vec![kitchen("1:00AM", "3:00AM")]);
    }

    #[test]
    fn test_merge_is_idempotent_and_strictly_disjoint() {
        let mut ranges = vec![
            kitchen("2:00PM", "4:00PM"),
            kitchen("12:00PM", "5:00PM"),
            kitchen("6:00PM", "9:00PM"),
            kitchen("9:00PM", "10:00PM"),
        ];
        merge(&mut ranges);
        let once = ranges.clone();
        merge(&mut ranges);
        assert_eq!(ranges, once);
        for pair in ranges.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
    }
}
