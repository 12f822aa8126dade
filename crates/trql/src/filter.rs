//! Composition of queries into enumerating filters.
//!
//! A [`Filter`] maps a window to *every* matching sub-window, as an ordered
//! list of disjoint ranges. Filters form a small algebra: a lifted query
//! enumerates its occurrences, and `not`, `union`, `intersect`, and
//! `ordinal` combine filters into larger ones. Filters hold only the
//! configuration captured at construction and may be applied to any number
//! of windows.

use chrono::TimeDelta;

use crate::query::Query;
use crate::timerange::{merge, TimeRange};

/// A composed predicate enumerating every matching sub-window of its input.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Repeat a query until the window is exhausted.
    Each(Query),
    /// The gaps the inner filter leaves uncovered.
    Not(Box<Filter>),
    /// The merged results of every branch.
    Union(Vec<Filter>),
    /// Successive refinement: each later branch re-filters the results of
    /// the earlier ones.
    Intersect(Vec<Filter>),
    /// The order-th pick of `inner` within every group `groups` produces.
    Ordinal {
        order: i64,
        inner: Box<Filter>,
        groups: Box<Filter>,
    },
}

impl Filter {
    /// Enumerate every matching sub-window of `input`.
    ///
    /// The output is chronologically ascending and pairwise disjoint, and
    /// every element falls inside `input`.
    pub fn apply(&self, input: TimeRange) -> Vec<TimeRange> {
        match self {
            Filter::Each(query) => {
                let mut result = Vec::new();
                let mut window = input;
                while window.duration() > TimeDelta::zero() {
                    let Some(output) = query.apply(window) else {
                        break;
                    };
                    window.start = output.end;
                    result.push(output);
                }
                result
            }

            Filter::Not(inner) => {
                let mut result = Vec::new();
                let mut cursor = input.start;
                for found in inner.apply(input) {
                    if cursor < found.start {
                        result.push(TimeRange {
                            start: cursor,
                            end: found.start,
                        });
                    }
                    cursor = found.end;
                }
                if cursor < input.end {
                    result.push(TimeRange {
                        start: cursor,
                        end: input.end,
                    });
                }
                result
            }

            Filter::Union(branches) => {
                let mut result = Vec::new();
                for branch in branches {
                    result.extend(branch.apply(input));
                }
                merge(&mut result);
                result
            }

            Filter::Intersect(branches) => {
                let mut branches = branches.iter();
                let Some(first) = branches.next() else {
                    return Vec::new();
                };
                let mut result = first.apply(input);
                for branch in branches {
                    let mut refined = Vec::new();
                    for found in &result {
                        refined.extend(branch.apply(*found));
                    }
                    result = refined;
                }
                result
            }

            Filter::Ordinal {
                order,
                inner,
                groups,
            } => {
                let mut result = Vec::new();
                for group in groups.apply(input) {
                    let picks = inner.apply(group);
                    let len = picks.len() as i64;
                    let index = if *order < 0 { order + len } else { order - 1 };
                    if index < 0 || index >= len {
                        continue;
                    }

                    // The pick exists but may fall outside the window the
                    // group straddles; drop it, or clamp it to the window.
                    let mut pick = picks[index as usize];
                    if pick.start >= input.end || pick.end <= input.start {
                        continue;
                    }
                    if pick.start < input.start {
                        pick.start = input.start;
                    }
                    if pick.end > input.end {
                        pick.end = input.end;
                    }
                    result.push(pick);
                }
                result
            }
        }
    }

    /// The inverse: every gap this filter leaves inside the window.
    pub fn not(self) -> Filter {
        Filter::Not(Box::new(self))
    }

    /// Combine with more filters; the results are merged together.
    pub fn union(self, others: impl IntoIterator<Item = Filter>) -> Filter {
        Filter::Union(std::iter::once(self).chain(others).collect())
    }

    /// [`union`](Filter::union) over lifted queries.
    pub fn and(self, queries: impl IntoIterator<Item = Query>) -> Filter {
        self.union(queries.into_iter().map(Query::filter))
    }

    /// Keep only the parts of this filter's results that the other filters
    /// also match, folding left to right.
    pub fn intersect(self, others: impl IntoIterator<Item = Filter>) -> Filter {
        Filter::Intersect(std::iter::once(self).chain(others).collect())
    }

    /// [`intersect`](Filter::intersect) over lifted queries.
    pub fn within(self, queries: impl IntoIterator<Item = Query>) -> Filter {
        self.intersect(queries.into_iter().map(Query::filter))
    }

    /// Pick this filter's order-th result within every group that `groups`
    /// produces. A negative order counts from the last result backwards.
    ///
    /// # Panics
    ///
    /// Panics when `order` is zero; the value has no k-th-item reading.
    pub fn ordinal(self, order: i64, groups: Filter) -> Filter {
        assert!(order != 0, "ordinal order must be nonzero");
        Filter::Ordinal {
            order,
            inner: Box::new(self),
            groups: Box::new(groups),
        }
    }

    /// [`ordinal`](Filter::ordinal) over a lifted query.
    pub fn of(self, order: i64, query: Query) -> Filter {
        self.ordinal(order, query.filter())
    }
}
