//! Date ranges for gap-filling time-series queries
//!
//! [`time_series`] cuts `[from, to]` into consecutive buckets of one
//! interval each. The dialects turn the resulting [`DateRange`] list into an
//! inline derived table (see `SqlDialect::series_sql`).

use crate::error::{Error, Result};
use crate::interval::{Direction, IntervalSpec};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Timestamp literal format used for generated bounds
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Upper bound on generated buckets per series
pub const MAX_SERIES_LENGTH: usize = 100_000;

/// One (bucket start, bucket end) pair of timestamp literals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

impl DateRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl<F: Into<String>, T: Into<String>> From<(F, T)> for DateRange {
    fn from((from, to): (F, T)) -> Self {
        DateRange::new(from, to)
    }
}

/// Quote a value as a SQL string literal
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Reject an empty range list before any SQL is emitted
pub fn ensure_not_empty(ranges: &[DateRange]) -> Result<()> {
    if ranges.is_empty() {
        return Err(Error::EmptySeries);
    }
    Ok(())
}

/// Split `[from, to]` into consecutive buckets of `interval`
///
/// Each bucket ends one millisecond before the next one starts; the last
/// bucket is cut off at `to`.
pub fn time_series(
    interval: &IntervalSpec,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<DateRange>> {
    // Validates the interval as a positive, single-class length.
    interval.bucket_length()?;

    if from > to {
        return Err(Error::invalid_date_range(format!(
            "series start {} is after its end {}",
            from, to
        )));
    }

    let last_millis = Duration::milliseconds(1);
    let mut ranges = Vec::new();
    let mut start = from;

    while start <= to {
        if ranges.len() >= MAX_SERIES_LENGTH {
            return Err(Error::invalid_date_range(format!(
                "series from {} to {} by '{}' exceeds {} buckets",
                from, to, interval, MAX_SERIES_LENGTH
            )));
        }
        let next = interval.shift(start, Direction::Add)?;
        let end = next
            .checked_sub_signed(last_millis)
            .map_or(to, |end| std::cmp::min(end, to));
        ranges.push(DateRange::new(
            start.format(TIMESTAMP_FORMAT).to_string(),
            end.format(TIMESTAMP_FORMAT).to_string(),
        ));
        start = next;
    }

    log::trace!(
        "generated {} buckets of '{}' between {} and {}",
        ranges.len(),
        interval,
        from,
        to
    );
    Ok(ranges)
}

/// Series over whole days, aligned to bucket starts counted from `origin`
///
/// The first bucket is the one containing `from`, so the ranges line up
/// with what the dialect's bucketing expression produces for the same
/// interval and origin.
pub fn aligned_time_series(
    interval: &IntervalSpec,
    from: NaiveDate,
    to: NaiveDate,
    origin: NaiveDateTime,
) -> Result<Vec<DateRange>> {
    let from = from.and_time(chrono::NaiveTime::MIN);
    let to = to
        .and_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| Error::invalid_date_range(format!("cannot end a series on {}", to)))?;
    let start = interval.bucket_start(from, origin)?;
    time_series(interval, start, to)
}
