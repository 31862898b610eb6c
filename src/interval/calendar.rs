//! Calendar evaluation of interval specs on concrete timestamps
//!
//! These functions compute in Rust what the dialect SQL computes in the
//! database. The series generator steps through buckets with them, and they
//! define the reference results the emitted SQL has to agree with.
//!
//! Month-end overflow policy: adding months clamps to the last day of the
//! target month (`2024-01-31 + 1 month = 2024-02-29`), the same as Redshift
//! `DATEADD` and Postgres interval addition. A round trip through such a
//! date therefore does not return the starting day.

use super::{Direction, IntervalClass, IntervalSpec};
use crate::error::{Error, Result};
use chrono::{Datelike, Duration, Months, NaiveDateTime};

/// Length of one bucket, either in whole months or in fixed seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketLength {
    Months(i64),
    Seconds(i64),
}

impl IntervalSpec {
    /// Classify the interval as a single bucket length
    ///
    /// Mixed calendar and fixed units cannot be one bucket length, and
    /// zero or negative lengths would divide by zero or run backwards.
    pub fn bucket_length(&self) -> Result<BucketLength> {
        match self.class() {
            IntervalClass::Mixed => Err(Error::unsupported_composite(self.to_string())),
            IntervalClass::Empty => Err(Error::invalid_magnitude(
                "bucket interval has no non-zero units",
            )),
            IntervalClass::CalendarCoarse => {
                let total = self.total_months();
                if total <= 0 {
                    return Err(Error::invalid_magnitude(format!(
                        "interval '{}' totals {} months, expected a positive length",
                        self, total
                    )));
                }
                Ok(BucketLength::Months(total))
            }
            IntervalClass::SubDayFine => {
                let total = self.fixed_seconds();
                if total <= 0 {
                    return Err(Error::invalid_magnitude(format!(
                        "interval '{}' totals {} seconds, expected a positive length",
                        self, total
                    )));
                }
                Ok(BucketLength::Seconds(total))
            }
        }
    }

    /// Apply the interval to `ts`, largest unit first
    pub fn shift(&self, ts: NaiveDateTime, direction: Direction) -> Result<NaiveDateTime> {
        self.units().try_fold(ts, |acc, (unit, magnitude)| {
            let magnitude = direction.apply(magnitude);
            match (unit.months(), unit.seconds()) {
                (Some(months), _) => add_months(acc, magnitude * months),
                (None, Some(seconds)) => add_seconds(acc, magnitude * seconds),
                (None, None) => Ok(acc),
            }
        })
    }

    /// Start of the bucket containing `source`, counted from `origin`
    pub fn bucket_start(&self, source: NaiveDateTime, origin: NaiveDateTime) -> Result<NaiveDateTime> {
        match self.bucket_length()? {
            BucketLength::Months(total) => {
                let diff = months_between(origin, source);
                add_months(origin, diff.div_euclid(total) * total)
            }
            BucketLength::Seconds(total) => {
                let step = total * 1_000;
                let diff = (source - origin).num_milliseconds();
                add_millis(origin, diff.div_euclid(step) * step)
            }
        }
    }
}

/// Month boundaries crossed between two timestamps (DATEDIFF(month, ...) semantics)
pub fn months_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    let from_index = i64::from(from.year()) * 12 + i64::from(from.month0());
    let to_index = i64::from(to.year()) * 12 + i64::from(to.month0());
    to_index - from_index
}

pub fn add_months(ts: NaiveDateTime, months: i64) -> Result<NaiveDateTime> {
    let count = u32::try_from(months.unsigned_abs()).map_err(|_| out_of_range(ts))?;
    let shifted = if months >= 0 {
        ts.checked_add_months(Months::new(count))
    } else {
        ts.checked_sub_months(Months::new(count))
    };
    shifted.ok_or_else(|| out_of_range(ts))
}

fn add_seconds(ts: NaiveDateTime, seconds: i64) -> Result<NaiveDateTime> {
    let delta = Duration::try_seconds(seconds).ok_or_else(|| out_of_range(ts))?;
    ts.checked_add_signed(delta).ok_or_else(|| out_of_range(ts))
}

fn add_millis(ts: NaiveDateTime, millis: i64) -> Result<NaiveDateTime> {
    let delta = Duration::try_milliseconds(millis).ok_or_else(|| out_of_range(ts))?;
    ts.checked_add_signed(delta).ok_or_else(|| out_of_range(ts))
}

fn out_of_range(ts: NaiveDateTime) -> Error {
    Error::invalid_date_range(format!("shifting {} leaves the supported date range", ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::{parse_sql_interval, IntervalUnit};
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_shift_clamps_month_end() {
        let spec = IntervalSpec::of(IntervalUnit::Month, 1);
        let shifted = spec.shift(ts(2024, 1, 31, 0), Direction::Add).unwrap();
        assert_eq!(shifted, ts(2024, 2, 29, 0));
    }

    #[test]
    fn test_negative_add_is_subtract() {
        let spec = parse_sql_interval("-2 months").unwrap();
        let d = ts(2024, 5, 10, 8);
        assert_eq!(spec.shift(d, Direction::Add).unwrap(), ts(2024, 3, 10, 8));
        assert_eq!(spec.shift(d, Direction::Subtract).unwrap(), ts(2024, 7, 10, 8));
    }

    #[test]
    fn test_bucket_length_gate() {
        assert_eq!(
            parse_sql_interval("1 year 1 quarter").unwrap().bucket_length().unwrap(),
            BucketLength::Months(15)
        );
        assert_eq!(
            parse_sql_interval("2 hours").unwrap().bucket_length().unwrap(),
            BucketLength::Seconds(7_200)
        );
        assert!(matches!(
            parse_sql_interval("1 month 3 days").unwrap().bucket_length(),
            Err(Error::UnsupportedCompositeInterval(_))
        ));
        assert!(matches!(
            parse_sql_interval("1 year -12 months").unwrap().bucket_length(),
            Err(Error::InvalidIntervalMagnitude(_))
        ));
    }

    #[test]
    fn test_bucket_start_months() {
        let spec = parse_sql_interval("1 quarter").unwrap();
        let origin = ts(2024, 1, 1, 0);
        assert_eq!(
            spec.bucket_start(ts(2024, 5, 17, 13), origin).unwrap(),
            ts(2024, 4, 1, 0)
        );
        // Before the origin floors downwards, not towards zero.
        assert_eq!(
            spec.bucket_start(ts(2023, 11, 2, 0), origin).unwrap(),
            ts(2023, 10, 1, 0)
        );
    }

    #[test]
    fn test_mid_month_origin_counts_month_boundaries() {
        // DATEDIFF(month, ...) ignores the day of month, so a source before
        // the origin's day still lands in the bucket starting later that month.
        let spec = parse_sql_interval("1 month").unwrap();
        let origin = ts(2024, 1, 15, 0);
        let start = spec.bucket_start(ts(2024, 3, 10, 0), origin).unwrap();
        assert_eq!(start, ts(2024, 3, 15, 0));
        assert!(start > ts(2024, 3, 10, 0));
    }

    #[test]
    fn test_bucket_start_seconds() {
        let spec = parse_sql_interval("6 hours").unwrap();
        let origin = ts(2024, 1, 1, 0);
        assert_eq!(
            spec.bucket_start(ts(2024, 1, 3, 14), origin).unwrap(),
            ts(2024, 1, 3, 12)
        );
        assert_eq!(
            spec.bucket_start(ts(2023, 12, 31, 23), origin).unwrap(),
            ts(2023, 12, 31, 18)
        );
    }

    #[test]
    fn test_months_between_counts_boundaries() {
        assert_eq!(months_between(ts(2024, 1, 31, 0), ts(2024, 2, 1, 0)), 1);
        assert_eq!(months_between(ts(2024, 3, 1, 0), ts(2023, 12, 31, 0)), -3);
    }
}
