//! Interval string parser
//!
//! Accepts one or more whitespace-separated `[-]<int> <unit>` groups, e.g.
//! `"-2 months"` or `"1 year 3 days"`. Units may be singular or plural.

use super::{IntervalSpec, IntervalUnit};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static INTERVAL_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+)\s*([A-Za-z]+)(?:\s+|$)")
        .expect("interval parser: Invalid interval part regex")
});

/// Magnitudes are kept within i32 so month and second totals cannot overflow.
const MAX_MAGNITUDE: i64 = i32::MAX as i64;

/// Parse an interval string into an [`IntervalSpec`]
///
/// Fails with [`Error::MalformedInterval`] on empty input, unknown units,
/// repeated units, out-of-range magnitudes or trailing text.
pub fn parse_sql_interval(input: &str) -> Result<IntervalSpec> {
    let mut rest = input.trim();
    let mut seen = BTreeSet::new();
    let mut spec = IntervalSpec::new();

    if input.trim().is_empty() {
        return Err(Error::malformed_interval(input, "interval is empty"));
    }

    while !rest.is_empty() {
        let caps = INTERVAL_PART.captures(rest).ok_or_else(|| {
            Error::malformed_interval(input, format!("unexpected text '{}'", rest))
        })?;

        let number = &caps[1];
        let unit_name = &caps[2];

        let magnitude: i64 = number
            .parse()
            .map_err(|_| Error::malformed_interval(input, format!("invalid number '{}'", number)))?;
        if magnitude.abs() > MAX_MAGNITUDE {
            return Err(Error::malformed_interval(
                input,
                format!("magnitude {} is out of range", number),
            ));
        }

        let unit = IntervalUnit::from_name(unit_name).ok_or_else(|| {
            Error::malformed_interval(input, format!("unknown unit '{}'", unit_name))
        })?;
        if !seen.insert(unit) {
            return Err(Error::malformed_interval(
                input,
                format!("unit '{}' appears more than once", unit),
            ));
        }

        spec = spec.with(unit, magnitude);
        rest = &rest[caps[0].len()..];
    }

    log::trace!("parsed interval '{}' as {:?}", input, spec);
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_unit() {
        let spec = parse_sql_interval("-2 months").unwrap();
        assert_eq!(spec.single_unit(), Some((IntervalUnit::Month, -2)));
    }

    #[test]
    fn test_parse_compact_form() {
        let spec = parse_sql_interval("3month").unwrap();
        assert_eq!(spec.get(IntervalUnit::Month), 3);
    }

    #[test]
    fn test_parse_combined_units() {
        let spec = parse_sql_interval("1 year 2 quarters -5 days 10 Seconds").unwrap();
        assert_eq!(spec.get(IntervalUnit::Year), 1);
        assert_eq!(spec.get(IntervalUnit::Quarter), 2);
        assert_eq!(spec.get(IntervalUnit::Day), -5);
        assert_eq!(spec.get(IntervalUnit::Second), 10);
        assert_eq!(spec.len(), 4);
    }

    #[test]
    fn test_zero_units_are_dropped() {
        let spec = parse_sql_interval("0 months 2 days").unwrap();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get(IntervalUnit::Month), 0);
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["", "   ", "month", "2 fortnights", "2 months later", "1 day 2 days"] {
            let err = parse_sql_interval(input).unwrap_err();
            assert!(
                matches!(err, Error::MalformedInterval { .. }),
                "expected MalformedInterval for {:?}, got {:?}",
                input,
                err
            );
        }
    }

    #[test]
    fn test_groups_need_separating_whitespace() {
        for input in ["2 months3 days", "+2 months", "1 year,2 days"] {
            assert!(
                matches!(parse_sql_interval(input), Err(Error::MalformedInterval { .. })),
                "expected MalformedInterval for {:?}",
                input
            );
        }
        let spec = parse_sql_interval("  2 months\t3 days ").unwrap();
        assert_eq!(spec.get(IntervalUnit::Month), 2);
        assert_eq!(spec.get(IntervalUnit::Day), 3);
    }

    #[test]
    fn test_rejects_huge_magnitude() {
        let err = parse_sql_interval("99999999999 days").unwrap_err();
        assert!(matches!(err, Error::MalformedInterval { .. }));
    }
}
