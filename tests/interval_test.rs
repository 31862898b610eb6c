#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use sqlcal::interval::IntervalClass;
    use sqlcal::{parse_sql_interval, Direction, Error, IntervalSpec, IntervalUnit};

    fn ts(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_display_parses_back() {
        for text in ["1 year -2 months 3 days", "15 months", "1 week 1 second", "0 seconds"] {
            let spec: IntervalSpec = text.parse().unwrap();
            assert_eq!(spec.to_string(), text);
            assert_eq!(spec.to_string().parse::<IntervalSpec>().unwrap(), spec);
        }
    }

    #[test]
    fn test_unit_spellings() {
        let spec = parse_sql_interval("2 Years 1 QUARTER 4 hour").unwrap();
        assert_eq!(spec.get(IntervalUnit::Year), 2);
        assert_eq!(spec.get(IntervalUnit::Quarter), 1);
        assert_eq!(spec.get(IntervalUnit::Hour), 4);
        assert_eq!(spec.get(IntervalUnit::Day), 0);
    }

    #[test]
    fn test_malformed_inputs() {
        for text in ["", "   ", "months", "2 fortnights", "1 day 2 days", "3 days later", "99999999999 days"] {
            let err = parse_sql_interval(text).unwrap_err();
            assert!(
                matches!(err, Error::MalformedInterval { .. }),
                "expected malformed interval for {:?}",
                text
            );
            assert_eq!(err.error_code(), "E_MALFORMED_INTERVAL");
        }
    }

    #[test]
    fn test_classification() {
        let cases = [
            ("1 month", IntervalClass::CalendarCoarse),
            ("1 year 1 quarter", IntervalClass::CalendarCoarse),
            ("1 week 2 days", IntervalClass::SubDayFine),
            ("1 month 2 days", IntervalClass::Mixed),
            ("0 days", IntervalClass::Empty),
        ];
        for (text, class) in cases {
            assert_eq!(parse_sql_interval(text).unwrap().class(), class, "{}", text);
        }
    }

    #[test]
    fn test_add_then_subtract_round_trips() {
        for text in ["1 month", "2 quarters", "1 year 3 months", "5 days 4 hours", "-7 months"] {
            let spec = parse_sql_interval(text).unwrap();
            for day in [1, 15, 28] {
                let start = ts(2023, 11, day);
                let shifted = spec.shift(start, Direction::Add).unwrap();
                // Undo in reverse unit order so each step inverts exactly
                let back = spec
                    .units()
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .try_fold(shifted, |acc, (unit, magnitude)| {
                        IntervalSpec::of(unit, magnitude).shift(acc, Direction::Subtract)
                    })
                    .unwrap();
                assert_eq!(back, start, "{} from {}", text, start);
            }
        }
    }

    #[test]
    fn test_negated_matches_subtract() {
        let spec = parse_sql_interval("1 year -2 months 10 minutes").unwrap();
        let start = ts(2024, 3, 31);
        assert_eq!(
            spec.negated().shift(start, Direction::Add).unwrap(),
            spec.shift(start, Direction::Subtract).unwrap()
        );
    }

    #[test]
    fn test_bucket_start_before_origin() {
        let spec = parse_sql_interval("3 months").unwrap();
        let origin = ts(2024, 1, 1);
        assert_eq!(spec.bucket_start(ts(2023, 12, 15), origin).unwrap(), ts(2023, 10, 1));
        assert_eq!(spec.bucket_start(ts(2024, 5, 20), origin).unwrap(), ts(2024, 4, 1));
    }
}
