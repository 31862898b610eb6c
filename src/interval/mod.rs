//! Interval unit model shared by every dialect translation
//!
//! An [`IntervalSpec`] maps calendar units to signed magnitudes. It is
//! produced by [`parse_sql_interval`], never mutated afterwards, and consumed
//! by the arithmetic, bucketing and series code.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod calendar;
pub mod parser;

pub use calendar::BucketLength;
pub use parser::parse_sql_interval;

/// Calendar units, declared largest first
///
/// The derived ordering is the application order for multi-unit arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

/// Whether a unit has a variable or a fixed length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitClass {
    /// year, quarter, month
    CalendarCoarse,
    /// week, day, hour, minute, second
    SubDayFine,
}

impl IntervalUnit {
    pub const ALL: [IntervalUnit; 8] = [
        IntervalUnit::Year,
        IntervalUnit::Quarter,
        IntervalUnit::Month,
        IntervalUnit::Week,
        IntervalUnit::Day,
        IntervalUnit::Hour,
        IntervalUnit::Minute,
        IntervalUnit::Second,
    ];

    /// Singular lowercase name, also the DATEADD/DATEDIFF date part
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalUnit::Year => "year",
            IntervalUnit::Quarter => "quarter",
            IntervalUnit::Month => "month",
            IntervalUnit::Week => "week",
            IntervalUnit::Day => "day",
            IntervalUnit::Hour => "hour",
            IntervalUnit::Minute => "minute",
            IntervalUnit::Second => "second",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            IntervalUnit::Year => "years",
            IntervalUnit::Quarter => "quarters",
            IntervalUnit::Month => "months",
            IntervalUnit::Week => "weeks",
            IntervalUnit::Day => "days",
            IntervalUnit::Hour => "hours",
            IntervalUnit::Minute => "minutes",
            IntervalUnit::Second => "seconds",
        }
    }

    /// Resolve a singular or plural unit name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        IntervalUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == lower || unit.plural() == lower)
    }

    pub fn class(&self) -> UnitClass {
        match self {
            IntervalUnit::Year | IntervalUnit::Quarter | IntervalUnit::Month => {
                UnitClass::CalendarCoarse
            }
            _ => UnitClass::SubDayFine,
        }
    }

    pub fn is_calendar(&self) -> bool {
        self.class() == UnitClass::CalendarCoarse
    }

    /// Length in months for calendar units
    pub fn months(&self) -> Option<i64> {
        match self {
            IntervalUnit::Year => Some(12),
            IntervalUnit::Quarter => Some(3),
            IntervalUnit::Month => Some(1),
            _ => None,
        }
    }

    /// Length in seconds for fixed-length units
    pub fn seconds(&self) -> Option<i64> {
        match self {
            IntervalUnit::Week => Some(7 * 86_400),
            IntervalUnit::Day => Some(86_400),
            IntervalUnit::Hour => Some(3_600),
            IntervalUnit::Minute => Some(60),
            IntervalUnit::Second => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of an interval adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Add,
    Subtract,
}

impl Direction {
    /// Effective magnitude handed to a native single-unit call
    pub fn apply(&self, magnitude: i64) -> i64 {
        match self {
            Direction::Add => magnitude,
            Direction::Subtract => -magnitude,
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            Direction::Add => "+",
            Direction::Subtract => "-",
        }
    }
}

/// Which unit classes an interval contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalClass {
    Empty,
    CalendarCoarse,
    SubDayFine,
    Mixed,
}

/// Parsed interval: unit kind to signed magnitude, zero units absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalSpec {
    units: BTreeMap<IntervalUnit, i64>,
}

impl IntervalSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval made of a single unit
    pub fn of(unit: IntervalUnit, magnitude: i64) -> Self {
        Self::new().with(unit, magnitude)
    }

    /// Return a copy with `unit` set to `magnitude` (zero removes the unit)
    pub fn with(mut self, unit: IntervalUnit, magnitude: i64) -> Self {
        if magnitude == 0 {
            self.units.remove(&unit);
        } else {
            self.units.insert(unit, magnitude);
        }
        self
    }

    pub fn get(&self, unit: IntervalUnit) -> i64 {
        self.units.get(&unit).copied().unwrap_or(0)
    }

    /// Non-zero (unit, magnitude) pairs, largest unit first
    pub fn units(&self) -> impl Iterator<Item = (IntervalUnit, i64)> + '_ {
        self.units.iter().map(|(unit, magnitude)| (*unit, *magnitude))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn has_calendar_units(&self) -> bool {
        self.units.keys().any(IntervalUnit::is_calendar)
    }

    pub fn has_fixed_units(&self) -> bool {
        self.units.keys().any(|unit| !unit.is_calendar())
    }

    pub fn class(&self) -> IntervalClass {
        match (self.has_calendar_units(), self.has_fixed_units()) {
            (false, false) => IntervalClass::Empty,
            (true, false) => IntervalClass::CalendarCoarse,
            (false, true) => IntervalClass::SubDayFine,
            (true, true) => IntervalClass::Mixed,
        }
    }

    /// The only (unit, magnitude) pair, if the interval has exactly one
    pub fn single_unit(&self) -> Option<(IntervalUnit, i64)> {
        if self.units.len() == 1 {
            self.units().next()
        } else {
            None
        }
    }

    /// `12 * years + 3 * quarters + months`
    pub fn total_months(&self) -> i64 {
        self.units()
            .filter_map(|(unit, magnitude)| unit.months().map(|m| m * magnitude))
            .sum()
    }

    /// Sum of the fixed-length units in seconds
    pub fn fixed_seconds(&self) -> i64 {
        self.units()
            .filter_map(|(unit, magnitude)| unit.seconds().map(|s| s * magnitude))
            .sum()
    }

    pub fn negated(&self) -> Self {
        Self {
            units: self.units.iter().map(|(unit, m)| (*unit, -m)).collect(),
        }
    }
}

impl fmt::Display for IntervalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("0 seconds");
        }
        for (i, (unit, magnitude)) in self.units().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let name = if magnitude.abs() == 1 {
                unit.as_str()
            } else {
                unit.plural()
            };
            write!(f, "{} {}", magnitude, name)?;
        }
        Ok(())
    }
}

impl FromStr for IntervalSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_sql_interval(s)
    }
}
