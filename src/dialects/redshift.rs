//! Redshift dialect implementation
//!
//! Redshift is based on PostgreSQL but its interval values cannot carry
//! month, quarter or year parts. Calendar arithmetic is therefore emitted as
//! nested `DATEADD` calls and calendar bucketing as whole-month arithmetic
//! on `DATEDIFF`. Anything Postgres can already express is delegated to the
//! wrapped [`PostgresDialect`] unchanged.

use super::postgres::PostgresDialect;
use super::{DatabaseBackend, SqlDialect};
use crate::error::Result;
use crate::interval::{BucketLength, Direction, IntervalSpec, IntervalUnit};
use crate::series::{ensure_not_empty, quote_literal, DateRange};
use crate::templates::{TemplateRegistry, WindowFrameKind};
use std::sync::Arc;

/// Redshift dialect
pub struct RedshiftDialect {
    parent: PostgresDialect,
    templates: Arc<TemplateRegistry>,
}

impl RedshiftDialect {
    /// Create a new Redshift dialect on top of a fresh Postgres dialect
    pub fn new() -> Self {
        Self::with_parent(PostgresDialect::new())
    }

    /// Create a Redshift dialect specializing the given Postgres dialect
    pub fn with_parent(parent: PostgresDialect) -> Self {
        log::debug!("building redshift dialect");
        let templates = parent
            .templates()
            .specialize()
            .set_function("DLOG10", "LOG(10, {{ args_concat }})")
            .set_function(
                "DATEDIFF",
                "DATEDIFF({{ date_part }}, {{ args[1] }}, {{ args[2] }})",
            )
            .remove_function("COVAR_POP")
            .remove_function("COVAR_SAMP")
            .remove_window_frame_capability(WindowFrameKind::Range)
            .remove_window_frame_capability(WindowFrameKind::Groups)
            .set_type("binary", "VARBINARY")
            .build();

        Self { parent, templates }
    }

    /// The Postgres dialect this one falls back to
    pub fn parent(&self) -> &PostgresDialect {
        &self.parent
    }

    fn date_add(unit: IntervalUnit, amount: i64, expr: &str) -> String {
        format!("DATEADD({}, {}, {})", unit, amount, expr)
    }

    /// One `DATEADD` per unit, largest unit innermost
    ///
    /// `DATEADD` clamps to month end, so the order matters for dates near
    /// the end of a month; the largest unit is always applied first.
    pub fn date_add_fold(expr: &str, interval: &IntervalSpec, direction: Direction) -> String {
        interval
            .units()
            .fold(expr.to_string(), |acc, (unit, magnitude)| {
                Self::date_add(unit, direction.apply(magnitude), &acc)
            })
    }
}

impl Default for RedshiftDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for RedshiftDialect {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Redshift
    }

    fn adjust_interval(
        &self,
        expr: &str,
        interval: &IntervalSpec,
        direction: Direction,
    ) -> Result<String> {
        if !interval.has_calendar_units() {
            log::trace!("redshift: delegating '{}' arithmetic to postgres", interval);
            return self.parent.adjust_interval(expr, interval, direction);
        }

        // A single calendar unit is one call; it is what the fold yields too.
        if let Some((unit, magnitude)) = interval.single_unit() {
            log::trace!("redshift: single DATEADD for '{}'", interval);
            return Ok(Self::date_add(unit, direction.apply(magnitude), expr));
        }

        log::trace!("redshift: DATEADD fold for '{}'", interval);
        Ok(Self::date_add_fold(expr, interval, direction))
    }

    fn date_bin(&self, interval: &IntervalSpec, source: &str, origin: &str) -> Result<String> {
        match interval.bucket_length()? {
            BucketLength::Months(total) => {
                let origin = self.date_time_cast(&quote_literal(origin));
                log::trace!("redshift: month bucketing by {} months", total);
                Ok(format!(
                    "DATEADD(month, (FLOOR(DATEDIFF(month, {origin}, {source}) / {total}.0) * {total})::int, {origin})",
                    origin = origin,
                    source = source,
                    total = total,
                ))
            }
            BucketLength::Seconds(_) => {
                log::trace!("redshift: delegating '{}' bucketing to postgres", interval);
                self.parent.date_bin(interval, source, origin)
            }
        }
    }

    fn date_time_cast(&self, value: &str) -> String {
        self.parent.date_time_cast(value)
    }

    fn now_timestamp(&self) -> &'static str {
        "GETDATE()"
    }

    fn series_sql(&self, ranges: &[DateRange]) -> Result<String> {
        ensure_not_empty(ranges)?;
        let values = ranges
            .iter()
            .map(|range| {
                format!(
                    "select {} f, {} t",
                    quote_literal(&range.from),
                    quote_literal(&range.to)
                )
            })
            .collect::<Vec<_>>()
            .join(" UNION ALL ");
        Ok(format!(
            "SELECT dates.f::timestamp date_from, dates.t::timestamp date_to FROM ({}) dates",
            values
        ))
    }

    fn templates(&self) -> Arc<TemplateRegistry> {
        Arc::clone(&self.templates)
    }
}
