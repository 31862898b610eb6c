//! PostgreSQL dialect implementation
//!
//! Postgres understands interval literals with any mix of units, so this is
//! the generic base every other dialect falls back to.

use super::{DatabaseBackend, SqlDialect};
use crate::error::{Error, Result};
use crate::interval::{Direction, IntervalSpec};
use crate::series::{ensure_not_empty, quote_literal, DateRange};
use crate::templates::{TemplateRegistry, WindowFrameKind};
use std::sync::Arc;

/// PostgreSQL dialect
pub struct PostgresDialect {
    templates: Arc<TemplateRegistry>,
}

impl PostgresDialect {
    /// Create a new PostgreSQL dialect with the base template registry
    pub fn new() -> Self {
        log::debug!("building postgres dialect");
        Self {
            templates: base_templates(),
        }
    }

    fn interval_literal(interval: &IntervalSpec) -> String {
        format!("interval '{}'", interval)
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlDialect for PostgresDialect {
    fn backend(&self) -> DatabaseBackend {
        DatabaseBackend::Postgres
    }

    fn adjust_interval(
        &self,
        expr: &str,
        interval: &IntervalSpec,
        direction: Direction,
    ) -> Result<String> {
        if interval.is_empty() {
            return Ok(expr.to_string());
        }
        Ok(format!(
            "{} {} {}",
            expr,
            direction.operator(),
            Self::interval_literal(interval)
        ))
    }

    fn date_bin(&self, interval: &IntervalSpec, source: &str, origin: &str) -> Result<String> {
        match interval.bucket_length() {
            Ok(_) => {}
            // Interval literals carry mixed units, only the epoch length has to be positive.
            Err(Error::UnsupportedCompositeInterval(_)) => {
                if epoch_seconds(interval) <= 0 {
                    return Err(Error::invalid_magnitude(format!(
                        "interval '{}' is not a positive bucket length",
                        interval
                    )));
                }
            }
            Err(err) => return Err(err),
        }
        // Plain timestamp arithmetic, so no session time zone shifts the buckets.
        let origin = format!("{}::timestamp", quote_literal(origin));
        let literal = Self::interval_literal(interval);
        Ok(format!(
            "{origin} + {literal} * FLOOR(EXTRACT(EPOCH FROM ({source} - {origin})) / EXTRACT(EPOCH FROM {literal}))",
            origin = origin,
            literal = literal,
            source = source,
        ))
    }

    fn date_time_cast(&self, value: &str) -> String {
        format!("{}::timestamptz", value)
    }

    fn now_timestamp(&self) -> &'static str {
        "NOW()"
    }

    fn series_sql(&self, ranges: &[DateRange]) -> Result<String> {
        ensure_not_empty(ranges)?;
        let values = ranges
            .iter()
            .map(|range| format!("({}, {})", quote_literal(&range.from), quote_literal(&range.to)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!(
            "SELECT dates.f::timestamp date_from, dates.t::timestamp date_to FROM (VALUES {}) AS dates (f, t)",
            values
        ))
    }

    fn templates(&self) -> Arc<TemplateRegistry> {
        Arc::clone(&self.templates)
    }
}

const SECONDS_PER_YEAR: i64 = 31_557_600;
const SECONDS_PER_MONTH: i64 = 30 * 86_400;

/// `EXTRACT(EPOCH FROM interval)`: whole years count 365.25 days, left-over months 30 days
fn epoch_seconds(interval: &IntervalSpec) -> i64 {
    let months = interval.total_months();
    (months / 12) * SECONDS_PER_YEAR
        + (months % 12) * SECONDS_PER_MONTH
        + interval.fixed_seconds()
}

/// Base template registry shared by Postgres and the dialects built on it
pub fn base_templates() -> Arc<TemplateRegistry> {
    let mut builder = TemplateRegistry::builder();

    for (name, template) in [
        ("SUM", "SUM({{ args_concat }})"),
        ("MIN", "MIN({{ args_concat }})"),
        ("MAX", "MAX({{ args_concat }})"),
        ("COUNT", "COUNT({{ args_concat }})"),
        ("COUNT_DISTINCT", "COUNT(DISTINCT {{ args_concat }})"),
        ("AVG", "AVG({{ args_concat }})"),
        ("STDDEV_POP", "STDDEV_POP({{ args_concat }})"),
        ("STDDEV_SAMP", "STDDEV_SAMP({{ args_concat }})"),
        ("VAR_POP", "VAR_POP({{ args_concat }})"),
        ("VAR_SAMP", "VAR_SAMP({{ args_concat }})"),
        ("COVAR_POP", "COVAR_POP({{ args_concat }})"),
        ("COVAR_SAMP", "COVAR_SAMP({{ args_concat }})"),
        ("PERCENTILECONT", "PERCENTILE_CONT({{ args_concat }})"),
        ("COALESCE", "COALESCE({{ args_concat }})"),
        ("CONCAT", "CONCAT({{ args_concat }})"),
        ("LOWER", "LOWER({{ args_concat }})"),
        ("UPPER", "UPPER({{ args_concat }})"),
        ("FLOOR", "FLOOR({{ args_concat }})"),
        ("CEIL", "CEIL({{ args_concat }})"),
        ("TRUNC", "TRUNC({{ args_concat }})"),
        ("ABS", "ABS({{ args_concat }})"),
        ("DLOG10", "LOG10({{ args_concat }})"),
        ("DATETRUNC", "DATE_TRUNC({{ args_concat }})"),
        ("DATEPART", "DATE_PART({{ args_concat }})"),
        ("DATEDIFF", "DATE_PART({{ date_part }}, {{ args[2] }} - {{ args[1] }})"),
        ("CURRENTDATE", "CURRENT_DATE"),
        ("NOW", "NOW({{ args_concat }})"),
        ("GREATEST", "GREATEST({{ args_concat }})"),
        ("LEAST", "LEAST({{ args_concat }})"),
    ] {
        builder = builder.set_function(name, template);
    }

    for (logical, native) in [
        ("string", "TEXT"),
        ("boolean", "BOOLEAN"),
        ("tinyint", "SMALLINT"),
        ("smallint", "SMALLINT"),
        ("integer", "INTEGER"),
        ("bigint", "BIGINT"),
        ("float", "REAL"),
        ("double", "DOUBLE PRECISION"),
        ("decimal", "NUMERIC({{ precision }},{{ scale }})"),
        ("date", "DATE"),
        ("time", "TIME"),
        ("timestamp", "TIMESTAMP"),
        ("interval", "INTERVAL"),
        ("binary", "BYTEA"),
    ] {
        builder = builder.set_type(logical, native);
    }

    for kind in WindowFrameKind::ALL {
        builder = builder.set_window_frame_capability(kind, true);
    }

    builder.build()
}
