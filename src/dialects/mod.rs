//! Database dialect implementations for date arithmetic and templates
//!
//! Each target database is one [`SqlDialect`] implementation. A
//! specialization holds its parent dialect by value and calls into it for
//! everything it does not translate itself, instead of inheriting from it.
//! All dialects are built once, before any query is translated, and are
//! shared read-only afterwards.

use crate::error::{Error, Result};
use crate::interval::{parse_sql_interval, Direction, IntervalSpec};
use crate::series::DateRange;
use crate::templates::TemplateRegistry;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod configured;
pub mod postgres;
pub mod redshift;

pub use configured::ConfiguredDialect;
pub use postgres::PostgresDialect;
pub use redshift::RedshiftDialect;

/// Database backends with a dialect implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Postgres,
    Redshift,
}

impl DatabaseBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::Redshift => "redshift",
        }
    }
}

impl fmt::Display for DatabaseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DatabaseBackend::Postgres),
            "redshift" => Ok(DatabaseBackend::Redshift),
            other => Err(Error::UnknownDialect(other.to_string())),
        }
    }
}

/// Trait for database-specific date SQL generation
pub trait SqlDialect: Send + Sync {
    /// Backend this dialect targets
    fn backend(&self) -> DatabaseBackend;

    /// Shift `expr` by `interval` in `direction`
    fn adjust_interval(
        &self,
        expr: &str,
        interval: &IntervalSpec,
        direction: Direction,
    ) -> Result<String>;

    /// Start of the `interval`-long bucket containing `source`, counted from `origin`
    ///
    /// `origin` is a timestamp literal value without quotes.
    fn date_bin(&self, interval: &IntervalSpec, source: &str, origin: &str) -> Result<String>;

    /// Cast an expression to the dialect's timestamp type
    fn date_time_cast(&self, value: &str) -> String;

    /// Current timestamp expression
    fn now_timestamp(&self) -> &'static str;

    /// Inline derived table with `date_from`/`date_to` columns, one row per range
    fn series_sql(&self, ranges: &[DateRange]) -> Result<String>;

    /// Sealed template registry for this dialect
    fn templates(&self) -> Arc<TemplateRegistry>;

    /// Parse `interval` and add it to `expr`
    fn add_interval(&self, expr: &str, interval: &str) -> Result<String> {
        let spec = parse_sql_interval(interval)?;
        self.adjust_interval(expr, &spec, Direction::Add)
    }

    /// Parse `interval` and subtract it from `expr`
    fn subtract_interval(&self, expr: &str, interval: &str) -> Result<String> {
        let spec = parse_sql_interval(interval)?;
        self.adjust_interval(expr, &spec, Direction::Subtract)
    }

    /// Render template for `name`, failing when the dialect does not define it
    fn function_template(&self, name: &str) -> Result<String> {
        self.templates().function(name).map(str::to_string)
    }
}

/// Factory function to create the appropriate dialect for a database backend
pub fn create_dialect(backend: DatabaseBackend) -> Box<dyn SqlDialect> {
    match backend {
        DatabaseBackend::Postgres => Box::new(PostgresDialect::new()),
        DatabaseBackend::Redshift => Box::new(RedshiftDialect::new()),
    }
}
