//! sqlcal - dialect-specific SQL date arithmetic and template overrides
//!
//! sqlcal specializes a generic SQL generator for databases whose interval
//! support is limited:
//! - Interval arithmetic as nested single-unit calls (`DATEADD`) where
//!   interval literals cannot carry calendar units
//! - Calendar bucketing (`DATE_BIN`-style) through whole-month arithmetic
//! - Per-dialect function, type and window frame templates, composed from a
//!   parent dialect by copy-then-override
//! - Inline date-series tables for gap-filling time-series queries
//!
//! Dialects are built once up front and then shared read-only; every
//! translation is a pure function of its inputs.

// Enforce error handling best practices
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
    )
)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used,))]

pub mod dialects;
pub mod error;
pub mod interval;
pub mod series;
pub mod templates;

#[cfg(feature = "config")]
pub mod config;

// Re-export main types for public API
#[cfg(feature = "config")]
pub use config::DialectConfig;
pub use dialects::{
    create_dialect, ConfiguredDialect, DatabaseBackend, PostgresDialect, RedshiftDialect,
    SqlDialect,
};
pub use error::{Error, Result};
pub use interval::{parse_sql_interval, BucketLength, Direction, IntervalSpec, IntervalUnit};
pub use series::{time_series, DateRange};
pub use templates::{TemplateOverrides, TemplateRegistry, TemplateRegistryBuilder, WindowFrameKind};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::dialects::{create_dialect, DatabaseBackend, SqlDialect};
    pub use crate::error::{Error, ErrorContext, Result};
    pub use crate::interval::{parse_sql_interval, Direction, IntervalSpec, IntervalUnit};
    pub use crate::series::DateRange;
    pub use crate::templates::{TemplateRegistry, WindowFrameKind};
}
