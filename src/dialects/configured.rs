//! Dialect with user-supplied template overrides
//!
//! Wraps any dialect and replaces only its template registry. The registry
//! is specialized from the wrapped dialect's registry once, at construction.

use super::{DatabaseBackend, SqlDialect};
use crate::error::Result;
use crate::interval::{Direction, IntervalSpec};
use crate::series::DateRange;
use crate::templates::{TemplateOverrides, TemplateRegistry};
use std::sync::Arc;

pub struct ConfiguredDialect {
    inner: Box<dyn SqlDialect>,
    templates: Arc<TemplateRegistry>,
}

impl ConfiguredDialect {
    pub fn new(inner: Box<dyn SqlDialect>, overrides: &TemplateOverrides) -> Self {
        log::debug!(
            "applying template overrides to {} dialect",
            inner.backend()
        );
        let templates = overrides.apply(inner.templates().specialize()).build();
        Self { inner, templates }
    }

    pub fn inner(&self) -> &dyn SqlDialect {
        self.inner.as_ref()
    }
}

impl SqlDialect for ConfiguredDialect {
    fn backend(&self) -> DatabaseBackend {
        self.inner.backend()
    }

    fn adjust_interval(
        &self,
        expr: &str,
        interval: &IntervalSpec,
        direction: Direction,
    ) -> Result<String> {
        self.inner.adjust_interval(expr, interval, direction)
    }

    fn date_bin(&self, interval: &IntervalSpec, source: &str, origin: &str) -> Result<String> {
        self.inner.date_bin(interval, source, origin)
    }

    fn date_time_cast(&self, value: &str) -> String {
        self.inner.date_time_cast(value)
    }

    fn now_timestamp(&self) -> &'static str {
        self.inner.now_timestamp()
    }

    fn series_sql(&self, ranges: &[DateRange]) -> Result<String> {
        self.inner.series_sql(ranges)
    }

    fn templates(&self) -> Arc<TemplateRegistry> {
        Arc::clone(&self.templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialects::{create_dialect, DatabaseBackend};
    use crate::error::Error;

    #[test]
    fn test_overrides_replace_only_templates() {
        let mut overrides = TemplateOverrides::default();
        overrides.remove_functions.push("DLOG10".into());
        overrides.types.insert("uuid".into(), "VARCHAR(36)".into());

        let dialect =
            ConfiguredDialect::new(create_dialect(DatabaseBackend::Redshift), &overrides);

        assert_eq!(dialect.backend(), DatabaseBackend::Redshift);
        assert_eq!(dialect.now_timestamp(), "GETDATE()");
        assert!(matches!(
            dialect.function_template("DLOG10"),
            Err(Error::UnknownTemplate(_))
        ));
        assert_eq!(dialect.templates().native_type("uuid").unwrap(), "VARCHAR(36)");
        assert!(dialect.inner().templates().has_function("DLOG10"));
    }
}
