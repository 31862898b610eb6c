use thiserror::Error;

pub mod context;

pub type Result<T> = std::result::Result<T, Error>;

pub use context::{ErrorChain, ErrorContext};

/// Main error type for sqlcal
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed interval '{input}': {reason}")]
    MalformedInterval { input: String, reason: String },

    #[error("Complex intervals like \"{0}\" are not supported. Please use Year to Month or Day to second intervals")]
    UnsupportedCompositeInterval(String),

    #[error("Invalid interval magnitude: {0}")]
    InvalidIntervalMagnitude(String),

    #[error("Unknown function template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Cannot build a date series from an empty list of ranges")]
    EmptySeries,

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Unknown dialect: {0}")]
    UnknownDialect(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Error with context chain
    #[error("{message}")]
    WithContext {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn malformed_interval(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInterval {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_composite(interval: impl Into<String>) -> Self {
        Self::UnsupportedCompositeInterval(interval.into())
    }

    pub fn invalid_magnitude(msg: impl Into<String>) -> Self {
        Self::InvalidIntervalMagnitude(msg.into())
    }

    pub fn invalid_date_range(msg: impl Into<String>) -> Self {
        Self::InvalidDateRange(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    // Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            message: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context wrappers
    pub fn root(&self) -> &Error {
        let mut current = self;
        while let Error::WithContext { source, .. } = current {
            current = source;
        }
        current
    }

    /// Get a stable error code for the compiler's diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::MalformedInterval { .. } => "E_MALFORMED_INTERVAL",
            Error::UnsupportedCompositeInterval(_) => "E_COMPOSITE_INTERVAL",
            Error::InvalidIntervalMagnitude(_) => "E_INTERVAL_MAGNITUDE",
            Error::UnknownTemplate(_) => "E_UNKNOWN_TEMPLATE",
            Error::UnknownType(_) => "E_UNKNOWN_TYPE",
            Error::EmptySeries => "E_EMPTY_SERIES",
            Error::InvalidDateRange(_) => "E_DATE_RANGE",
            Error::UnknownDialect(_) => "E_UNKNOWN_DIALECT",
            Error::Config(_) => "E_CONFIG",
            Error::Io(_) => "E_IO",
            Error::Json(_) => "E_JSON",
            Error::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error points at a bad query shape rather than a broken build
    ///
    /// Registry misses and dialect lookups mean a specialization is missing,
    /// which no change to the query can fix.
    pub fn is_query_error(&self) -> bool {
        match self {
            Error::MalformedInterval { .. }
            | Error::UnsupportedCompositeInterval(_)
            | Error::InvalidIntervalMagnitude(_)
            | Error::EmptySeries
            | Error::InvalidDateRange(_) => true,
            Error::WithContext { source, .. } => source.is_query_error(),
            _ => false,
        }
    }
}
