//! Error context and chaining utilities
//!
//! Lets callers wrap a failure with what they were doing when it happened,
//! e.g. which config file or which dialect was being built.

use super::Error;
use std::fmt;

/// Trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to the error
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Into<String>;

    /// Add context with lazy evaluation
    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> ErrorContext<T> for Result<T, Error> {
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Into<String>,
    {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

/// Flattened view of a context chain, outermost message first
pub struct ErrorChain<'a> {
    error: &'a Error,
    chain: Vec<String>,
}

impl<'a> ErrorChain<'a> {
    pub fn new(error: &'a Error) -> Self {
        let mut chain = Vec::new();
        let mut current = error;
        loop {
            match current {
                Error::WithContext { message, source } => {
                    chain.push(message.clone());
                    current = source;
                }
                other => {
                    chain.push(other.to_string());
                    break;
                }
            }
        }
        Self { error, chain }
    }

    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    pub fn root_cause(&self) -> &Error {
        self.error.root()
    }

    /// Format the error chain for logging
    pub fn format_for_log(&self) -> String {
        self.chain.join(" -> ")
    }
}

impl<'a> fmt::Display for ErrorChain<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.chain.len() == 1 {
            return write!(f, "{}", self.chain[0]);
        }
        write!(f, "{}\n\nCaused by:", self.chain[0])?;
        for (i, msg) in self.chain[1..].iter().enumerate() {
            write!(f, "\n  {}. {}", i + 1, msg)?;
        }
        Ok(())
    }
}
