//! Warning collection and the strict/lax policy.
//!
//! [`Diagnostics`] is handed to every reader callback and value parser that
//! can produce a warn-or-fatal problem. The file driver keeps its location
//! current so warnings carry the same context errors do.

use std::fmt;

use crate::config::{LoadConfig, ParseMode};
use crate::error::{Error, ErrorContext, Result};

/// A downgraded problem recorded in lax mode, or a plain warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Warning {
    /// Human-readable description.
    pub message: String,
    /// Where the warning was raised.
    pub context: ErrorContext,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.message, self.context)
    }
}

/// Collects warnings and applies the strict/lax policy.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    config: LoadConfig,
    location: ErrorContext,
    warnings: Vec<Warning>,
    total: usize,
}

impl Diagnostics {
    /// Creates diagnostics for the given configuration.
    #[must_use]
    pub fn new(config: LoadConfig) -> Self {
        Self {
            config,
            location: ErrorContext::new(),
            warnings: Vec::new(),
            total: 0,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Returns the active parse mode.
    #[must_use]
    pub fn mode(&self) -> ParseMode {
        self.config.mode
    }

    /// Returns the current source location.
    #[must_use]
    pub fn location(&self) -> &ErrorContext {
        &self.location
    }

    /// Replaces the current source location.
    pub fn set_location(&mut self, location: ErrorContext) {
        self.location = location;
    }

    /// Mutable access to the current source location.
    pub fn location_mut(&mut self) -> &mut ErrorContext {
        &mut self.location
    }

    /// Records a warning at the current location.
    pub fn warn(&mut self, message: impl Into<String>) {
        let warning = Warning {
            message: message.into(),
            context: self.location.clone(),
        };
        if self.config.log_warnings {
            log::warn!("{warning}");
        }
        self.total += 1;
        if self.warnings.len() < self.config.max_warnings {
            self.warnings.push(warning);
        }
    }

    /// Applies the strict/lax policy to a recoverable problem.
    ///
    /// Strict mode (or an unrecoverable error) returns `Err`; lax mode
    /// records a warning and returns `Ok` so the caller applies its fallback.
    ///
    /// # Errors
    ///
    /// Returns `err` in strict mode or when it is not recoverable.
    pub fn complain(&mut self, err: Error) -> Result<()> {
        if self.config.mode == ParseMode::Strict || !err.is_recoverable() {
            return Err(err);
        }
        self.warn(err.kind.to_string());
        Ok(())
    }

    /// Returns the stored warnings.
    #[must_use]
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns the total number of warnings raised, stored or not.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.total
    }

    /// Drains the stored warnings.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}
