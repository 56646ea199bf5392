//! Configuration for a DDF load.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Game ticks per second; `TIME` values in seconds are scaled by this.
pub const TIC_RATE: i32 = 35;

/// How recoverable parse problems are treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParseMode {
    /// Recoverable problems abort the load.
    #[default]
    Strict,
    /// Recoverable problems are logged and a fallback value is used.
    Lax,
}

/// Configuration for loading DDF files.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoadConfig {
    /// Strict or lax handling of recoverable problems.
    pub mode: ParseMode,

    /// Emit every warning through the `log` facade.
    pub log_warnings: bool,

    /// Maximum number of warnings kept in memory (the rest are only counted).
    pub max_warnings: usize,

    /// Log every successfully bound field at `trace` level.
    pub trace_fields: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::Strict,
            log_warnings: true,
            max_warnings: 1000,
            trace_fields: false,
        }
    }
}

impl LoadConfig {
    /// Creates a strict configuration.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// Creates a lax configuration.
    #[must_use]
    pub fn lax() -> Self {
        Self {
            mode: ParseMode::Lax,
            ..Self::default()
        }
    }

    /// Builder method to set the parse mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder method to enable/disable logging of warnings.
    #[must_use]
    pub fn with_log_warnings(mut self, log: bool) -> Self {
        self.log_warnings = log;
        self
    }

    /// Builder method to set the stored warning limit.
    #[must_use]
    pub fn with_max_warnings(mut self, max: usize) -> Self {
        self.max_warnings = max;
        self
    }

    /// Builder method to enable/disable field tracing.
    #[must_use]
    pub fn with_trace_fields(mut self, trace: bool) -> Self {
        self.trace_fields = trace;
        self
    }

    /// Returns true in strict mode.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.mode == ParseMode::Strict
    }
}
