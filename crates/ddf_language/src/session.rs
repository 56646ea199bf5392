//! Session state for a DDF load.
//!
//! The session holds everything that outlives a single file: the load
//! configuration, collected diagnostics and the `#DEFINE` macro table.

use ddf_foundation::{Diagnostics, LoadConfig, Result, Warning};

use crate::driver::{FileDriver, FileSummary};
use crate::preprocessor::MacroTable;
use crate::reader::DdfReader;

/// Session state threaded through every file of a load.
#[derive(Debug, Default)]
pub struct Session {
    diagnostics: Diagnostics,
    macros: MacroTable,
    files: usize,
}

impl Session {
    /// Creates a new session with the given configuration.
    #[must_use]
    pub fn new(config: LoadConfig) -> Self {
        Self {
            diagnostics: Diagnostics::new(config),
            macros: MacroTable::new(),
            files: 0,
        }
    }

    /// Returns the load configuration.
    #[must_use]
    pub fn config(&self) -> &LoadConfig {
        self.diagnostics.config()
    }

    /// Returns the diagnostics collected so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Mutable access to the diagnostics (used by post-load resolution).
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Returns the macro table of the file being parsed.
    #[must_use]
    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Returns the number of files parsed so far.
    #[must_use]
    pub fn files_parsed(&self) -> usize {
        self.files
    }

    /// Parses one file with the given reader.
    ///
    /// `#DEFINE` macros are file-scoped: they are cleared once the file is
    /// done, whether it parsed or not.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error, with its source location attached.
    pub fn parse_file(
        &mut self,
        reader: &mut dyn DdfReader,
        file: &str,
        text: &str,
    ) -> Result<FileSummary> {
        let result =
            FileDriver::new(reader, &mut self.diagnostics, &mut self.macros).run(file, text);
        self.macros.clear();
        self.files += 1;
        result
    }

    /// Ends the load: clears macros and returns every stored warning.
    pub fn end_load(&mut self) -> Vec<Warning> {
        self.macros.clear();
        let warnings = self.diagnostics.take_warnings();
        log::debug!(
            "load finished: {} files, {} warnings",
            self.files,
            self.diagnostics.warning_count()
        );
        warnings
    }
}
