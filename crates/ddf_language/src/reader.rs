//! The callback protocol each content domain implements.

use ddf_foundation::{Diagnostics, Result};

/// One value of a field, as handed to [`DdfReader::parse_field`].
///
/// `FIELD = a, b, c;` produces three events with indices 0, 1, 2 and
/// `is_last` set on the third.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field<'a> {
    /// The command name (e.g. `SPEED`, `STATES(SPAWN)`, `DAMAGE.VAL`).
    pub command: &'a str,
    /// The value after macro substitution (quotes removed for strings).
    pub value: &'a str,
    /// Position of this value in the comma-separated list.
    pub index: usize,
    /// True for the value terminated by `;`.
    pub is_last: bool,
    /// True if the value was written as a quoted string.
    pub quoted: bool,
}

impl<'a> Field<'a> {
    /// Creates a single, unquoted, last value (convenient in tests).
    #[must_use]
    pub const fn single(command: &'a str, value: &'a str) -> Self {
        Self {
            command,
            value,
            index: 0,
            is_last: true,
            quoted: false,
        }
    }

    /// Splits `NAME(ARG)` commands into name and argument.
    #[must_use]
    pub fn command_argument(&self) -> Option<(&'a str, &'a str)> {
        let open = self.command.find('(')?;
        let inner = self.command[open + 1..].strip_suffix(')')?;
        Some((&self.command[..open], inner))
    }
}

/// The four entry points a content domain supplies to the file driver.
///
/// A reader is registered once per domain and invoked for every file of
/// that domain. The driver guarantees the call order
/// `clear_all? (start_entry parse_field* finish_entry)*`.
pub trait DdfReader {
    /// The tag the file must start with, without angle brackets (`THINGS`).
    fn tag(&self) -> &str;

    /// Short identifying name used in diagnostics.
    fn short_name(&self) -> &str;

    /// Starts a new entry. `extend` is true for `[++NAME]`.
    ///
    /// # Errors
    ///
    /// Domain-specific (e.g. extending an entry that does not exist).
    fn start_entry(&mut self, name: &str, extend: bool, diag: &mut Diagnostics) -> Result<()>;

    /// Handles one field value of the current entry.
    ///
    /// # Errors
    ///
    /// Unknown fields and bad values, subject to the strict/lax policy.
    fn parse_field(&mut self, field: &Field<'_>, diag: &mut Diagnostics) -> Result<()>;

    /// Completes the current entry.
    ///
    /// # Errors
    ///
    /// Validation failures and unresolved state labels.
    fn finish_entry(&mut self, diag: &mut Diagnostics) -> Result<()>;

    /// Handles `#CLEARALL`: discard every existing entry of this domain.
    ///
    /// # Errors
    ///
    /// Domain-specific.
    fn clear_all(&mut self, diag: &mut Diagnostics) -> Result<()>;

    /// Discards a half-parsed entry after an error escaped.
    ///
    /// Called instead of `finish_entry` when parsing of the file is
    /// aborted while an entry is open.
    fn abort_entry(&mut self) {}
}
