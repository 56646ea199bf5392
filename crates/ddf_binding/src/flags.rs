//! Special-flag resolution.
//!
//! Flags are named bits (`SHOOTABLE`, `NOGRAVITY`, ...) looked up in a
//! domain-supplied table. Authors may prefix a name with `ENABLE_`, or
//! negate it with `NO_`, `NOT_` or `DISABLE_`; domains that support
//! user-defined flags also accept `USER_`.

use ddf_foundation::{Diagnostics, Error, Result, names_match, strip_name_prefix};

/// One named flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlagDef {
    /// The DDF name.
    pub name: &'static str,
    /// The bit (or enumeration value).
    pub value: u32,
    /// True if setting the DDF name clears the bit (e.g. `GRAVITY` for a
    /// `NOGRAVITY` bit).
    pub negative: bool,
}

impl FlagDef {
    /// A flag whose name sets its value.
    #[must_use]
    pub const fn new(name: &'static str, value: u32) -> Self {
        Self {
            name,
            value,
            negative: false,
        }
    }

    /// A flag whose name clears its value.
    #[must_use]
    pub const fn negative(name: &'static str, value: u32) -> Self {
        Self {
            name,
            value,
            negative: true,
        }
    }
}

/// Outcome of resolving a flag name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlagResult {
    /// Set the value.
    Positive(u32),
    /// Clear the value.
    Negative(u32),
    /// A `USER_` flag.
    User(u32),
    /// No such flag.
    Unknown,
}

impl FlagResult {
    /// Applies the result to a bit mask. Returns false for `Unknown`.
    ///
    /// `User` results set the bit like `Positive`.
    pub fn apply(self, bits: &mut u32) -> bool {
        match self {
            Self::Positive(v) | Self::User(v) => *bits |= v,
            Self::Negative(v) => *bits &= !v,
            Self::Unknown => return false,
        }
        true
    }
}

const NEGATING_PREFIXES: [&str; 3] = ["NO_", "NOT_", "DISABLE_"];

fn find<'t>(name: &str, table: &'t [FlagDef]) -> Option<&'t FlagDef> {
    table.iter().find(|def| names_match(def.name, name))
}

fn sensed(def: &FlagDef, negate: bool) -> FlagResult {
    if def.negative ^ negate {
        FlagResult::Negative(def.value)
    } else {
        FlagResult::Positive(def.value)
    }
}

/// Resolves a flag name against `table`.
///
/// An exact match is tried first. With `allow_prefixes`, the name is then
/// retried without `ENABLE_`, `NO_`, `NOT_` and `DISABLE_` (the last three
/// negate), and with `allow_user` also without `USER_`. A table entry's own
/// `negative` marker is XOR-ed with any prefix negation.
#[must_use]
pub fn resolve_flag(
    name: &str,
    table: &[FlagDef],
    allow_prefixes: bool,
    allow_user: bool,
) -> FlagResult {
    let name = name.trim();
    if let Some(def) = find(name, table) {
        return sensed(def, false);
    }
    if !allow_prefixes {
        return FlagResult::Unknown;
    }

    if let Some(def) = strip_name_prefix(name, "ENABLE_").and_then(|rest| find(rest, table)) {
        return sensed(def, false);
    }
    for prefix in NEGATING_PREFIXES {
        if let Some(def) = strip_name_prefix(name, prefix).and_then(|rest| find(rest, table)) {
            return sensed(def, true);
        }
    }
    if allow_user {
        if let Some(def) = strip_name_prefix(name, "USER_").and_then(|rest| find(rest, table)) {
            return FlagResult::User(def.value);
        }
    }
    FlagResult::Unknown
}

/// Resolves `name` and applies it to `bits`.
///
/// Unknown names go through the strict/lax policy; in lax mode they are
/// ignored.
///
/// # Errors
///
/// An unknown flag in strict mode.
pub fn apply_flag(
    name: &str,
    table: &[FlagDef],
    bits: &mut u32,
    diag: &mut Diagnostics,
) -> Result<()> {
    if !resolve_flag(name, table, true, false).apply(bits) {
        diag.complain(Error::unknown_flag(name))?;
    }
    Ok(())
}
