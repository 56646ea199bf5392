//! Action tables.
//!
//! Each domain supplies the actions its states may name, together with the
//! kind of argument each one takes in `ACTION(ARG)` form.

use ddf_binding::{parse_float, parse_numeric, parse_percent, split_list};
use ddf_foundation::{Diagnostics, Error, Result, names_match};

use crate::state::ActionArg;

/// The argument an action accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgKind {
    /// No argument.
    None,
    /// An integer.
    Numeric,
    /// A float.
    Float,
    /// A percentage.
    Percent,
    /// Free text.
    String,
    /// `LABEL[:OFFSET][,CHANCE%]`, a jump to another state.
    Jump,
}

/// One named action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionCode {
    /// DDF name.
    pub name: &'static str,
    /// Argument kind.
    pub arg: ArgKind,
}

impl ActionCode {
    /// Creates an action entry.
    #[must_use]
    pub const fn new(name: &'static str, arg: ArgKind) -> Self {
        Self { name, arg }
    }
}

/// A domain's list of actions.
#[derive(Clone, Copy, Debug)]
pub struct ActionTable(&'static [ActionCode]);

impl ActionTable {
    /// An empty table (states may not name actions).
    pub const EMPTY: Self = Self(&[]);

    /// Wraps a static list.
    #[must_use]
    pub const fn new(codes: &'static [ActionCode]) -> Self {
        Self(codes)
    }

    /// Finds an action by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&'static ActionCode> {
        self.0.iter().find(|code| names_match(code.name, name))
    }

    /// Returns the number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A parsed jump argument before the label is resolved.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct JumpTarget<'a> {
    pub label: &'a str,
    pub offset: &'a str,
    pub chance: f32,
}

/// Splits `LABEL[:OFFSET][,CHANCE]`.
pub(crate) fn parse_jump<'a>(arg: &'a str, diag: &mut Diagnostics) -> Result<JumpTarget<'a>> {
    let mut parts = split_list(arg, ',').into_iter();
    let target = parts.next().unwrap_or_default().trim();
    if target.is_empty() {
        return Err(Error::bad_state("jump without a label"));
    }
    let chance = match parts.next() {
        Some(text) => parse_percent(text, diag)?,
        None => 1.0,
    };
    let (label, offset) = target.split_once(':').unwrap_or((target, ""));
    Ok(JumpTarget {
        label: label.trim(),
        offset: offset.trim(),
        chance,
    })
}

/// Parses a non-jump argument of the given kind.
pub(crate) fn parse_arg(kind: ArgKind, arg: &str, diag: &mut Diagnostics) -> Result<ActionArg> {
    Ok(match kind {
        ArgKind::None | ArgKind::Jump => ActionArg::None,
        ArgKind::Numeric => ActionArg::Numeric(parse_numeric(arg)?),
        ArgKind::Float => ActionArg::Float(parse_float(arg, diag)?),
        ArgKind::Percent => ActionArg::Percent(parse_percent(arg, diag)?),
        ArgKind::String => ActionArg::String(arg.trim().to_string()),
    })
}
