//! Directive preprocessor: `#DEFINE`, `#CLEARALL`, `#VERSION` and `//` comments.
//!
//! Directives are whole-line forms recognized before the character lexer
//! sees the line. Macros defined with `#DEFINE` are substituted into bare
//! (unquoted) value tokens.

use ddf_foundation::{Error, ErrorKind, Result, names_match};

use crate::lexer::elide_comments;

/// A single `#DEFINE` macro.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MacroDef {
    /// Macro name.
    pub name: String,
    /// Replacement text.
    pub value: String,
}

/// Table of `#DEFINE` macros.
///
/// Lookups search most-recent-first, so redefining a name shadows the
/// previous definition.
#[derive(Clone, Debug, Default)]
pub struct MacroTable {
    macros: Vec<MacroDef>,
}

impl MacroTable {
    /// Creates an empty macro table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a macro definition.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.macros.push(MacroDef {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Looks up a macro by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.macros
            .iter()
            .rev()
            .find(|m| names_match(&m.name, name))
            .map(|m| m.value.as_str())
    }

    /// Substitutes `token` if it names a macro, otherwise returns it unchanged.
    #[must_use]
    pub fn substitute<'a>(&'a self, token: &'a str) -> &'a str {
        if token.is_empty() {
            return token;
        }
        self.get(token).unwrap_or(token)
    }

    /// Returns the number of definitions (including shadowed ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    /// Returns true if no macros are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Clears all macros.
    pub fn clear(&mut self) {
        self.macros.clear();
    }
}

/// A recognized directive line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `#DEFINE name value`
    Define {
        /// Macro name.
        name: String,
        /// Replacement text (rest of the line, trimmed).
        value: String,
    },
    /// `#CLEARALL`
    ClearAll,
    /// `#VERSION ...` (ignored)
    Version(String),
}

/// Recognizes a directive line.
///
/// Returns `Ok(None)` for lines that are not one of the three directives
/// (including `#LABEL` redirectors continuing a state list).
///
/// # Errors
///
/// Returns an error for a malformed `#DEFINE`.
pub fn parse_directive(line: &str) -> Result<Option<Directive>> {
    let trimmed = line.trim_start();
    let Some(body) = trimmed.strip_prefix('#') else {
        return Ok(None);
    };

    let (word, rest) = match body.find(char::is_whitespace) {
        Some(pos) => (&body[..pos], body[pos..].trim()),
        None => (body.trim_end(), ""),
    };

    if word.eq_ignore_ascii_case("DEFINE") {
        let rest = elide_comments(rest)?;
        let rest = rest.trim();
        let (name, value) = match rest.find(char::is_whitespace) {
            Some(pos) => (&rest[..pos], rest[pos..].trim()),
            None => (rest, ""),
        };
        if name.is_empty() {
            return Err(Error::new(ErrorKind::BadDirective(
                "#DEFINE without a name".to_string(),
            )));
        }
        return Ok(Some(Directive::Define {
            name: name.to_string(),
            value: value.to_string(),
        }));
    }
    if word.eq_ignore_ascii_case("CLEARALL") {
        return Ok(Some(Directive::ClearAll));
    }
    if word.eq_ignore_ascii_case("VERSION") {
        return Ok(Some(Directive::Version(rest.to_string())));
    }
    Ok(None)
}

/// Strips a `//` comment from a line, ignoring `//` inside quoted strings.
#[must_use]
pub fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
        i += 1;
    }
    line
}
