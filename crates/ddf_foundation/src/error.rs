//! Error types for the DDF interpreter.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Value parsers and resolvers only ever produce an [`ErrorKind`]; the file
//! driver attaches the [`ErrorContext`] (file, line, entry, raw line text).

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the DDF crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for DDF loading.
#[derive(Debug, Error)]
#[error("{kind}{}", DisplayContext(.context.as_ref()))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Where in the DDF source the error occurred, if known.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Adds context only if none has been attached yet.
    #[must_use]
    pub fn or_context(mut self, context: impl FnOnce() -> ErrorContext) -> Self {
        if self.context.is_none() {
            self.context = Some(context());
        }
        self
    }

    /// Creates a bad value error for the named value kind.
    #[must_use]
    pub fn bad_value(what: &'static str, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadValue {
            what,
            value: value.into(),
        })
    }

    /// Creates a non-numeric value error.
    #[must_use]
    pub fn not_numeric(value: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotNumeric(value.into()))
    }

    /// Creates an out of range error.
    #[must_use]
    pub fn out_of_range(what: &'static str, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfRange {
            what,
            value: value.into(),
        })
    }

    /// Creates an unknown field error.
    #[must_use]
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownField(field.into()))
    }

    /// Creates an unknown special flag error.
    #[must_use]
    pub fn unknown_flag(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownFlag(name.into()))
    }

    /// Creates an unknown state label error.
    #[must_use]
    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownLabel(label.into()))
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax(message.into()))
    }

    /// Creates a bad state definition error.
    #[must_use]
    pub fn bad_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadState(message.into()))
    }

    /// Creates an unresolved reference error.
    #[must_use]
    pub fn unresolved(name: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedReference {
            name: name.into(),
            purpose: purpose.into(),
        })
    }

    /// Creates an unterminated construct error.
    #[must_use]
    pub fn unterminated(what: Unterminated) -> Self {
        Self::new(ErrorKind::Unterminated(what))
    }

    /// Returns true if strict/lax policy may downgrade this error to a warning.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// The file's leading `<TAG>` did not match the reader's tag.
    #[error("bad tag: expected <{expected}>, found <{found}>")]
    BadTag {
        /// Tag the reader expects.
        expected: String,
        /// Tag found in the file.
        found: String,
    },

    /// The file never declared a `<TAG>`.
    #[error("missing <{0}> tag")]
    MissingTag(String),

    /// A construct was still open when the entry or file ended.
    #[error("unterminated {0}")]
    Unterminated(Unterminated),

    /// A `}` without a matching `{`.
    #[error("unmatched '}}' closing a comment that was never opened")]
    UnmatchedCommentClose,

    /// `#CLEARALL` after the first entry started.
    #[error("#CLEARALL cannot be used inside an entry")]
    ClearAllMidFile,

    /// A malformed `#` directive line.
    #[error("bad directive: {0}")]
    BadDirective(String),

    /// A numeric field received a non-numeric token.
    #[error("bad numeric value: {0}")]
    NotNumeric(String),

    /// A typed value parser rejected its input.
    #[error("bad {what} value: {value}")]
    BadValue {
        /// Kind of value being parsed (e.g. "percent").
        what: &'static str,
        /// The offending text.
        value: String,
    },

    /// A value parsed but lies outside its legal range.
    #[error("{what} value out of range: {value}")]
    OutOfRange {
        /// Kind of value being parsed.
        what: &'static str,
        /// The offending text.
        value: String,
    },

    /// A field name no binding accepts.
    #[error("unknown command: {0}")]
    UnknownField(String),

    /// A special flag name the table does not know.
    #[error("unknown special flag: {0}")]
    UnknownFlag(String),

    /// A state redirector names a label that does not exist.
    #[error("unknown state label: {0}")]
    UnknownLabel(String),

    /// A state names an action routine that does not exist.
    #[error("unknown code pointer: {0}")]
    UnknownAction(String),

    /// A malformed state definition.
    #[error("bad state: {0}")]
    BadState(String),

    /// A deferred name reference could not be resolved.
    #[error("unknown {purpose}: {name}")]
    UnresolvedReference {
        /// The name that was referenced.
        name: String,
        /// What the name was supposed to refer to.
        purpose: String,
    },

    /// Structural syntax error.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A text source could not supply a file.
    #[error("cannot read {name}: {message}")]
    Source {
        /// File or lump name.
        name: String,
        /// Underlying failure.
        message: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Returns true for the warn-or-fatal family.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownField(_)
                | Self::UnknownFlag(_)
                | Self::OutOfRange { .. }
                | Self::UnknownAction(_)
        )
    }
}

/// Constructs that must be closed before an entry or file ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unterminated {
    /// `{ ... }` comment.
    Comment,
    /// Quoted string.
    String,
    /// `( ... )` group.
    Parens,
    /// `<TAG` without `>`.
    Tag,
    /// `[NAME` without `]`.
    EntryName,
    /// `FIELD = value` without `;`.
    Field,
}

impl fmt::Display for Unterminated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::Parens => "brackets",
            Self::Tag => "tag",
            Self::EntryName => "entry name",
            Self::Field => "field (missing ';')",
        };
        f.write_str(text)
    }
}

/// Context about where in the DDF source an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Source file or archive entry name.
    pub file: Option<String>,
    /// 1-based line number.
    pub line: Option<usize>,
    /// Name of the entry being parsed.
    pub entry: Option<String>,
    /// Raw text of the line.
    pub line_text: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Sets the line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Sets the current entry name.
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Sets the raw line text.
    #[must_use]
    pub fn with_line_text(mut self, text: impl Into<String>) -> Self {
        self.line_text = Some(text.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "at {file}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        } else if let Some(line) = self.line {
            write!(f, "at line {line}")?;
        }
        if let Some(entry) = &self.entry {
            write!(f, " [{entry}]")?;
        }
        if let Some(text) = &self.line_text {
            write!(f, "\n  | {}", text.trim_end())?;
        }
        Ok(())
    }
}

struct DisplayContext<'a>(Option<&'a ErrorContext>);

impl fmt::Display for DisplayContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ctx) => write!(f, " {ctx}"),
            None => Ok(()),
        }
    }
}
