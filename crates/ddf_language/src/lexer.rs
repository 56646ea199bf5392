//! Character classifier for DDF text.
//!
//! DDF is lexed one character at a time: the file driver keeps a
//! [`LexMode`] and asks [`classify`] what structural event the next
//! character represents in that mode. Nesting counters (comments, parens)
//! and token buffers live in the driver; this module is pure.

use ddf_foundation::{Error, ErrorKind, Result, Unterminated};

/// What the driver is currently reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LexMode {
    /// Before the `<TAG>`.
    #[default]
    WaitingTag,
    /// Between `<` and `>`.
    ReadingTag,
    /// Between entries, waiting for `[`.
    WaitingNewEntry,
    /// Between `[` and `]`.
    ReadingNewEntryName,
    /// Reading a field name, up to `=`.
    ReadingCommand,
    /// Reading a field's values, up to `;`.
    ReadingData,
    /// Inside `"..."`.
    ReadingString,
    /// Inside `{ ... }`, at any nesting depth.
    ReadingComment,
}

impl LexMode {
    /// Returns a human-readable name for this mode.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::WaitingTag => "waiting for tag",
            Self::ReadingTag => "reading tag",
            Self::WaitingNewEntry => "waiting for entry",
            Self::ReadingNewEntryName => "reading entry name",
            Self::ReadingCommand => "reading command",
            Self::ReadingData => "reading data",
            Self::ReadingString => "reading string",
            Self::ReadingComment => "reading comment",
        }
    }
}

/// Structural meaning of one character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LexEvent {
    /// Skip the character (whitespace, junk between entries).
    Nothing,
    /// `=` ending a command name.
    CommandRead,
    /// `;` directly after a command name (no `=`).
    PropertyRead,
    /// `[` starting an entry name.
    EntryStart,
    /// `]` ending an entry name.
    EntryStop,
    /// `{` opening a (possibly nested) comment.
    CommentStart,
    /// `}` closing a comment.
    CommentStop,
    /// `,` between values.
    Separator,
    /// `"` opening a string.
    StringStart,
    /// `"` closing a string.
    StringStop,
    /// `(` opening a group.
    GroupStart,
    /// `)` closing a group.
    GroupStop,
    /// `<` opening the tag.
    TagStart,
    /// `>` closing the tag.
    TagStop,
    /// `;` ending a field.
    Terminator,
    /// A character to append to the current token.
    Ok,
    /// A character that is illegal here.
    Error,
}

/// Classifies `ch` in the given mode.
#[must_use]
pub fn classify(mode: LexMode, ch: char) -> LexEvent {
    if mode == LexMode::ReadingString {
        return match ch {
            '"' => LexEvent::StringStop,
            _ => LexEvent::Ok,
        };
    }

    match ch {
        '{' => return LexEvent::CommentStart,
        '}' => return LexEvent::CommentStop,
        _ => {}
    }

    match mode {
        LexMode::ReadingComment | LexMode::ReadingString => LexEvent::Nothing,

        LexMode::WaitingTag => match ch {
            '<' => LexEvent::TagStart,
            _ => LexEvent::Nothing,
        },

        LexMode::ReadingTag => match ch {
            '>' => LexEvent::TagStop,
            c if c.is_ascii_alphanumeric() || c == '_' => LexEvent::Ok,
            _ => LexEvent::Error,
        },

        LexMode::WaitingNewEntry => match ch {
            '[' => LexEvent::EntryStart,
            _ => LexEvent::Nothing,
        },

        LexMode::ReadingNewEntryName => match ch {
            ']' => LexEvent::EntryStop,
            '[' => LexEvent::Error,
            c if c.is_whitespace() => LexEvent::Nothing,
            _ => LexEvent::Ok,
        },

        LexMode::ReadingCommand => match ch {
            '=' => LexEvent::CommandRead,
            ';' => LexEvent::PropertyRead,
            '[' => LexEvent::EntryStart,
            '(' => LexEvent::GroupStart,
            ')' => LexEvent::GroupStop,
            c if c.is_whitespace() => LexEvent::Nothing,
            _ => LexEvent::Ok,
        },

        LexMode::ReadingData => match ch {
            '"' => LexEvent::StringStart,
            ';' => LexEvent::Terminator,
            ',' => LexEvent::Separator,
            '(' => LexEvent::GroupStart,
            ')' => LexEvent::GroupStop,
            c if c.is_whitespace() => LexEvent::Nothing,
            _ => LexEvent::Ok,
        },
    }
}

/// Decodes the character following a backslash inside a quoted string.
///
/// Only `\n`, `\"` and `\\` are escapes; any other character passes
/// through literally (the backslash is dropped).
#[must_use]
pub const fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        other => other,
    }
}

/// Removes `{ ... }` comments (nested) from a piece of text.
///
/// Quoted strings are left untouched; whitespace around a comment is kept.
///
/// # Errors
///
/// Returns an error for a `}` with no open comment or a comment still
/// open at the end of the text.
pub fn elide_comments(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '{' => depth += 1,
            '}' => {
                if depth == 0 {
                    return Err(Error::new(ErrorKind::UnmatchedCommentClose));
                }
                depth -= 1;
            }
            _ if depth > 0 => {}
            '"' => {
                in_string = true;
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }

    if depth > 0 {
        return Err(Error::unterminated(Unterminated::Comment));
    }
    Ok(out)
}
