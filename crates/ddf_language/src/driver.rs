//! The file driver: feeds DDF text through the lexer and calls the reader.
//!
//! A whole file is processed line by line. Each line is first offered to
//! the directive preprocessor, then stripped of `//` comments and streamed
//! character by character through [`classify`]. Structural events drive
//! the entry state machine and turn into [`DdfReader`] callbacks.

use ddf_foundation::{Diagnostics, Error, ErrorKind, Result, Unterminated};

use crate::lexer::{LexEvent, LexMode, classify, unescape};
use crate::preprocessor::{Directive, MacroTable, parse_directive, strip_line_comment};
use crate::reader::{DdfReader, Field};

/// Counts reported after a file has been parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FileSummary {
    /// Number of entries completed.
    pub entries: usize,
    /// Number of field values handed to the reader.
    pub fields: usize,
    /// Number of lines read.
    pub lines: usize,
}

/// The driver's cursor through one file.
#[derive(Debug, Default)]
pub struct ParseState {
    mode: LexMode,
    comment_depth: usize,
    paren_depth: usize,
    /// Tag text, entry name or field value being accumulated.
    token: String,
    command: String,
    index: usize,
    quoted: bool,
    escape: bool,
    entry_open: bool,
    seen_entry: bool,
    cleared: bool,
    summary: FileSummary,
}

impl ParseState {
    /// Creates a fresh cursor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current lexer mode.
    #[must_use]
    pub fn mode(&self) -> LexMode {
        self.mode
    }

    /// Returns the comment nesting depth.
    #[must_use]
    pub fn comment_depth(&self) -> usize {
        self.comment_depth
    }

    /// Returns the parenthesis nesting depth.
    #[must_use]
    pub fn paren_depth(&self) -> usize {
        self.paren_depth
    }
}

/// Drives one file through a reader.
pub struct FileDriver<'a> {
    reader: &'a mut dyn DdfReader,
    diag: &'a mut Diagnostics,
    macros: &'a mut MacroTable,
    state: ParseState,
}

impl<'a> FileDriver<'a> {
    /// Creates a driver for one file.
    pub fn new(
        reader: &'a mut dyn DdfReader,
        diag: &'a mut Diagnostics,
        macros: &'a mut MacroTable,
    ) -> Self {
        Self {
            reader,
            diag,
            macros,
            state: ParseState::new(),
        }
    }

    /// Parses a whole file.
    ///
    /// Any error is returned with the file, line, entry and raw line text
    /// attached. If an entry was open when the error escaped, the reader's
    /// `abort_entry` is called so no half-built entry survives.
    ///
    /// # Errors
    ///
    /// Fatal structural errors, and recoverable ones in strict mode.
    pub fn run(mut self, file: &str, text: &str) -> Result<FileSummary> {
        {
            let loc = self.diag.location_mut();
            loc.file = Some(file.to_string());
            loc.line = None;
            loc.entry = None;
            loc.line_text = None;
        }
        log::debug!("parsing {file} as <{}>", self.reader.tag());

        match self.run_inner(text) {
            Ok(()) => {
                log::debug!(
                    "{file}: {} entries, {} fields",
                    self.state.summary.entries,
                    self.state.summary.fields
                );
                Ok(self.state.summary)
            }
            Err(err) => {
                if self.state.entry_open {
                    self.reader.abort_entry();
                }
                let location = self.diag.location().clone();
                Err(err.or_context(|| location))
            }
        }
    }

    fn run_inner(&mut self, text: &str) -> Result<()> {
        for (number, raw) in text.lines().enumerate() {
            {
                let loc = self.diag.location_mut();
                loc.line = Some(number + 1);
                loc.line_text = Some(raw.to_string());
            }
            self.state.summary.lines += 1;

            if self.state.comment_depth == 0 {
                if let Some(directive) = parse_directive(raw)? {
                    self.directive(directive)?;
                    continue;
                }
            }

            for ch in strip_line_comment(raw).chars() {
                self.step(ch)?;
            }
            self.end_line()?;
        }
        self.end_file()
    }

    fn directive(&mut self, directive: Directive) -> Result<()> {
        match directive {
            Directive::Define { name, value } => {
                log::trace!("#DEFINE {name} = {value}");
                self.macros.define(name, value);
            }
            Directive::ClearAll => {
                let before_entries = matches!(
                    self.state.mode,
                    LexMode::WaitingTag | LexMode::WaitingNewEntry
                );
                if self.state.seen_entry || !before_entries {
                    return Err(Error::new(ErrorKind::ClearAllMidFile));
                }
                if self.state.cleared {
                    self.diag.warn("duplicate #CLEARALL ignored");
                } else {
                    self.state.cleared = true;
                    self.reader.clear_all(self.diag)?;
                }
            }
            Directive::Version(_) => {}
        }
        Ok(())
    }

    fn end_line(&mut self) -> Result<()> {
        if self.state.mode == LexMode::ReadingString {
            self.diag.warn("unterminated string (closed at end of line)");
            self.state.mode = LexMode::ReadingData;
            self.state.escape = false;
            return Ok(());
        }
        self.step('\n')
    }

    /// Processes one character.
    fn step(&mut self, ch: char) -> Result<()> {
        let st = &mut self.state;

        if st.mode == LexMode::ReadingString && st.comment_depth == 0 {
            if st.escape {
                st.escape = false;
                st.token.push(unescape(ch));
                return Ok(());
            }
            if ch == '\\' {
                st.escape = true;
                return Ok(());
            }
        }

        let effective = if st.comment_depth > 0 {
            LexMode::ReadingComment
        } else {
            st.mode
        };

        match classify(effective, ch) {
            LexEvent::Nothing => {}
            LexEvent::CommentStart => st.comment_depth += 1,
            LexEvent::CommentStop => {
                if st.comment_depth == 0 {
                    return Err(Error::new(ErrorKind::UnmatchedCommentClose));
                }
                st.comment_depth -= 1;
            }
            LexEvent::TagStart => {
                st.mode = LexMode::ReadingTag;
                st.token.clear();
            }
            LexEvent::TagStop => return self.tag_read(),
            LexEvent::Ok => match st.mode {
                LexMode::ReadingCommand => st.command.push(ch),
                _ => st.token.push(ch),
            },
            LexEvent::Error => {
                return Err(Error::syntax(format!(
                    "unexpected character '{}' while {}",
                    ch.escape_default(),
                    st.mode.name()
                )));
            }
            LexEvent::EntryStart => {
                if st.mode == LexMode::ReadingCommand && !st.command.is_empty() {
                    let command = std::mem::take(&mut st.command);
                    self.diag
                        .warn(format!("command '{command}' has no value before new entry"));
                }
                let st = &mut self.state;
                if st.paren_depth > 0 {
                    return Err(Error::unterminated(Unterminated::Parens));
                }
                st.mode = LexMode::ReadingNewEntryName;
                st.token.clear();
            }
            LexEvent::EntryStop => return self.entry_read(),
            LexEvent::CommandRead => {
                if st.paren_depth > 0 {
                    return Err(Error::unterminated(Unterminated::Parens));
                }
                st.mode = LexMode::ReadingData;
                st.token.clear();
                st.index = 0;
                st.quoted = false;
            }
            LexEvent::PropertyRead => return self.property_read(),
            LexEvent::Separator => {
                if st.paren_depth > 0 {
                    st.token.push(ch);
                } else {
                    self.emit(false)?;
                    self.state.index += 1;
                }
            }
            LexEvent::Terminator => {
                if st.paren_depth > 0 {
                    return Err(Error::unterminated(Unterminated::Parens));
                }
                self.emit(true)?;
                let st = &mut self.state;
                st.mode = LexMode::ReadingCommand;
                st.command.clear();
                st.index = 0;
            }
            LexEvent::GroupStart => {
                st.paren_depth += 1;
                match st.mode {
                    LexMode::ReadingCommand => st.command.push(ch),
                    _ => st.token.push(ch),
                }
            }
            LexEvent::GroupStop => {
                if st.paren_depth == 0 {
                    return Err(Error::syntax("unmatched ')'"));
                }
                st.paren_depth -= 1;
                match st.mode {
                    LexMode::ReadingCommand => st.command.push(ch),
                    _ => st.token.push(ch),
                }
            }
            LexEvent::StringStart => {
                st.mode = LexMode::ReadingString;
                st.quoted = true;
            }
            LexEvent::StringStop => st.mode = LexMode::ReadingData,
        }
        Ok(())
    }

    fn tag_read(&mut self) -> Result<()> {
        let found = std::mem::take(&mut self.state.token);
        let expected = self.reader.tag();
        if found != expected {
            return Err(Error::new(ErrorKind::BadTag {
                expected: expected.to_string(),
                found,
            }));
        }
        self.state.mode = LexMode::WaitingNewEntry;
        Ok(())
    }

    fn entry_read(&mut self) -> Result<()> {
        let raw = std::mem::take(&mut self.state.token);
        let (name, extend) = match raw.strip_prefix("++") {
            Some(rest) => (rest, true),
            None => (raw.as_str(), false),
        };
        if name.is_empty() {
            return Err(Error::syntax("empty entry name"));
        }

        if self.state.entry_open {
            self.state.entry_open = false;
            self.reader.finish_entry(self.diag)?;
            self.state.summary.entries += 1;
        }

        self.diag.location_mut().entry = Some(name.to_string());
        self.reader.start_entry(name, extend, self.diag)?;
        self.state.entry_open = true;
        self.state.seen_entry = true;
        self.state.mode = LexMode::ReadingCommand;
        self.state.command.clear();
        Ok(())
    }

    fn property_read(&mut self) -> Result<()> {
        if self.state.paren_depth > 0 {
            return Err(Error::unterminated(Unterminated::Parens));
        }
        if self.state.command.is_empty() {
            self.diag.warn("unexpected semicolon");
            return Ok(());
        }
        self.diag.warn(format!(
            "unexpected semicolon after '{}' (missing '=')",
            self.state.command
        ));
        self.state.token.clear();
        self.state.index = 0;
        self.state.quoted = false;
        self.emit(true)?;
        self.state.command.clear();
        Ok(())
    }

    /// Hands the accumulated value to the reader.
    fn emit(&mut self, is_last: bool) -> Result<()> {
        let st = &mut self.state;
        let value = if st.quoted {
            st.token.as_str()
        } else {
            self.macros.substitute(&st.token)
        };
        let field = Field {
            command: &st.command,
            value,
            index: st.index,
            is_last,
            quoted: st.quoted,
        };
        if self.diag.config().trace_fields {
            log::trace!(
                "{}: {} [{}] = {:?}",
                self.reader.short_name(),
                field.command,
                field.index,
                field.value
            );
        }
        self.reader.parse_field(&field, self.diag)?;

        st.summary.fields += 1;
        st.token.clear();
        st.quoted = false;
        Ok(())
    }

    fn end_file(&mut self) -> Result<()> {
        let st = &self.state;
        if st.comment_depth > 0 {
            return Err(Error::unterminated(Unterminated::Comment));
        }
        match st.mode {
            LexMode::WaitingTag => {
                return Err(Error::new(ErrorKind::MissingTag(
                    self.reader.tag().to_string(),
                )));
            }
            LexMode::ReadingTag => return Err(Error::unterminated(Unterminated::Tag)),
            LexMode::ReadingNewEntryName => {
                return Err(Error::unterminated(Unterminated::EntryName));
            }
            LexMode::ReadingData => return Err(Error::unterminated(Unterminated::Field)),
            LexMode::ReadingString => return Err(Error::unterminated(Unterminated::String)),
            LexMode::ReadingCommand if !st.command.is_empty() => {
                if st.paren_depth > 0 {
                    return Err(Error::unterminated(Unterminated::Parens));
                }
                return Err(Error::unterminated(Unterminated::Field));
            }
            _ => {}
        }
        if st.paren_depth > 0 {
            return Err(Error::unterminated(Unterminated::Parens));
        }

        if self.state.entry_open {
            self.state.entry_open = false;
            self.reader.finish_entry(self.diag)?;
            self.state.summary.entries += 1;
        }
        Ok(())
    }
}
