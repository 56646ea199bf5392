//! Integration tests for the classifier and directive preprocessor

use ddf_foundation::{ErrorKind, Unterminated};
use ddf_language::{
    Directive, LexEvent, LexMode, MacroTable, classify, elide_comments, parse_directive,
    strip_line_comment, unescape,
};

// =============================================================================
// Classifier
// =============================================================================

#[test]
fn braces_open_comments_in_every_mode_but_strings() {
    for mode in [
        LexMode::WaitingTag,
        LexMode::WaitingNewEntry,
        LexMode::ReadingCommand,
        LexMode::ReadingData,
        LexMode::ReadingComment,
    ] {
        assert_eq!(classify(mode, '{'), LexEvent::CommentStart, "{mode:?}");
        assert_eq!(classify(mode, '}'), LexEvent::CommentStop, "{mode:?}");
    }
    assert_eq!(classify(LexMode::ReadingString, '{'), LexEvent::Ok);
}

#[test]
fn data_punctuation() {
    assert_eq!(classify(LexMode::ReadingData, ','), LexEvent::Separator);
    assert_eq!(classify(LexMode::ReadingData, ';'), LexEvent::Terminator);
    assert_eq!(classify(LexMode::ReadingData, '"'), LexEvent::StringStart);
    assert_eq!(classify(LexMode::ReadingData, ' '), LexEvent::Nothing);
    assert_eq!(classify(LexMode::ReadingString, '"'), LexEvent::StringStop);
}

#[test]
fn command_punctuation() {
    assert_eq!(classify(LexMode::ReadingCommand, '='), LexEvent::CommandRead);
    assert_eq!(classify(LexMode::ReadingCommand, ';'), LexEvent::PropertyRead);
    assert_eq!(classify(LexMode::ReadingCommand, '['), LexEvent::EntryStart);
    assert_eq!(classify(LexMode::ReadingCommand, '('), LexEvent::GroupStart);
}

#[test]
fn tags_reject_punctuation() {
    assert_eq!(classify(LexMode::ReadingTag, 'T'), LexEvent::Ok);
    assert_eq!(classify(LexMode::ReadingTag, '>'), LexEvent::TagStop);
    assert_eq!(classify(LexMode::ReadingTag, '!'), LexEvent::Error);
}

#[test]
fn escapes() {
    assert_eq!(unescape('n'), '\n');
    assert_eq!(unescape('"'), '"');
    assert_eq!(unescape('\\'), '\\');
    assert_eq!(unescape('t'), 't');
}

// =============================================================================
// Comments
// =============================================================================

#[test]
fn nested_comments_are_removed() {
    assert_eq!(elide_comments("a {b {c} d} e").unwrap(), "a  e");
    assert_eq!(elide_comments("x \"{kept}\" y").unwrap(), "x \"{kept}\" y");
}

#[test]
fn comment_errors() {
    assert_eq!(
        elide_comments("a } b").unwrap_err().kind,
        ErrorKind::UnmatchedCommentClose
    );
    assert_eq!(
        elide_comments("a {{ b }").unwrap_err().kind,
        ErrorKind::Unterminated(Unterminated::Comment)
    );
}

#[test]
fn line_comments_respect_strings() {
    assert_eq!(strip_line_comment("SPEED = 1; // fast"), "SPEED = 1; ");
    assert_eq!(strip_line_comment("NAME = \"a//b\";"), "NAME = \"a//b\";");
}

// =============================================================================
// Directives
// =============================================================================

#[test]
fn directives() {
    assert_eq!(
        parse_directive("#DEFINE IMP_HP 60").unwrap(),
        Some(Directive::Define {
            name: "IMP_HP".into(),
            value: "60".into()
        })
    );
    assert_eq!(parse_directive("#clearall").unwrap(), Some(Directive::ClearAll));
    assert_eq!(parse_directive("SPEED = 1;").unwrap(), None);
}

#[test]
fn macro_table_is_most_recent_first() {
    let mut macros = MacroTable::new();
    macros.define("HP", "10");
    macros.define("hp", "20");
    assert_eq!(macros.substitute("H_P"), "20");
    macros.clear();
    assert!(macros.is_empty());
    assert_eq!(macros.substitute("HP"), "HP");
}
