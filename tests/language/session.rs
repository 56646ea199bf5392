//! Integration tests for Session
//!
//! Tests the reader protocol across several files of one load.

use ddf_foundation::{Diagnostics, ErrorKind, LoadConfig, Result};
use ddf_language::{DdfReader, Field, Session};
use pretty_assertions::assert_eq;

/// Collects `ENTRY.FIELD=value` strings.
#[derive(Default)]
struct Collector {
    entry: String,
    seen: Vec<String>,
    entries: Vec<String>,
    cleared: usize,
}

impl DdfReader for Collector {
    fn tag(&self) -> &str {
        "SOUNDS"
    }

    fn short_name(&self) -> &str {
        "sounds"
    }

    fn start_entry(&mut self, name: &str, _extend: bool, _: &mut Diagnostics) -> Result<()> {
        self.entry = name.to_string();
        Ok(())
    }

    fn parse_field(&mut self, field: &Field<'_>, diag: &mut Diagnostics) -> Result<()> {
        if field.command == "BOGUS" {
            return diag.complain(ddf_foundation::Error::unknown_field(field.command));
        }
        self.seen
            .push(format!("{}.{}={}", self.entry, field.command, field.value));
        Ok(())
    }

    fn finish_entry(&mut self, _: &mut Diagnostics) -> Result<()> {
        self.entries.push(std::mem::take(&mut self.entry));
        Ok(())
    }

    fn clear_all(&mut self, _: &mut Diagnostics) -> Result<()> {
        self.cleared += 1;
        self.entries.clear();
        Ok(())
    }
}

fn quiet(config: LoadConfig) -> Session {
    Session::new(config.with_log_warnings(false))
}

#[test]
fn macros_do_not_leak_between_files() {
    let mut session = quiet(LoadConfig::strict());
    let mut reader = Collector::default();

    session
        .parse_file(&mut reader, "a.ddf", "#DEFINE LOUD 255\n<SOUNDS>\n[PISTOL] PRIORITY = LOUD;\n")
        .unwrap();
    session
        .parse_file(&mut reader, "b.ddf", "<SOUNDS>\n[SHOTGN] PRIORITY = LOUD;\n")
        .unwrap();

    assert_eq!(
        reader.seen,
        vec!["PISTOL.PRIORITY=255", "SHOTGN.PRIORITY=LOUD"]
    );
    assert_eq!(session.files_parsed(), 2);
    assert!(session.macros().is_empty());
}

#[test]
fn clearall_in_a_later_file() {
    let mut session = quiet(LoadConfig::strict());
    let mut reader = Collector::default();
    session
        .parse_file(&mut reader, "a.ddf", "<SOUNDS>[A] X = 1; [B] X = 2;")
        .unwrap();
    session
        .parse_file(&mut reader, "b.ddf", "<SOUNDS>\n#CLEARALL\n[C] X = 3;\n")
        .unwrap();
    assert_eq!(reader.cleared, 1);
    assert_eq!(reader.entries, vec!["C"]);
}

#[test]
fn strict_versus_lax_unknown_field() {
    let text = "<SOUNDS>\n[A]\nX = 1;\nBOGUS = 2;\nY = 3;\n";

    let mut strict = quiet(LoadConfig::strict());
    let err = strict
        .parse_file(&mut Collector::default(), "s.ddf", text)
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownField("BOGUS".into()));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.file.as_deref(), Some("s.ddf"));
    assert_eq!(ctx.line, Some(4));
    assert_eq!(ctx.entry.as_deref(), Some("A"));

    let mut lax = quiet(LoadConfig::lax());
    let mut reader = Collector::default();
    lax.parse_file(&mut reader, "l.ddf", text).unwrap();
    assert_eq!(reader.seen, vec!["A.X=1", "A.Y=3"]);

    let warnings = lax.end_load();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].context.line, Some(4));
}

#[test]
fn summary_counts() {
    let mut session = quiet(LoadConfig::strict());
    let summary = session
        .parse_file(
            &mut Collector::default(),
            "a.ddf",
            "<SOUNDS>\n[A]\nX = 1, 2;\n[B]\nY = 3;\n",
        )
        .unwrap();
    assert_eq!((summary.entries, summary.fields, summary.lines), (2, 3, 5));
}
