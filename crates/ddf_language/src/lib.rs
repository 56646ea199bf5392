//! Character lexer, directive preprocessor, and file driver for DDF.
//!
//! # Architecture
//!
//! ```text
//! raw text
//!    │
//!    ▼
//! ┌─────────────────┐
//! │  PREPROCESSOR   │  #DEFINE / #CLEARALL / #VERSION, `//` comments
//! └─────────────────┘
//!    │
//!    ▼
//! ┌─────────────────┐
//! │  LEXER          │  char + mode → structural event
//! └─────────────────┘
//!    │
//!    ▼
//! ┌─────────────────┐
//! │  FILE DRIVER    │  <TAG>, [ENTRY], FIELD = v, v;  → DdfReader callbacks
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`lexer`] - Pure character classifier and comment elision
//! - [`preprocessor`] - Directive lines and the macro table
//! - [`reader`] - The callback protocol a content domain implements
//! - [`driver`] - The per-file entry state machine
//! - [`session`] - State shared across the files of one load

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod driver;
pub mod lexer;
pub mod preprocessor;
pub mod reader;
pub mod session;


pub use driver::{FileDriver, FileSummary, ParseState};
pub use lexer::{LexEvent, LexMode, classify, elide_comments, unescape};
pub use preprocessor::{Directive, MacroDef, MacroTable, parse_directive, strip_line_comment};
pub use reader::{DdfReader, Field};
pub use session::Session;
