//! DDF - Data Definition Framework
//!
//! This crate re-exports all layers of the DDF interpreter for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: ddf_content     Sample domains (things, attacks, lines), text sources, loader
//! Layer 4: ddf_states      State arena, redirector resolution, action tables
//! Layer 3: ddf_binding     Field tables, value parsers, special flags
//! Layer 2: ddf_language    Lexer, directive preprocessor, file driver
//! Layer 1: ddf_storage     Definition containers, deferred references
//! Layer 0: ddf_foundation  Errors, name comparator, diagnostics, config
//! ```

pub use ddf_binding as binding;
pub use ddf_content as content;
pub use ddf_foundation as foundation;
pub use ddf_language as language;
pub use ddf_states as states;
pub use ddf_storage as storage;
