//! Core errors, name comparison, diagnostics, and load configuration for DDF.
//!
//! This crate provides:
//! - [`Error`] / [`ErrorKind`] - Rich error types with source context
//! - [`names_match`] - The case/space/underscore-insensitive name comparator
//! - [`Diagnostics`] - Warning collection and the strict/lax policy
//! - [`LoadConfig`] - Configuration for a DDF load
//! - [`Interner`] - Name interning for sprites and models

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod intern;
pub mod name;

pub use config::{LoadConfig, ParseMode, TIC_RATE};
pub use diagnostics::{Diagnostics, Warning};
pub use error::{Error, ErrorContext, ErrorKind, Result, Unterminated};
pub use intern::{Interner, NameId};
pub use name::{compare_names, names_match, normalize_name, split_dotted, strip_name_prefix};
