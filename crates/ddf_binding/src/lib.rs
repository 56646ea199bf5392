//! Field dispatch, value parsing, and special-flag resolution for DDF.
//!
//! This crate provides:
//! - [`FieldTable`] - Declarative name → setter tables, with nested sub-tables
//! - [`values`] - Typed parsers (numeric, percent, time, angle, colour, ...)
//! - [`resolve_flag`] - The special-flag resolver with its prefix rules

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod binder;
pub mod flags;
pub mod values;

pub use binder::{FieldTable, Setter};
pub use flags::{FlagDef, FlagResult, apply_flag, resolve_flag};
pub use values::{
    LUMP_NAME_LEN, RGB_NO_VALUE, SLOPE_LIMIT_DEGREES, TIME_MAX, decode_brackets, parse_angle, parse_bitset,
    parse_boolean, parse_float, parse_int_range, parse_lump_name, parse_numeric, parse_percent,
    parse_percent_any, parse_rgb, parse_slope, parse_string, parse_time, split_list,
};
