//! Field dispatch tables.
//!
//! A [`FieldTable`] is a flat, ordered list of `(name, binding)` pairs built
//! once per record type. Each binding is a setter closure that parses the
//! value text and writes it into one field of the record, reached through a
//! plain accessor function. Nested records (`DAMAGE.VAL`) are handled by
//! sub-tables, which forward the rest of the dotted name into a table for
//! the nested type.
//!
//! # Example
//!
//! ```
//! use ddf_binding::FieldTable;
//! use ddf_foundation::{Diagnostics, LoadConfig};
//!
//! #[derive(Default)]
//! struct Damage { nominal: f32 }
//!
//! #[derive(Default)]
//! struct Monster { health: f32, speed: i32, damage: Damage }
//!
//! let damage = FieldTable::new().float("VAL", |d: &mut Damage| &mut d.nominal);
//! let table = FieldTable::new()
//!     .float("SPAWNHEALTH", |m: &mut Monster| &mut m.health)
//!     .numeric("SPEED", |m: &mut Monster| &mut m.speed)
//!     .sub_table("DAMAGE", |m: &mut Monster| &mut m.damage, damage);
//!
//! let mut diag = Diagnostics::new(LoadConfig::strict());
//! let mut imp = Monster::default();
//! assert!(table.bind(&mut imp, "Spawn_Health", "60", &mut diag).unwrap());
//! assert!(table.bind(&mut imp, "DAMAGE.VAL", "3", &mut diag).unwrap());
//! assert!(!table.bind(&mut imp, "JUMPHEIGHT", "1", &mut diag).unwrap());
//! assert_eq!(imp.health, 60.0);
//! assert_eq!(imp.damage.nominal, 3.0);
//! ```

use std::fmt;

use ddf_foundation::{Diagnostics, Result, names_match, split_dotted};

use crate::flags::{FlagDef, apply_flag};
use crate::values;

/// Setter for one field of `R`.
pub type Setter<R> = Box<dyn Fn(&mut R, &str, &mut Diagnostics) -> Result<()>>;

/// A nested table reached through a field of `R`.
trait Nested<R> {
    fn bind(
        &self,
        record: &mut R,
        field: &str,
        value: &str,
        diag: &mut Diagnostics,
    ) -> Result<bool>;

    fn names(&self, prefix: &str, out: &mut Vec<String>);
}

struct SubTable<R, S> {
    accessor: fn(&mut R) -> &mut S,
    table: FieldTable<S>,
}

impl<R, S> Nested<R> for SubTable<R, S> {
    fn bind(
        &self,
        record: &mut R,
        field: &str,
        value: &str,
        diag: &mut Diagnostics,
    ) -> Result<bool> {
        self.table.bind((self.accessor)(record), field, value, diag)
    }

    fn names(&self, prefix: &str, out: &mut Vec<String>) {
        self.table.collect_names(prefix, out);
    }
}

enum Binding<R> {
    Field(Setter<R>),
    Table(Box<dyn Nested<R>>),
}

struct Entry<R> {
    name: String,
    binding: Binding<R>,
}

/// Table markers carried over from older table syntax: `!` (reserved for
/// negation) and `*` (sub-table) are not part of the name.
fn bare_name(name: &str) -> &str {
    name.trim_start_matches(['!', '*'])
}

/// An ordered list of field bindings for records of type `R`.
pub struct FieldTable<R> {
    entries: Vec<Entry<R>>,
}

impl<R> Default for FieldTable<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<R> fmt::Debug for FieldTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTable")
            .field("names", &self.names())
            .finish()
    }
}

impl<R> FieldTable<R> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binds `value` to the field called `field`.
    ///
    /// Entries are scanned in order and the first whose name matches wins.
    /// A sub-table matches `NAME.rest` and recurses with `rest`. Returns
    /// `Ok(false)` if nothing matched, leaving the record untouched.
    ///
    /// # Errors
    ///
    /// Whatever the matched setter returns.
    pub fn bind(
        &self,
        record: &mut R,
        field: &str,
        value: &str,
        diag: &mut Diagnostics,
    ) -> Result<bool> {
        let dotted = split_dotted(field);
        for entry in &self.entries {
            match &entry.binding {
                Binding::Field(setter) => {
                    if names_match(&entry.name, field) {
                        setter(record, value, diag)?;
                        return Ok(true);
                    }
                }
                Binding::Table(nested) => {
                    if let Some((head, rest)) = dotted {
                        if names_match(&entry.name, head) {
                            return nested.bind(record, rest, value, diag);
                        }
                    }
                }
            }
        }
        Ok(false)
    }

    /// Lists every bindable name, sub-table fields as `SUB.FIELD`.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_names("", &mut out);
        out
    }

    fn collect_names(&self, prefix: &str, out: &mut Vec<String>) {
        for entry in &self.entries {
            match &entry.binding {
                Binding::Field(_) => out.push(format!("{prefix}{}", entry.name)),
                Binding::Table(nested) => {
                    nested.names(&format!("{prefix}{}.", entry.name), out);
                }
            }
        }
    }
}

impl<R: 'static> FieldTable<R> {
    /// Binds `name` to an arbitrary setter.
    #[must_use]
    pub fn field(
        mut self,
        name: &str,
        setter: impl Fn(&mut R, &str, &mut Diagnostics) -> Result<()> + 'static,
    ) -> Self {
        self.entries.push(Entry {
            name: bare_name(name).to_string(),
            binding: Binding::Field(Box::new(setter)),
        });
        self
    }

    /// Nests `table` under `name`, reached through `accessor`.
    #[must_use]
    pub fn sub_table<S: 'static>(
        mut self,
        name: &str,
        accessor: fn(&mut R) -> &mut S,
        table: FieldTable<S>,
    ) -> Self {
        self.entries.push(Entry {
            name: bare_name(name).to_string(),
            binding: Binding::Table(Box::new(SubTable { accessor, table })),
        });
        self
    }

    /// An integer field.
    #[must_use]
    pub fn numeric(self, name: &str, accessor: fn(&mut R) -> &mut i32) -> Self {
        self.field(name, move |r, v, _| {
            *accessor(r) = values::parse_numeric(v)?;
            Ok(())
        })
    }

    /// A float field (`%` values are read as percentages).
    #[must_use]
    pub fn float(self, name: &str, accessor: fn(&mut R) -> &mut f32) -> Self {
        self.field(name, move |r, v, d| {
            *accessor(r) = values::parse_float(v, d)?;
            Ok(())
        })
    }

    /// A percentage bounded to `0..=1`.
    #[must_use]
    pub fn percent(self, name: &str, accessor: fn(&mut R) -> &mut f32) -> Self {
        self.field(name, move |r, v, d| {
            *accessor(r) = values::parse_percent(v, d)?;
            Ok(())
        })
    }

    /// An unbounded percentage.
    #[must_use]
    pub fn percent_any(self, name: &str, accessor: fn(&mut R) -> &mut f32) -> Self {
        self.field(name, move |r, v, d| {
            *accessor(r) = values::parse_percent_any(v, d)?;
            Ok(())
        })
    }

    /// A boolean field.
    #[must_use]
    pub fn boolean(self, name: &str, accessor: fn(&mut R) -> &mut bool) -> Self {
        self.field(name, move |r, v, _| {
            *accessor(r) = values::parse_boolean(v)?;
            Ok(())
        })
    }

    /// A duration in tics.
    #[must_use]
    pub fn time(self, name: &str, accessor: fn(&mut R) -> &mut i32) -> Self {
        self.field(name, move |r, v, _| {
            *accessor(r) = values::parse_time(v)?;
            Ok(())
        })
    }

    /// A binary angle.
    #[must_use]
    pub fn angle(self, name: &str, accessor: fn(&mut R) -> &mut u32) -> Self {
        self.field(name, move |r, v, _| {
            *accessor(r) = values::parse_angle(v)?;
            Ok(())
        })
    }

    /// A slope (tangent of an angle).
    #[must_use]
    pub fn slope(self, name: &str, accessor: fn(&mut R) -> &mut f32) -> Self {
        self.field(name, move |r, v, _| {
            *accessor(r) = values::parse_slope(v)?;
            Ok(())
        })
    }

    /// An RGB colour.
    #[must_use]
    pub fn rgb(self, name: &str, accessor: fn(&mut R) -> &mut u32) -> Self {
        self.field(name, move |r, v, _| {
            *accessor(r) = values::parse_rgb(v)?;
            Ok(())
        })
    }

    /// A letter bit set.
    #[must_use]
    pub fn bitset(self, name: &str, accessor: fn(&mut R) -> &mut u32) -> Self {
        self.field(name, move |r, v, _| {
            *accessor(r) = values::parse_bitset(v)?;
            Ok(())
        })
    }

    /// A string field.
    #[must_use]
    pub fn string(self, name: &str, accessor: fn(&mut R) -> &mut String) -> Self {
        self.field(name, move |r, v, _| {
            *accessor(r) = values::parse_string(v);
            Ok(())
        })
    }

    /// A lump name field.
    #[must_use]
    pub fn lump_name(self, name: &str, accessor: fn(&mut R) -> &mut String) -> Self {
        self.field(name, move |r, v, d| {
            *accessor(r) = values::parse_lump_name(v, d)?;
            Ok(())
        })
    }

    /// A special-flag list: each value sets or clears one flag.
    #[must_use]
    pub fn flags(
        self,
        name: &str,
        accessor: fn(&mut R) -> &mut u32,
        table: &'static [FlagDef],
    ) -> Self {
        self.field(name, move |r, v, d| apply_flag(v, table, accessor(r), d))
    }
}
