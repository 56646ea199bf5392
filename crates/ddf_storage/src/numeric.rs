//! Containers for numeric-keyed domains (line types, sector types).
//!
//! Entries are named by a number instead of a string (`[123]`). Loading and
//! cross-referencing look the same numbers up over and over, so a small
//! modulo-indexed cache sits in front of the linear scan.

use std::cell::Cell;

/// Number of cache slots; slot = id mod `CACHE_SIZE`.
pub const CACHE_SIZE: usize = 8;

/// A definition keyed by number.
pub trait Numbered {
    /// The entry number as written between `[` and `]`.
    fn number(&self) -> i32;
}

/// Ordered collection of numeric-keyed definitions with a lookup cache.
#[derive(Clone, Debug)]
pub struct NumericContainer<T> {
    entries: Vec<T>,
    cache: [Cell<Option<usize>>; CACHE_SIZE],
}

impl<T> Default for NumericContainer<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            cache: Default::default(),
        }
    }
}

/// Maps an id onto its cache slot.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn slot(id: i32) -> usize {
    id.rem_euclid(CACHE_SIZE as i32) as usize
}

impl<T: Numbered> NumericContainer<T> {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a definition and returns its index.
    ///
    /// The cache slot for its number is invalidated so the new entry
    /// shadows any older one with the same number.
    pub fn push(&mut self, def: T) -> usize {
        self.cache[slot(def.number())].set(None);
        self.entries.push(def);
        self.entries.len() - 1
    }

    /// Returns the index of the most recent definition numbered `id`.
    #[must_use]
    pub fn index_of(&self, id: i32) -> Option<usize> {
        let cell = &self.cache[slot(id)];
        if let Some(idx) = cell.get() {
            if self.entries.get(idx).is_some_and(|def| def.number() == id) {
                return Some(idx);
            }
        }

        let idx = self.entries.iter().rposition(|def| def.number() == id)?;
        cell.set(Some(idx));
        Some(idx)
    }

    /// Looks up a definition by number.
    #[must_use]
    pub fn lookup(&self, id: i32) -> Option<&T> {
        self.index_of(id).map(|idx| &self.entries[idx])
    }

    /// Looks up a definition by number for modification.
    pub fn lookup_mut(&mut self, id: i32) -> Option<&mut T> {
        let idx = self.index_of(id)?;
        self.entries.get_mut(idx)
    }

    /// Returns the definition at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// Returns the definition at `index` for modification.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index)
    }

    /// Iterates definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Removes every definition and invalidates the whole cache.
    pub fn clear(&mut self) {
        self.entries.clear();
        for cell in &self.cache {
            cell.set(None);
        }
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the container is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cached index for `id`'s slot, if any (for diagnostics).
    #[must_use]
    pub fn cached_slot(&self, id: i32) -> Option<usize> {
        self.cache[slot(id)].get()
    }
}
