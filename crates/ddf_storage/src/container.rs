//! Ordered, name-addressed definition containers.

use ddf_foundation::names_match;

/// A definition that is looked up by its DDF name.
pub trait Named {
    /// The entry name as written between `[` and `]`.
    fn name(&self) -> &str;
}

/// Ordered collection of definitions for one content domain.
///
/// Lookups scan from the most recently added definition backwards, so a
/// later definition with the same name shadows an earlier one.
#[derive(Clone, Debug)]
pub struct DefinitionContainer<T> {
    entries: Vec<T>,
}

impl<T> Default for DefinitionContainer<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Named> DefinitionContainer<T> {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a definition and returns its index.
    pub fn push(&mut self, def: T) -> usize {
        self.entries.push(def);
        self.entries.len() - 1
    }

    /// Returns the index of the most recent definition named `name`.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|def| names_match(def.name(), name))
    }

    /// Looks up a definition by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.index_of(name).map(|idx| &self.entries[idx])
    }

    /// Looks up a definition by name for modification.
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut T> {
        let idx = self.index_of(name)?;
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

    /// Returns the most recently added definition.
    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.entries.last_mut()
    }

    /// Iterates definitions in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Iterates definitions in insertion order for modification.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut()
    }

    /// Removes every definition.
    pub fn clear(&mut self) {
        self.entries.clear();
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
}
