//! String interning for sprite and model names.
//!
//! States refer to their sprite by a small id instead of a string so the
//! state array stays compact and comparisons are cheap.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::name::normalize_name;

/// Interned name identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NameId(pub(crate) u32);

impl NameId {
    /// Returns the raw index of this name.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameId({})", self.0)
    }
}

/// Interner mapping DDF names to [`NameId`]s and back.
///
/// Names are stored in canonical form (see [`normalize_name`]) so that
/// spellings differing only in case, spaces or underscores share an id.
/// It is not thread-safe; use external synchronization if needed.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interner {
    strings: Vec<Arc<str>>,
    index: HashMap<Arc<str>, NameId>,
}

impl Interner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a name, returning its id.
    ///
    /// # Panics
    ///
    /// Panics if the number of interned names exceeds `u32::MAX`.
    pub fn intern(&mut self, name: &str) -> NameId {
        let canonical = normalize_name(name);
        if let Some(&id) = self.index.get(canonical.as_str()) {
            return id;
        }

        let id = NameId(u32::try_from(self.strings.len()).expect("too many interned names"));
        let arc: Arc<str> = canonical.into();
        self.strings.push(arc.clone());
        self.index.insert(arc, id);
        id
    }

    /// Looks up a name without interning it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NameId> {
        self.index.get(normalize_name(name).as_str()).copied()
    }

    /// Returns the canonical string for an id.
    #[must_use]
    pub fn resolve(&self, id: NameId) -> Option<&str> {
        self.strings.get(id.0 as usize).map(AsRef::as_ref)
    }

    /// Returns the number of interned names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
