//! Deferred name references resolved after a load pass.
//!
//! While a domain parses, it cannot look up names from domains that have
//! not finished loading yet (an attack may name a creature defined later).
//! Such references are recorded as placeholders and converted into indices
//! in a second pass once every domain involved has been parsed.

use ddf_foundation::{Error, ErrorContext, Result};

/// A recorded placeholder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pending<K> {
    /// Name to resolve.
    pub name: String,
    /// What the name must refer to (used in the error message).
    pub purpose: &'static str,
    /// Identifies the slot to fill once resolved.
    pub key: K,
    /// Where the reference was written.
    pub context: ErrorContext,
}

/// A set of deferred references awaiting resolution.
#[derive(Clone, Debug)]
pub struct PendingRefs<K> {
    entries: Vec<Pending<K>>,
}

impl<K> Default for PendingRefs<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K> PendingRefs<K> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a placeholder.
    pub fn record(
        &mut self,
        name: impl Into<String>,
        purpose: &'static str,
        key: K,
        context: ErrorContext,
    ) {
        self.entries.push(Pending {
            name: name.into(),
            purpose,
            key,
            context,
        });
    }

    /// Returns the number of unresolved placeholders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every placeholder whose key matches `pred`.
    pub fn discard(&mut self, mut pred: impl FnMut(&K) -> bool) {
        self.entries.retain(|p| !pred(&p.key));
    }

    /// Drops every placeholder.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Resolves every placeholder with `lookup`.
    ///
    /// Returns `(key, index)` pairs in recording order, or an
    /// `UnresolvedReference` error for the first name `lookup` rejects.
    /// The set is left untouched either way.
    pub fn resolve_all<F>(&self, mut lookup: F) -> Result<Vec<(K, usize)>>
    where
        K: Clone,
        F: FnMut(&str, &'static str) -> Option<usize>,
    {
        let mut resolved = Vec::with_capacity(self.entries.len());
        for pending in &self.entries {
            match lookup(&pending.name, pending.purpose) {
                Some(index) => resolved.push((pending.key.clone(), index)),
                None => {
                    return Err(Error::unresolved(pending.name.clone(), pending.purpose)
                        .with_context(pending.context.clone()));
                }
            }
        }
        log::debug!("resolved {} deferred references", resolved.len());
        Ok(resolved)
    }
}
