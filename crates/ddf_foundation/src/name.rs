//! The DDF name comparator.
//!
//! Every identifier in DDF (field names, entry names, labels, flags, actions,
//! macros) is compared ignoring ASCII case, spaces and underscores, so that
//! `FIRE_BALL`, `Fireball` and `fire ball` all name the same thing. All
//! containers, binders and resolvers must go through this module.

use std::cmp::Ordering;

/// Returns true if `c` is ignored by name comparison.
#[inline]
const fn is_ignored(c: u8) -> bool {
    c == b' ' || c == b'_'
}

/// Iterates the significant bytes of a name, upper-cased.
fn significant(name: &str) -> impl Iterator<Item = u8> + '_ {
    name.bytes()
        .filter(|&c| !is_ignored(c))
        .map(|c| c.to_ascii_uppercase())
}

/// Compares two names, ignoring case, spaces and underscores.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    significant(a).cmp(significant(b))
}

/// Returns true if two names are the same DDF identifier.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    compare_names(a, b) == Ordering::Equal
}

/// Returns the canonical spelling of a name: upper case, no spaces or underscores.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    significant(name).map(char::from).collect()
}

/// Strips a name prefix (compared with the DDF comparator) from `name`.
///
/// The prefix must match a whole run of significant characters; the
/// remainder is returned with its original spelling.
#[must_use]
pub fn strip_name_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let mut wanted = significant(prefix).peekable();
    let bytes = name.as_bytes();
    let mut pos = 0;

    while wanted.peek().is_some() {
        let c = *bytes.get(pos)?;
        pos += 1;
        if is_ignored(c) {
            continue;
        }
        if Some(c.to_ascii_uppercase()) != wanted.next() {
            return None;
        }
    }
    // Ignored separators directly after the prefix belong to it.
    while bytes.get(pos).is_some_and(|&c| is_ignored(c)) {
        pos += 1;
    }
    name.get(pos..)
}

/// Splits a dotted field name `HEAD.rest` where `rest` starts alphanumeric.
#[must_use]
pub fn split_dotted(name: &str) -> Option<(&str, &str)> {
    let (head, rest) = name.split_once('.')?;
    if rest.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        Some((head, rest))
    } else {
        None
    }
}
