//! Where raw DDF text comes from.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ddf_foundation::{Error, ErrorKind, Result, normalize_name};

/// Supplies the text of DDF files by name (`DDFTHING.DDF`, `things.ddf`).
pub trait TextSource {
    /// Returns the file's text, or `None` if the source has no such file.
    ///
    /// # Errors
    ///
    /// Returns `Source` if the file exists but cannot be read.
    fn read(&self, name: &str) -> Result<Option<String>>;
}

/// An in-memory set of files, matched case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, String>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, name: &str, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, name: &str, text: impl Into<String>) {
        self.files.insert(normalize_name(name), text.into());
    }

    /// Returns the number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if there are no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl TextSource for MemorySource {
    fn read(&self, name: &str) -> Result<Option<String>> {
        Ok(self.files.get(&normalize_name(name)).cloned())
    }
}

/// Files in a directory on disk.
///
/// A name is tried as given, then lowercase, then uppercase. Invalid UTF-8
/// is replaced rather than rejected.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source reading from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TextSource for DirectorySource {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let candidates = [name.to_string(), name.to_lowercase(), name.to_uppercase()];
        for candidate in &candidates {
            let path = self.root.join(candidate);
            match fs::read(&path) {
                Ok(bytes) => {
                    log::debug!("reading {}", path.display());
                    return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => {
                    return Err(Error::new(ErrorKind::Source {
                        name: path.display().to_string(),
                        message: err.to_string(),
                    }));
                }
            }
        }
        Ok(None)
    }
}
