use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{DissolveError, DissolveResult};

/// Fetches the encoded bytes behind an image locator.
///
/// Implementations are called from the preloader's worker threads.
pub trait ImageSource: Send + Sync {
    /// Return the raw encoded bytes for `locator`.
    fn fetch(&self, locator: &str) -> anyhow::Result<Vec<u8>>;
}

/// Resolves locators against a directory on disk.
///
/// Site-rooted locators (`/images/canvases/orange.jpg`) and relative ones
/// (`images/canvases/orange.jpg`) both resolve under `root`.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory locators are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a locator resolves to.
    pub fn resolve(&self, locator: &str) -> DissolveResult<PathBuf> {
        let norm = normalize_locator(locator)?;
        Ok(self.root.join(norm))
    }
}

impl ImageSource for FsImageSource {
    fn fetch(&self, locator: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.resolve(locator)?;
        std::fs::read(&path).with_context(|| format!("read image bytes from '{}'", path.display()))
    }
}

/// In-memory locator table.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageSource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryImageSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded bytes under `locator`, replacing any previous entry.
    pub fn insert(&mut self, locator: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(locator.into(), bytes);
    }

    /// Builder-style [`MemoryImageSource::insert`].
    pub fn with(mut self, locator: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(locator, bytes);
        self
    }
}

impl ImageSource for MemoryImageSource {
    fn fetch(&self, locator: &str) -> anyhow::Result<Vec<u8>> {
        self.entries
            .get(locator)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no image registered for '{locator}' (404)"))
    }
}

/// Normalize and validate an image locator into a relative path.
///
/// The normalized result uses `/` separators, drops a leading site-root `/`, removes `.` segments,
/// and rejects parent traversals (`..`).
pub fn normalize_locator(locator: &str) -> DissolveResult<String> {
    let s = locator.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(DissolveError::validation("image locator must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(DissolveError::validation(
                "image locators must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(DissolveError::validation(
            "image locator must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
