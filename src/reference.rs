//! External file references.
//!
//! A mapping may carry a `fileReference` key naming a JSON file relative to a
//! root directory. The referenced object becomes the base that the inline
//! mapping overlays.

use crate::error::{FixtureError, Result};
use crate::merge::recursive_merge;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key naming a referenced file.
pub const FILE_REFERENCE_KEY: &str = "fileReference";

/// Source of raw file bytes.
pub trait FileProvider {
    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Reads from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileProvider;

impl FileProvider for FsFileProvider {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Serves files from memory. Unknown paths are `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileProvider {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `contents` under `path`.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl FileProvider for MemoryFileProvider {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }
}

/// Parse bytes as a JSON object.
pub fn parse_object(bytes: &[u8], origin: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| FixtureError::Json {
        origin: origin.to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(FixtureError::NotAnObject {
            origin: origin.to_string(),
        }),
    }
}

/// Resolves `fileReference` keys against an optional root directory.
#[derive(Clone, Copy)]
pub struct ReferenceResolver<'a> {
    provider: &'a dyn FileProvider,
    root: Option<&'a Path>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(provider: &'a dyn FileProvider, root: Option<&'a Path>) -> Self {
        Self { provider, root }
    }

    /// Root directory references are resolved against.
    pub fn root(&self) -> Option<&Path> {
        self.root
    }

    /// Load the fragment `mapping` references, if any.
    ///
    /// Missing keys, unreadable files and invalid JSON all yield `None`.
    /// Only one level is followed; the returned fragment may carry its own
    /// reference.
    pub fn resolve(&self, mapping: &Map<String, Value>) -> Option<Map<String, Value>> {
        let reference = mapping.get(FILE_REFERENCE_KEY)?.as_str()?;
        match self.load(reference) {
            Ok(fragment) => Some(fragment),
            Err(e) => {
                debug!(reference, error = %e, "File reference not resolved");
                None
            }
        }
    }

    /// Overlay `mapping` on top of the fragment it references.
    ///
    /// Returns a copy of `mapping` when there is nothing to resolve.
    pub fn expand(&self, mapping: &Map<String, Value>) -> Map<String, Value> {
        match self.resolve(mapping) {
            Some(base) => recursive_merge(&base, mapping),
            None => mapping.clone(),
        }
    }

    fn load(&self, reference: &str) -> Result<Map<String, Value>> {
        let root = self
            .root
            .ok_or_else(|| FixtureError::NoExternalRoot(reference.to_string()))?;
        let path = root.join(reference);
        let bytes = self.provider.read(&path).map_err(|source| FixtureError::Io {
            path: path.clone(),
            source,
        })?;
        parse_object(&bytes, &path.display().to_string())
    }
}

impl std::fmt::Debug for ReferenceResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceResolver")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
