//! Core data model shared across the carving engine (spec §3).

use std::fmt;

/// Absolute path within the source/destination hierarchical namespace,
/// UTF-8, slash-separated, rooted at `/`. The stable key for cross-file
/// identity throughout the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath(String);

impl ObjectPath {
    /// The root group.
    pub const ROOT: &'static str = "/";

    /// Wraps a raw path string, normalizing a trailing slash away unless
    /// it names the root.
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        if path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        if path.is_empty() {
            path.push('/');
        }
        ObjectPath(path)
    }

    /// Borrow the path as a plain string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this names the root group.
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Appends a single child name and returns the joined path.
    pub fn join(&self, name: &str) -> ObjectPath {
        if self.is_root() {
            ObjectPath(format!("/{name}"))
        } else {
            ObjectPath(format!("{}/{name}", self.0))
        }
    }

    /// Splits into (parent, final component); `None` for the root.
    pub fn split_parent(&self) -> Option<(ObjectPath, &str)> {
        if self.is_root() {
            return None;
        }
        let idx = self.0.rfind('/').expect("non-root path always has a slash");
        let parent = if idx == 0 { "/" } else { &self.0[..idx] };
        Some((ObjectPath::new(parent), &self.0[idx + 1..]))
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Boolean marker attribute attached to every freshly created dataset
/// shell; its presence (and truth) distinguishes a `DatasetShell` from a
/// `PopulatedDataset`.
pub const CARVED_DATASET_IS_EMPTY: &str = "CARVED_DATASET_IS_EMPTY";

/// Root-group marker recording whether any dataset was populated since the
/// last deferred-attribute sweep.
pub const WAS_DATASET_COPIED: &str = "WAS_DATASET_COPIED";

/// Root-group attribute recording how to reach the original file.
pub const FALLBACK_METADATA: &str = "FALLBACK_METADATA";

/// `FALLBACK_METADATA`'s `FALLBACK_TYPE` enumerant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FileKind {
    Local = 0,
    Remote = 1,
}

/// Decoded `FALLBACK_METADATA` payload (spec §4.5).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FallbackMetadata {
    pub kind: FileKind,
    pub path: String,
}
