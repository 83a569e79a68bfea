//! Error kinds surfaced by the carving core (spec §7).
//!
//! Mirrors the teacher's plain-enum error style (`vfs::Error`, `NfsError`)
//! rather than reaching for `thiserror`: these variants are the negative
//! status / invalid-handle outcomes a dispatcher reports back to its
//! caller, not an open-ended application error hierarchy.

use std::fmt;

/// Errors the carving core can surface through the dispatch entry points.
#[derive(Debug)]
pub enum CarveError {
    /// Any pass-through failure of the underlying host data library.
    HostLibraryFailure(String),
    /// Allocation failure while constructing the carved path.
    PathMappingFailure,
    /// Region references, named-datatype children, or an unenumerated
    /// datatype class.
    UnsupportedDatatype(&'static str),
    /// A reference attribute copy was attempted before its target object
    /// existed in the destination file. Indicates a caller-ordering bug,
    /// not a user error.
    DanglingReference(String),
    /// Recursion limit exceeded while walking a compound/VLEN/array
    /// datatype.
    DatatypeTooDeep,
    /// `CARVED_DATASET_IS_EMPTY` or `WAS_DATASET_COPIED` exists but has an
    /// unreadable payload. Callers should treat this as "empty" / "needs
    /// sweep" and proceed, but still report it.
    MarkerCorrupt(String),
}

impl fmt::Display for CarveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CarveError::HostLibraryFailure(msg) => write!(f, "host library failure: {msg}"),
            CarveError::PathMappingFailure => write!(f, "failed to construct carved path"),
            CarveError::UnsupportedDatatype(what) => write!(f, "unsupported datatype: {what}"),
            CarveError::DanglingReference(path) => {
                write!(f, "reference target does not exist in destination: {path}")
            }
            CarveError::DatatypeTooDeep => write!(f, "datatype recursion limit exceeded"),
            CarveError::MarkerCorrupt(path) => write!(f, "marker attribute corrupt on {path}"),
        }
    }
}

impl std::error::Error for CarveError {}

/// Result alias used throughout the carving core.
pub type CarveResult<T> = Result<T, CarveError>;
