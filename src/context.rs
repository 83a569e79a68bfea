//! Process-wide state, replacing the original's globals (spec §5, §9):
//! `src_file_id`, `dest_file_id`, `original_file_id`, and `files_opened`
//! all become fields of one mutex-guarded struct, the same way the
//! teacher's `ShadowFS` keeps its per-process bookkeeping in a single
//! `Mutex<State>` (`examples/shadow_fs/fs/state.rs`) instead of free
//! globals.
//!
//! Rather than a `static` singleton, the embedder (the interposition shim)
//! constructs one [`Context`] at library-load time and holds it for the
//! process's lifetime, handing a reference to every dispatch call — this
//! is the Rust-idiomatic equivalent of "one process-wide struct" without
//! reaching for global mutable state, and it is what makes the dispatch
//! layer testable in isolation (`tests/carve_scenarios.rs` constructs a
//! fresh `Context` per scenario).
//!
//! The mutex is [`std::sync::Mutex`], not an async one: every dispatch
//! call runs synchronously on the host application's own thread (spec
//! §5), so there is never a lock held across an await point to begin
//! with.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::capability::FileHandle;

/// How a [`FileBinding`] was opened (spec §3 "FileBinding"), mirroring the
/// two branches of `H5Fopen` in `H5carve.c`: the plain-open branch returns
/// the real source file's handle to the caller while quietly building a
/// carved counterpart, and the `USE_CARVED` branch returns the carved
/// file's handle while retaining the original as a fallback.
#[derive(Debug, Copy, Clone)]
pub enum BindingMode {
    /// Building or augmenting a carved file. The binding's `primary` field
    /// is the real source file handle, returned to the caller so every
    /// subsequent read is served with genuine data; `destination` is the
    /// carved file being populated as a side effect.
    Carve { destination: FileHandle },
    /// Re-executing against a carved file. The binding's `primary` field
    /// is the carved file handle, returned to the caller; `fallback` is
    /// the retained handle on the original file for objects not carved.
    ReExecution { fallback: FileHandle },
}

/// Pairs a source file with its destination/fallback handle for the
/// duration of one open file (spec §3).
#[derive(Debug, Clone)]
pub struct FileBinding {
    /// Absolute path of the original source file (stable key across
    /// carve and re-execution modes).
    pub source_path: String,
    /// Handle returned to the caller of `on_file_open`: the real source
    /// file handle in carve mode, the carved file handle in re-execution
    /// mode.
    pub primary: FileHandle,
    pub mode: BindingMode,
}

impl FileBinding {
    /// The handle to read from when serving a fallback (re-execution mode
    /// only).
    pub fn fallback_handle(&self) -> Option<FileHandle> {
        match self.mode {
            BindingMode::ReExecution { fallback } => Some(fallback),
            BindingMode::Carve { .. } => None,
        }
    }

    /// The carved (destination) file handle being populated, in carve mode.
    pub fn destination_handle(&self) -> Option<FileHandle> {
        match self.mode {
            BindingMode::Carve { destination } => Some(destination),
            BindingMode::ReExecution { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct ContextInner {
    /// Ordered set of source file paths opened this process, deduplicated
    /// by path (spec §3 "OpenedFilesRegistry").
    opened_files: Vec<String>,
    /// Active bindings, keyed by the handle returned to the caller.
    bindings: HashMap<FileHandle, FileBinding>,
}

/// Process-wide carving state: the `OpenedFilesRegistry` and the live
/// `FileBinding`s, behind a single mutex (spec §5: "three items are
/// process-global... MUST be accessed under a single mutex").
#[derive(Debug, Default)]
pub struct Context {
    inner: Mutex<ContextInner>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    /// Records `path` as opened this process, if not already recorded.
    pub fn record_opened(&self, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.opened_files.iter().any(|existing| existing == path) {
            inner.opened_files.push(path.to_owned());
        }
    }

    /// Every source path opened this process, in open order.
    pub fn opened_files(&self) -> Vec<String> {
        self.inner.lock().unwrap().opened_files.clone()
    }

    /// Registers a binding under the handle returned to the caller.
    pub fn insert_binding(&self, binding: FileBinding) {
        let mut inner = self.inner.lock().unwrap();
        inner.bindings.insert(binding.primary, binding);
    }

    /// Looks up the binding for a handle previously returned by
    /// `on_file_open`.
    pub fn binding(&self, handle: FileHandle) -> Option<FileBinding> {
        self.inner.lock().unwrap().bindings.get(&handle).cloned()
    }

    /// Removes and returns a binding, e.g. on file close.
    pub fn remove_binding(&self, handle: FileHandle) -> Option<FileBinding> {
        self.inner.lock().unwrap().bindings.remove(&handle)
    }
}
