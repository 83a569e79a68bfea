//! Re-execution Router (spec §4.6), grounded on the interposed `H5Oopen`
//! in `H5carve.c`: redirect object-opens the carved file can't serve to
//! the retained original file, transparently.

use tracing::warn;

use crate::capability::{HostLibrary, ObjectHandle, ObjectKind};
use crate::context::FileBinding;
use crate::error::{CarveError, CarveResult};
use crate::markers::{self, MarkerState};
use crate::model::CARVED_DATASET_IS_EMPTY;

/// Resolves `name` under `loc` (a location already open in the carved
/// file), returning a handle the caller cannot distinguish from one
/// opened directly against the original file (spec §4.6 transparency
/// requirement).
pub fn on_object_open(host: &dyn HostLibrary, binding: &FileBinding, loc: ObjectHandle, name: &str) -> CarveResult<ObjectHandle> {
    let carved_file = binding.primary;
    let fallback_file = binding.fallback_handle().expect("re-execution binding always has a fallback handle");

    let loc_path = host.object_path(loc)?;
    let child_path = loc_path.join(name);

    if let Ok(handle) = host.open_object_by_path(carved_file, &child_path) {
        if host.object_kind(handle)? != ObjectKind::Dataset {
            return Ok(handle);
        }
        match markers::read(host, handle, CARVED_DATASET_IS_EMPTY) {
            Ok(MarkerState::Absent) | Ok(MarkerState::Value(false)) => return Ok(handle),
            Ok(MarkerState::Value(true)) => { /* still a shell: fall through to fallback below */ }
            Err(CarveError::MarkerCorrupt(marker)) => {
                warn!(path = %child_path, marker = %marker, "corrupt empty-shell marker, routing to fallback");
            }
            Err(other) => return Err(other),
        }
    }

    // The absolute path is identical in both files (skeleton build mirrors
    // the full namespace), so opening `child_path` directly in the
    // retained original-file handle is equivalent to resolving `loc_path`
    // there and then opening `name` under it.
    host.open_object_by_path(fallback_file, &child_path)
}
