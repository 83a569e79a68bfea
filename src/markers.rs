//! Scalar boolean marker attributes (`CARVED_DATASET_IS_EMPTY`,
//! `WAS_DATASET_COPIED`), read and written the same way across
//! `skeleton.rs`, `tracker.rs`, and `lifecycle.rs`.
//!
//! Grounded on `is_dataset_null`/`does_dataset_exist` in
//! `H5carve_helper_functions.c`: a marker is a one-byte boolean attribute,
//! and a failure to read one that is present is reported rather than
//! silently defaulted — callers decide what "corrupt" means for their
//! marker (spec §7 `MarkerCorrupt`).

use crate::capability::{Attribute, AttributeValue, Dataspace, HostLibrary, ObjectHandle};
use crate::datatype::Datatype;
use crate::error::{CarveError, CarveResult};

/// A marker attribute's state on some object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MarkerState {
    /// No attribute of that name exists.
    Absent,
    /// Present and readable.
    Value(bool),
}

/// Writes (creating or overwriting) a scalar boolean attribute.
pub fn write(host: &dyn HostLibrary, object: ObjectHandle, name: &str, value: bool) -> CarveResult<()> {
    let attribute = Attribute {
        datatype: Datatype::Atomic { size: 1 },
        dataspace: Dataspace::scalar(),
        value: AttributeValue::Atomic(vec![value as u8]),
    };
    host.write_attribute(object, name, &attribute)
}

/// Reads a scalar boolean marker attribute.
///
/// Returns `Ok(MarkerState::Absent)` when the attribute doesn't exist, and
/// `Err(CarveError::MarkerCorrupt)` when it exists but its payload can't be
/// read as a single boolean byte — callers interpret that corrupt state
/// conservatively for their own marker (spec §7).
pub fn read(host: &dyn HostLibrary, object: ObjectHandle, name: &str) -> CarveResult<MarkerState> {
    let names = host.list_attributes(object)?;
    if !names.iter().any(|existing| existing == name) {
        return Ok(MarkerState::Absent);
    }
    let attribute =
        host.read_attribute(object, name).map_err(|_| CarveError::MarkerCorrupt(name.to_owned()))?;
    match &attribute.value {
        AttributeValue::Atomic(bytes) if bytes.len() == 1 => Ok(MarkerState::Value(bytes[0] != 0)),
        _ => Err(CarveError::MarkerCorrupt(name.to_owned())),
    }
}
