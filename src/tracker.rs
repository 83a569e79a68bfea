//! Access Tracker / Populator (spec §4.4), grounded on the interposed
//! `H5Dread` in `H5carve.c`: on every dataset-read dispatch, promote a
//! still-empty shell in the carved file to a fully populated copy.

use tracing::{debug, warn};

use crate::capability::HostLibrary;
use crate::config::{Config, Mode};
use crate::context::FileBinding;
use crate::error::{CarveError, CarveResult};
use crate::markers::{self, MarkerState};
use crate::model::{ObjectPath, CARVED_DATASET_IS_EMPTY, WAS_DATASET_COPIED};

/// Runs the populator for a read of `dataset_path` under `binding`.
///
/// In re-execution mode this is a no-op (spec §4.4: "the Router has
/// already chosen the file"). In carve mode, promotes the dataset from
/// shell to populated if it hasn't been already.
pub fn on_dataset_read(
    host: &dyn HostLibrary,
    config: &Config,
    binding: &FileBinding,
    dataset_path: &ObjectPath,
) -> CarveResult<()> {
    if config.mode == Mode::ReExecution {
        return Ok(());
    }

    let dest_file = binding.destination_handle().expect("carve-mode binding always has a destination handle");
    let src_file = binding.primary;

    let dest_object = host.open_object_by_path(dest_file, dataset_path)?;
    let is_empty = match markers::read(host, dest_object, CARVED_DATASET_IS_EMPTY) {
        Ok(MarkerState::Value(value)) => value,
        // Deleted along with every other attribute once a dataset is
        // populated (step 4 below); absence means "already done".
        Ok(MarkerState::Absent) => false,
        Err(CarveError::MarkerCorrupt(name)) => {
            warn!(path = %dataset_path, marker = %name, "corrupt empty-shell marker, repopulating conservatively");
            true
        }
        Err(other) => return Err(other),
    };

    if !is_empty {
        return Ok(());
    }

    debug!(path = %dataset_path, "populating dataset shell");

    let (parent_path, name) = dataset_path.split_parent().expect("dataset path is never root");
    let dest_parent = host.open_object_by_path(dest_file, &parent_path)?;
    host.delete_link(dest_file, dest_parent, name)?;
    host.copy_object(src_file, dataset_path, dest_file, dataset_path)?;

    let dest_root = host.root_group(dest_file)?;
    markers::write(host, dest_root, WAS_DATASET_COPIED, true)?;

    // The newly copied object's attributes may carry references that are
    // not yet valid in the destination; drop them so the Lifecycle
    // Coordinator's termination sweep recopies them once every carved
    // object exists (spec §4.4 step 4, §4.7).
    let populated = host.open_object_by_path(dest_file, dataset_path)?;
    for attribute_name in host.list_attributes(populated)? {
        host.delete_attribute(populated, &attribute_name)?;
    }

    Ok(())
}
