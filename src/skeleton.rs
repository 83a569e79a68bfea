//! Skeleton Builder (spec §4.2), grounded on `shallow_copy_object` in
//! `H5carve_helper_functions.c`: a depth-first mirror of the source object
//! graph into a fresh destination file, with dataset payloads left empty.

use tracing::{debug, trace};

use crate::capability::{FileHandle, HostLibrary, ObjectHandle, ObjectKind};
use crate::error::CarveResult;
use crate::markers;
use crate::model::{ObjectPath, CARVED_DATASET_IS_EMPTY, WAS_DATASET_COPIED};
use crate::{fallback, path_mapper};

/// Builds the full structural mirror of `src_file` into `dest_file`,
/// recording `source_path` in the fallback metadata.
///
/// Attributes are deliberately not copied here (spec §4.2: "Attributes are
/// not copied here" — see [`crate::lifecycle`] for the deferred sweep).
pub fn build(
    host: &dyn HostLibrary,
    src_file: FileHandle,
    dest_file: FileHandle,
    source_path: &str,
) -> CarveResult<()> {
    fallback::write(host, dest_file, source_path)?;

    let dest_root = host.root_group(dest_file)?;
    markers::write(host, dest_root, WAS_DATASET_COPIED, false)?;

    let src_root = host.root_group(src_file)?;
    copy_children(host, src_file, dest_file, ObjectPath::new(ObjectPath::ROOT), src_root, dest_root)
}

/// Standalone entry point for a pre-carve pass over known source files,
/// ahead of any instrumented program run (spec "Supplemented features":
/// `precarve_main.c`'s standalone walk). Opens both files itself rather
/// than taking already-open handles, since there is no intercepted call to
/// piggyback on outside the interposed path.
pub fn build_skeleton_only(
    host: &dyn HostLibrary,
    source_path: &str,
    carved_directory: Option<&str>,
    is_netcdf4: bool,
) -> CarveResult<()> {
    use crate::capability::OpenFlags;

    let dest_path = path_mapper::carved_path_for(source_path, is_netcdf4, false, carved_directory);
    let src_file = host.open_file(source_path, OpenFlags::ReadOnly)?;
    let dest_file = host.create_file(&dest_path)?;
    let result = build(host, src_file, dest_file, source_path);
    host.close_file(src_file)?;
    host.close_file(dest_file)?;
    result
}

fn copy_children(
    host: &dyn HostLibrary,
    src_file: FileHandle,
    dest_file: FileHandle,
    parent_path: ObjectPath,
    src_parent: ObjectHandle,
    dest_parent: ObjectHandle,
) -> CarveResult<()> {
    for name in host.list_links(src_parent)? {
        let child_path = parent_path.join(&name);
        let child = host.open_object_by_path(src_file, &child_path)?;

        match host.object_kind(child)? {
            ObjectKind::Group => {
                trace!(path = %child_path, "mirroring group");
                let dest_child = host.create_group(dest_file, dest_parent, &name)?;
                copy_children(host, src_file, dest_file, child_path, child, dest_child)?;
            }
            ObjectKind::Dataset => {
                trace!(path = %child_path, "creating dataset shell");
                let datatype = host.dataset_datatype(child)?;
                let dataspace = host.dataset_dataspace(child)?;
                let props = host.dataset_creation_properties(child)?;
                let dest_dataset =
                    host.create_dataset(dest_file, dest_parent, &name, &datatype, &dataspace, &props)?;
                markers::write(host, dest_dataset, CARVED_DATASET_IS_EMPTY, true)?;
            }
            ObjectKind::NamedType | ObjectKind::Bad => {
                debug!(path = %child_path, "skipping non group/dataset object during skeleton build");
            }
        }
    }
    Ok(())
}
