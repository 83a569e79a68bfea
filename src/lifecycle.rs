//! Lifecycle Coordinator (spec §4.7): replays deferred attribute copying
//! at library termination, once every carved object that a reference
//! might target is guaranteed to exist.

use tracing::warn;

use crate::attributes;
use crate::capability::{FileHandle, HostLibrary, ObjectHandle, ObjectKind, OpenFlags};
use crate::config::Config;
use crate::context::Context;
use crate::error::{CarveError, CarveResult};
use crate::markers::{self, MarkerState};
use crate::model::{ObjectPath, WAS_DATASET_COPIED};
use crate::path_mapper;

/// Runs the termination sweep over every file opened this process (spec
/// §4.7). A no-op outside carve mode: re-execution never builds or
/// augments a carved file, so there is nothing to repoint.
///
/// Delegating to the host library's own termination routine is the
/// embedder's job, after this returns — it isn't a [`HostLibrary`]
/// operation this core depends on.
pub fn on_library_terminate(host: &dyn HostLibrary, ctx: &Context, config: &Config) -> CarveResult<()> {
    if config.mode != crate::config::Mode::Carve {
        return Ok(());
    }

    for source_path in ctx.opened_files() {
        sweep_one_file(host, config, &source_path)?;
    }
    Ok(())
}

fn sweep_one_file(host: &dyn HostLibrary, config: &Config, source_path: &str) -> CarveResult<()> {
    let src_file = host.open_file(source_path, OpenFlags::ReadOnly)?;
    let carved_dir = config.carved_directory.as_deref().and_then(|p| p.to_str());
    let carved_path = path_mapper::carved_path_for(source_path, config.netcdf4, false, carved_dir);
    let dest_file = host.open_file(&carved_path, OpenFlags::ReadWrite)?;

    let result = run_sweep(host, src_file, dest_file);

    host.close_file(src_file)?;
    host.close_file(dest_file)?;
    result
}

fn run_sweep(host: &dyn HostLibrary, src_file: FileHandle, dest_file: FileHandle) -> CarveResult<()> {
    let root_src = host.root_group(src_file)?;
    let root_dest = host.root_group(dest_file)?;

    let needs_sweep = match markers::read(host, root_dest, WAS_DATASET_COPIED) {
        Ok(MarkerState::Value(value)) => value,
        Ok(MarkerState::Absent) => false,
        Err(CarveError::MarkerCorrupt(name)) => {
            warn!(marker = %name, "corrupt WAS_DATASET_COPIED marker, sweeping conservatively");
            true
        }
        Err(other) => return Err(other),
    };

    if !needs_sweep {
        return Ok(());
    }

    sweep_attributes(host, src_file, dest_file, ObjectPath::new(ObjectPath::ROOT), root_src, root_dest)?;
    markers::write(host, root_dest, WAS_DATASET_COPIED, false)
}

fn sweep_attributes(
    host: &dyn HostLibrary,
    src_file: FileHandle,
    dest_file: FileHandle,
    path: ObjectPath,
    src_object: ObjectHandle,
    dest_object: ObjectHandle,
) -> CarveResult<()> {
    attributes::copy_object_attributes(host, src_file, src_object, dest_file, dest_object)?;

    if host.object_kind(src_object)? == ObjectKind::Group {
        for name in host.list_links(src_object)? {
            let child_path = path.join(&name);
            let src_child = host.open_object_by_path(src_file, &child_path)?;
            match host.object_kind(src_child)? {
                ObjectKind::NamedType | ObjectKind::Bad => continue,
                _ => {}
            }
            let dest_child = host.open_object_by_path(dest_file, &child_path)?;
            sweep_attributes(host, src_file, dest_file, child_path, src_child, dest_child)?;
        }
    }
    Ok(())
}
