//! Dispatch interface (spec §6): the five entry points an interposition
//! shim calls into, replacing the teacher's `handle_forever`/
//! `process_socket` TCP server loop with direct method calls — there is no
//! wire protocol here, only synchronous calls on the host application's
//! own thread (spec §5).

use tracing::{error, info};

use crate::capability::{FileHandle, HostLibrary, ObjectHandle, OpenFlags};
use crate::config::{Config, Mode};
use crate::context::{BindingMode, Context, FileBinding};
use crate::error::CarveResult;
use crate::{lifecycle, path_mapper, router, skeleton, tracker};

/// Wires a [`HostLibrary`] implementation, the process-wide [`Context`],
/// and [`Config`] together behind the five operations an interposition
/// layer needs (spec §6 "Dispatch interface").
pub struct Dispatcher<L: HostLibrary> {
    host: L,
    ctx: Context,
    config: Config,
}

impl<L: HostLibrary> Dispatcher<L> {
    pub fn new(host: L, config: Config) -> Self {
        Dispatcher { host, ctx: Context::new(), config }
    }

    /// Borrows the underlying host library, e.g. for test fixtures that
    /// need to seed or inspect its backing store directly.
    pub fn host(&self) -> &L {
        &self.host
    }

    /// Recovers the host library, discarding the dispatcher's context and
    /// config — used to hand an already-carved backing store from one
    /// `Dispatcher` (carve mode) to another (re-execution mode) in tests.
    pub fn into_host(self) -> L {
        self.host
    }

    fn carved_dir(&self) -> Option<&str> {
        self.config.carved_directory.as_deref().and_then(|p| p.to_str())
    }

    /// `on_file_open` (spec §6, §4.2, §4.7): opens `path`, building or
    /// opening the carved counterpart as a side effect, and returns the
    /// handle the host application should keep using.
    pub fn on_file_open(&self, path: &str, flags: OpenFlags) -> CarveResult<FileHandle> {
        self.ctx.record_opened(path);

        match self.config.mode {
            Mode::ReExecution => {
                let fallback = self.host.open_file(path, flags)?;
                let carved_path = path_mapper::carved_path_for(path, self.config.netcdf4, true, self.carved_dir());
                let carved = self.host.open_file(&carved_path, flags)?;
                info!(path, carved_path, "opened for re-execution");

                self.ctx.insert_binding(FileBinding {
                    source_path: path.to_owned(),
                    primary: carved,
                    mode: BindingMode::ReExecution { fallback },
                });
                Ok(carved)
            }
            Mode::Carve => {
                let src = self.host.open_file(path, flags)?;
                let carved_path = path_mapper::carved_path_for(path, self.config.netcdf4, false, self.carved_dir());

                let destination = if self.host.file_exists(&carved_path) {
                    // Spec §8 invariant 6 / scenario S5: a carved file
                    // already on disk means skeleton build already ran
                    // (possibly a prior, crashed run) — skip it.
                    info!(path, carved_path, "carved file already exists, skipping skeleton build");
                    self.host.open_file(&carved_path, OpenFlags::ReadWrite)?
                } else {
                    let dest = self.host.create_file(&carved_path)?;
                    skeleton::build(&self.host, src, dest, path)?;
                    info!(path, carved_path, "built carved skeleton");
                    dest
                };

                self.ctx.insert_binding(FileBinding {
                    source_path: path.to_owned(),
                    primary: src,
                    mode: BindingMode::Carve { destination },
                });
                Ok(src)
            }
        }
    }

    /// `on_object_open` (spec §6, §4.6): resolves `name` under `loc`,
    /// opened against `file`. Routes through [`router`] only in
    /// re-execution mode; otherwise a plain path resolution.
    pub fn on_object_open(&self, file: FileHandle, loc: ObjectHandle, name: &str) -> CarveResult<ObjectHandle> {
        match self.ctx.binding(file) {
            Some(binding) if matches!(binding.mode, BindingMode::ReExecution { .. }) => {
                router::on_object_open(&self.host, &binding, loc, name)
            }
            _ => {
                let loc_path = self.host.object_path(loc)?;
                self.host.open_object_by_path(file, &loc_path.join(name))
            }
        }
    }

    /// `on_dataset_read` (spec §6, §4.4): in carve mode, promotes the
    /// dataset from shell to populated if this is its first read.
    pub fn on_dataset_read(&self, file: FileHandle, dataset: ObjectHandle) -> CarveResult<()> {
        let Some(binding) = self.ctx.binding(file) else { return Ok(()) };
        if !matches!(binding.mode, BindingMode::Carve { .. }) {
            return Ok(());
        }
        let path = self.host.object_path(dataset)?;
        tracker::on_dataset_read(&self.host, &self.config, &binding, &path)
    }

    /// `on_library_terminate` (spec §6, §4.7): replays deferred attribute
    /// copying across every file opened this process.
    pub fn on_library_terminate(&self) -> CarveResult<()> {
        let result = lifecycle::on_library_terminate(&self.host, &self.ctx, &self.config);
        if let Err(ref e) = result {
            error!(error = %e, "termination sweep failed");
        }
        result
    }

    /// `on_netcdf_open` (spec §6): netCDF-4 opens are intercepted solely
    /// to rewrite the path to the carved counterpart in re-execution
    /// mode — the underlying HDF5 `H5Fopen` netCDF itself issues is still
    /// intercepted separately and does the actual carving.
    pub fn on_netcdf_open(&self, path: &str) -> String {
        match self.config.mode {
            Mode::ReExecution => path_mapper::carved_path_for(path, true, true, self.carved_dir()),
            Mode::Carve => path.to_owned(),
        }
    }
}
