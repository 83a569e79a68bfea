//! Sole configuration surface (spec §6): four environment variables read
//! directly, the same way the original C tool calls `getenv` inline rather
//! than going through a config-parsing crate.

use std::env;
use std::path::PathBuf;

/// Whether the carving core is building a skeleton or re-executing against
/// one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Building or augmenting the carved file during a real program run.
    Carve,
    /// Running the host program against a previously carved file.
    ReExecution,
}

/// Snapshot of the environment variables the core reads.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory under which carved files are created, if set.
    pub carved_directory: Option<PathBuf>,
    /// Carve vs. re-execution mode.
    pub mode: Mode,
    /// Source files are netCDF-4 (affects `.carved` suffix stripping).
    pub netcdf4: bool,
    /// Append-mode diagnostic log to `./log` is enabled.
    pub debug: bool,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        let use_carved = env::var("USE_CARVED").ok();
        let mode = match use_carved.as_deref() {
            Some("true") => Mode::ReExecution,
            _ => Mode::Carve,
        };

        Config {
            carved_directory: env::var("CARVED_DIRECTORY").ok().map(PathBuf::from),
            mode,
            netcdf4: env::var("NETCDF4").is_ok(),
            debug: env::var("DEBUG").is_ok(),
        }
    }
}
