//! Pure function from `(source_path, mode_flags)` to the carved-file path
//! (spec §4.1), grounded on `get_carved_filename` in
//! `H5carve_helper_functions.c`. No I/O; the only failure mode is
//! allocation, which Rust's `String` turns into an abort rather than a
//! catchable error, so this is infallible in practice — `CarveError`'s
//! `PathMappingFailure` variant exists for API symmetry with the other
//! components and is never produced by this implementation.

use std::path::Path;

/// Resolves `path` to an absolute, canonical form for storage in
/// `FALLBACK_METADATA` (spec line 116, §4.5: "`PATH`: absolute path of the
/// original file"), grounded on `H5carve.c`'s `realpath(filename,
/// file_absolute_path)` call.
///
/// Falls back to `path` unchanged if it can't be resolved (nonexistent
/// path, permission error) — the same tolerant pattern as the teacher's
/// `ShadowFS::new`, which canonicalizes its root and falls back to the
/// supplied path on failure (`examples/shadow_fs/fs/shadow.rs`).
pub fn absolute_path(path: &str) -> String {
    Path::new(path)
        .canonicalize()
        .map(|resolved| resolved.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_owned())
}

/// Computes the destination path for `source_path`.
///
/// `is_netcdf4` and `use_carved` mirror the `NETCDF4`/`USE_CARVED`
/// environment variables (spec §6): together they gate the `.carved`
/// suffix-stripping rule, which only fires when re-executing against an
/// already-carved netCDF-4 file whose host library rewrote the path
/// before handing it to the carving core (spec §4.1 rule 1).
pub fn carved_path_for(
    source_path: &str,
    is_netcdf4: bool,
    use_carved: bool,
    carved_dir: Option<&str>,
) -> String {
    let mut path = source_path.to_owned();

    if is_netcdf4 && use_carved {
        if let Some(stripped) = path.strip_suffix(".carved") {
            path = stripped.to_owned();
        }
    }

    match carved_dir {
        Some(dir) => {
            let final_component =
                Path::new(&path).file_name().map(|name| name.to_string_lossy().into_owned());
            let final_component = final_component.unwrap_or_else(|| path.clone());

            let mut result = dir.to_owned();
            if !result.ends_with('/') {
                result.push('/');
            }
            result.push_str(&final_component);
            result.push_str(".carved");
            result
        }
        None => {
            path.push_str(".carved");
            path
        }
    }
}
