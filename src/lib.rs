//! h5carve - access-driven data carving for HDF5 and netCDF-4 files.
//!
//! Given a program that reads a large hierarchical scientific data file,
//! this crate produces a **carved** derivative file containing only the
//! subset of dataset payloads the program actually touched, plus the full
//! structural skeleton (groups, dataset shapes, datatypes, attributes)
//! needed to make a later re-execution of the same program believe it is
//! reading the original. See [`dispatch::Dispatcher`] for the entry point
//! an interposition layer (or any embedder) drives.

pub mod attributes;
pub mod capability;
pub mod config;
pub mod context;
pub mod datatype;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod lifecycle;
pub mod logging;
pub mod markers;
pub mod model;
pub mod path_mapper;
pub mod router;
pub mod skeleton;
pub mod tracker;

#[cfg(test)]
mod tests_support;
