//! Small harness demonstrating a carve run followed by a re-execution run
//! against an in-memory `HostLibrary`, the same shape as the teacher's
//! `demos/shadow_fs` binary — a thin `main` wiring a capability
//! implementation up and printing what happened, with no real I/O.

#[path = "../../tests/support/mock_library.rs"]
mod mock_library;

use clap::Parser;

use h5carve::capability::{HostLibrary, ObjectKind, OpenFlags};
use h5carve::config::{Config, Mode};
use h5carve::dispatch::Dispatcher;
use h5carve::model::ObjectPath;
use mock_library::MockLibrary;

/// Carve a representative in-memory tree, then re-execute against it.
#[derive(Parser)]
struct Args {
    /// Source file path to simulate.
    #[arg(default_value = "/data/sample.h5")]
    source_path: String,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let carve = Dispatcher::new(MockLibrary::new(), Config { carved_directory: None, mode: Mode::Carve, netcdf4: false, debug: false });
    carve.host().seed_source_tree(&args.source_path);

    let src = carve.on_file_open(&args.source_path, OpenFlags::ReadOnly).expect("open source");
    println!("carving {} -> {}.carved", args.source_path, args.source_path);

    let a = carve.host().open_object_by_path(src, &ObjectPath::new("/g1/a")).expect("open /g1/a");
    carve.on_dataset_read(src, a).expect("populate /g1/a");
    println!("populated /g1/a, left /g1/b a shell");

    carve.on_library_terminate().expect("termination sweep");

    let rerun = Dispatcher::new(carve.into_host(), Config { carved_directory: None, mode: Mode::ReExecution, netcdf4: false, debug: false });
    let carved = rerun.on_file_open(&args.source_path, OpenFlags::ReadOnly).expect("reopen for re-execution");

    let root = rerun.host().root_group(carved).expect("root group");
    let g1 = rerun.on_object_open(carved, root, "g1").expect("open /g1");
    for name in ["a", "b"] {
        let handle = rerun.on_object_open(carved, g1, name).expect("open dataset");
        let served_from = if rerun.host().object_kind(handle).unwrap() == ObjectKind::Dataset
            && rerun.host().dataset_payload(handle).is_some()
        {
            "carved or original (payload present)"
        } else {
            "shell (no payload)"
        };
        println!("/g1/{name} served from: {served_from}");
    }
}
