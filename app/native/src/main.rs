#![allow(clippy::multiple_crate_versions)]

//! Gridtile command-line entry point.

fn main() {
    gridtile_lib::init_logging();

    if let Err(err) = gridtile_lib::cli::run() {
        eprintln!("gridtile: {err}");
        std::process::exit(1);
    }
}
