//! Build script for meteoron-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Checks the embedded credentials file is present

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    check_credentials();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// The credentials file is embedded with `include_str!`; fail early with a
/// useful message instead of a bare include error when it is absent.
fn check_credentials() {
    println!("cargo:rerun-if-changed=credentials.txt");

    if !Path::new("credentials.txt").exists() {
        panic!(
            "credentials.txt not found in meteoron-firmware/.\n\
             Create it with two lines:\n\
             \n\
             ssid=<your network>\n\
             password=<your passphrase>\n\
             \n\
             Leaving the values empty builds a station that runs offline."
        );
    }
}
