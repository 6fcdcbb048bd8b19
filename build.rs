//! Copies `memory.x` next to the build output so the linker finds it from any
//! workspace member, and turns `.env` switches into `cfg` flags.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

fn main() {
    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    // Load .env file if it exists
    if dotenvy::dotenv().is_ok() {
        println!("cargo:warning=Loaded .env file");
    }

    // Keep the sequencer running when a message carries an unknown tag
    if env::var("DISCARD_UNKNOWN_TAGS").is_ok() {
        println!("cargo:rustc-cfg=feature_discard_unknown_tags");
    }
    println!("cargo:rustc-check-cfg=cfg(feature_discard_unknown_tags)");

    println!("cargo:rerun-if-env-changed=DISCARD_UNKNOWN_TAGS");
    println!("cargo:rerun-if-changed=.env");
}
