use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    // memory.x を OUT_DIR に置いて、cortex-m-rt の link.x から INCLUDE できるようにする
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::copy("memory.x", out_dir.join("memory.x")).expect("copy memory.x -> OUT_DIR");

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TIMER_INTERVAL_MS");
}
