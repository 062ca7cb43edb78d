//! Collects build metadata: `shadow-rs` records version control information
//! and the cargo profile is stored next to it for `print_binary_info`.

use std::path::Path;
use std::{env, fs};

fn main() -> shadow_rs::SdResult<()> {
    let out_dir = env::var_os("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let profile = env::var("PROFILE").unwrap_or_else(|_| String::from("unknown"));
    fs::write(Path::new(&out_dir).join("profile"), profile).expect("OUT_DIR is writable");
    shadow_rs::new()
}
