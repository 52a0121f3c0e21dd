//! Build script for keybus-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates keybus.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

fn main() {
    setup_linker();
    validate_config();
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

/// Validate keybus.toml configuration at compile time
///
/// The firmware parses the embedded file with a minimal TOML subset
/// parser at boot; this check catches syntax and range errors on the
/// host, where the full toml crate and decent error messages exist.
fn validate_config() {
    println!("cargo:rerun-if-changed=keybus.toml");

    let content = match fs::read_to_string("keybus.toml") {
        Ok(content) => content,
        Err(e) => panic!("keybus.toml not found next to Cargo.toml: {e}"),
    };

    let value: toml::Value = match content.parse() {
        Ok(value) => value,
        Err(e) => panic!("keybus.toml is not valid TOML: {e}"),
    };

    let bus = value
        .get("bus")
        .and_then(|v| v.as_table())
        .unwrap_or_else(|| panic!("keybus.toml: missing [bus] section"));

    let clock = pin(bus, "clock_pin");
    let data = pin(bus, "data_pin");
    if clock == data {
        panic!("keybus.toml: clock_pin and data_pin must differ");
    }

    match bus.get("poll_period_ms").and_then(|v| v.as_integer()) {
        Some(ms) if ms > 0 => {}
        Some(ms) => panic!("keybus.toml: poll_period_ms must be positive, got {ms}"),
        None => panic!("keybus.toml: [bus] needs an integer poll_period_ms"),
    }

    if let Some(compat) = value.get("compat").and_then(|v| v.as_table()) {
        for (key, flag) in compat {
            if !flag.is_bool() {
                panic!("keybus.toml: [compat] {key} must be a boolean");
            }
        }
    }
}

fn pin(bus: &toml::value::Table, key: &str) -> i64 {
    match bus.get(key).and_then(|v| v.as_integer()) {
        Some(num) if (0..30).contains(&num) => num,
        Some(num) => panic!("keybus.toml: {key} = {num} is outside GPIO range 0-29"),
        None => panic!("keybus.toml: [bus] needs an integer {key}"),
    }
}
