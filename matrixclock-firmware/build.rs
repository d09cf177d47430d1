//! Build script for matrixclock-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates display.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Known keys per section, with their expected value kind
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "tasks",
        &[
            ("clock_period_ms", Kind::Period),
            ("blink_period_ms", Kind::Period),
            ("sensor_period_ms", Kind::Period),
            ("time_sync_period_ms", Kind::Period),
        ],
    ),
    (
        "brightness",
        &[("minimal", Kind::Integer), ("startup", Kind::Byte)],
    ),
    (
        "mqtt",
        &[
            ("client_id_prefix", Kind::Text(16)),
            ("connect_delay_ms", Kind::Delay),
            ("connect_timeout_ms", Kind::Period),
            ("subscribe_delay_ms", Kind::Delay),
            ("retry_delay_ms", Kind::Delay),
            ("report_time_sync", Kind::Flag),
        ],
    ),
    (
        "topics",
        &[
            ("temp_in", Kind::Text(48)),
            ("temp_out", Kind::Text(48)),
            ("brightness", Kind::Text(48)),
            ("minimal_brightness", Kind::Text(48)),
            ("cool", Kind::Text(48)),
            ("heat", Kind::Text(48)),
            ("debug", Kind::Text(48)),
            ("light", Kind::Text(48)),
            ("status", Kind::Text(48)),
        ],
    ),
];

#[derive(Clone, Copy)]
enum Kind {
    /// Milliseconds, must be non-zero
    Period,
    /// Milliseconds, zero allowed
    Delay,
    Integer,
    /// 0-255
    Byte,
    /// Non-empty string with a maximum length
    Text(usize),
    Flag,
}

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

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds display.toml as its configuration.          ║\n\
            ║  Please create one in the matrixclock-firmware directory.        ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = validate_sections(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in display.toml                    ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=display.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check every section and key against the schema
fn validate_sections(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let root = match config.as_table() {
        Some(t) => t,
        None => return errors,
    };

    for (section, body) in root {
        let keys = match SCHEMA.iter().find(|(name, _)| *name == section.as_str()) {
            Some((_, keys)) => *keys,
            None => {
                errors.push(format!("unknown section [{}]", section));
                continue;
            }
        };

        let table = match body.as_table() {
            Some(t) => t,
            None => {
                errors.push(format!("[{}] must be a table", section));
                continue;
            }
        };

        for (key, value) in table {
            match keys.iter().find(|(name, _)| *name == key.as_str()) {
                Some((_, kind)) => {
                    if let Err(msg) = check_value(*kind, value) {
                        errors.push(format!("[{}] {} {}", section, key, msg));
                    }
                }
                None => errors.push(format!("[{}] unknown key '{}'", section, key)),
            }
        }
    }

    errors
}

fn check_value(kind: Kind, value: &toml::Value) -> Result<(), String> {
    match (kind, value) {
        (Kind::Period, toml::Value::Integer(ms)) => {
            if *ms <= 0 || *ms > i64::from(u32::MAX) {
                return Err("must be 1-4294967295".to_string());
            }
        }
        (Kind::Delay, toml::Value::Integer(ms)) => {
            if *ms < 0 || *ms > i64::from(u32::MAX) {
                return Err("must be 0-4294967295".to_string());
            }
        }
        (Kind::Integer, toml::Value::Integer(n)) => {
            if i32::try_from(*n).is_err() {
                return Err("must fit a 32-bit integer".to_string());
            }
        }
        (Kind::Byte, toml::Value::Integer(n)) => {
            if !(0..=255).contains(n) {
                return Err("must be 0-255".to_string());
            }
        }
        (Kind::Text(max), toml::Value::String(s)) => {
            if s.is_empty() || s.len() > max {
                return Err(format!("must be 1-{} bytes", max));
            }
        }
        (Kind::Flag, toml::Value::Boolean(_)) => {}
        _ => return Err("has the wrong type".to_string()),
    }
    Ok(())
}
