//! Build script for tftwire-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates board.toml and turns it into Rust constants

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

fn main() {
    setup_linker();
    generate_board_config();
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
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Board {
    link: Link,
    display: Display,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Link {
    baudrate: u32,
    #[serde(default)]
    etx: Etx,
    #[serde(default = "default_rx_buffer")]
    rx_buffer: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Etx {
    #[default]
    Lenient,
    Strict,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Display {
    spi_frequency_hz: u32,
    #[serde(default)]
    orientation: Orientation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Orientation {
    #[default]
    Portrait,
    PortraitInverted,
    Landscape,
    LandscapeInverted,
}

fn default_rx_buffer() -> usize {
    4096
}

/// Validate board.toml and write `board.rs` into OUT_DIR
fn generate_board_config() {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };

    let board: Board = match toml::from_str(&content) {
        Ok(board) => board,
        Err(e) => fail(
            "Invalid board.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let errors = validate(&board);
    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }

    let etx = match board.link.etx {
        Etx::Lenient => "Lenient",
        Etx::Strict => "Strict",
    };
    let orientation = match board.display.orientation {
        Orientation::Portrait => "Portrait",
        Orientation::PortraitInverted => "PortraitInverted",
        Orientation::Landscape => "Landscape",
        Orientation::LandscapeInverted => "LandscapeInverted",
    };

    let generated = format!(
        "// Generated from board.toml by build.rs\n\
         \n\
         pub const UART_BAUDRATE: u32 = {};\n\
         pub const ETX_POLICY: tftwire_core::EtxPolicy = tftwire_core::EtxPolicy::{};\n\
         pub const RX_BUFFER_SIZE: usize = {};\n\
         pub const SPI_FREQUENCY_HZ: u32 = {};\n\
         pub const ORIENTATION: tftwire_core::Orientation = tftwire_core::Orientation::{};\n",
        board.link.baudrate,
        etx,
        board.link.rx_buffer,
        board.display.spi_frequency_hz,
        orientation,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("board.rs"), generated).unwrap();
}

/// Range checks serde cannot express
fn validate(board: &Board) -> Vec<String> {
    let mut errors = Vec::new();

    if !(1_200..=3_000_000).contains(&board.link.baudrate) {
        errors.push("[link] baudrate must be 1200-3000000".to_string());
    }
    if !(64..=65_536).contains(&board.link.rx_buffer) {
        errors.push("[link] rx_buffer must be 64-65536 bytes".to_string());
    }
    // RP2040 SPI tops out at half the 125 MHz peripheral clock
    if !(1_000_000..=62_500_000).contains(&board.display.spi_frequency_hz) {
        errors.push("[display] spi_frequency_hz must be 1000000-62500000".to_string());
    }

    errors
}

/// Abort the build with a boxed error report
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
