//! Hardware define extraction from build flags and library properties.
//!
//! The firmware wants to know at compile time which PCB revision and
//! e-paper panel it is built for, and which version of the display driver
//! library the build resolved. Both facts already exist elsewhere — in the
//! build flags and in the driver's `library.properties` — so this command
//! just turns them into four additional compiler defines.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// Arguments for the `hwinfo` subcommand.
#[derive(Debug, clap::Args)]
pub struct HwinfoArgs {
    /// Build flag to scan, repeatable, e.g. "-D HARDWARE_V21"
    #[arg(long = "build-flag", value_name = "FLAG")]
    pub build_flags: Vec<String>,

    /// Board name to pass through
    #[arg(long)]
    pub board: String,

    /// Path to the display driver's library.properties
    #[arg(long)]
    pub properties: Option<PathBuf>,
}

/// The four derived defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareInfo {
    /// Board name, passed through unchanged.
    pub board: String,
    /// Display type from `-D DISPLAY_<type>`.
    pub epdtype: String,
    /// PCB revision from `-D HARDWARE_<revision>`.
    pub pcbvers: String,
    /// Display driver library version from `library.properties`.
    pub gxepd2vers: String,
}

impl HardwareInfo {
    /// The defines in emission order.
    pub fn defines(&self) -> [(&'static str, &str); 4] {
        [
            ("BOARD", self.board.as_str()),
            ("EPDTYPE", self.epdtype.as_str()),
            ("PCBVERS", self.pcbvers.as_str()),
            ("GXEPD2VERS", self.gxepd2vers.as_str()),
        ]
    }
}

/// Handles the `hwinfo` subcommand.
pub fn run(args: &HwinfoArgs) -> Result<()> {
    let info = extract(
        &args.build_flags,
        &args.board,
        args.properties.as_deref(),
    );
    for (key, value) in info.defines() {
        println!("-D{key}={value}");
    }
    info!("added hardware info to compiler defines");
    Ok(())
}

/// Derives the hardware info from build flags and an optional
/// `library.properties`. Anything that cannot be determined degrades to
/// `"unknown"`; this never fails the build.
pub fn extract(build_flags: &[String], board: &str, properties: Option<&Path>) -> HardwareInfo {
    let mut pcbvers = "unknown".to_string();
    let mut epdtype = "unknown".to_string();

    for flag in build_flags {
        if flag.starts_with("-D HARDWARE_") {
            if let Some(value) = flag.split('_').nth(1) {
                pcbvers = value.to_string();
            }
        }
        if flag.starts_with("-D DISPLAY_") {
            if let Some(value) = flag.split('_').nth(1) {
                epdtype = value.to_string();
            }
        }
    }

    let gxepd2vers = properties
        .and_then(library_version)
        .unwrap_or_else(|| "unknown".to_string());

    HardwareInfo {
        board: board.to_string(),
        epdtype,
        pcbvers,
        gxepd2vers,
    }
}

/// Reads the `version` out of an Arduino `library.properties` file,
/// provided its `name` is the expected display driver.
fn library_version(path: &Path) -> Option<String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("cannot read '{}': {}", path.display(), err);
            return None;
        }
    };

    let mut name = None;
    let mut version = None;
    for line in text.lines() {
        if let Some((key, value)) = line.split_once('=') {
            match key.trim() {
                "name" => name = Some(value.trim().to_string()),
                "version" => version = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    if name.as_deref() == Some("GxEPD2") {
        version
    } else {
        None
    }
}
