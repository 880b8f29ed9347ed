//! XBM bitmap to C byte-array header conversion.
//!
//! GIMP exports monochrome images as XBM, which is C source already — but
//! with the bits laid out LSB-first per byte, while the firmware's
//! `drawBitmap()` consumes MSB-first bytes with each 16-bit pair swapped
//! for the display controller. This module parses the XBM text, reorders
//! the bits, and emits a self-contained header with the `PROGMEM`
//! attribute expected on the target.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use regex::Regex;

/// Arguments for the `xbm` subcommand.
#[derive(Debug, clap::Args)]
pub struct XbmArgs {
    /// XBM file to convert
    pub file: PathBuf,
}

/// Handles the `xbm` subcommand; the header is written to stdout.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a well-formed
/// XBM image.
pub fn run(args: &XbmArgs) -> Result<()> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("cannot read '{}'", args.file.display()))?;
    let image = XbmImage::parse(&text)
        .with_context(|| format!("'{}' is not a usable XBM image", args.file.display()))?;
    print!("{}", image.to_header());
    Ok(())
}

/// A parsed XBM image: identifier, dimensions, and raw file bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XbmImage {
    /// Identifier from the `_bits` declaration; `image` if absent.
    pub name: String,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
    bits: Vec<u8>,
}

impl XbmImage {
    /// Parses XBM text.
    ///
    /// # Errors
    ///
    /// Returns an error if the width/height defines or the byte list are
    /// missing, if the byte count does not match the dimensions (rows pad
    /// to whole bytes), or if the byte count is odd and therefore cannot
    /// be pair-swapped.
    pub fn parse(text: &str) -> Result<XbmImage> {
        let name = Regex::new(r"static\s+unsigned\s+char\s+(\w+)_bits\[\]")
            .expect("pattern is static")
            .captures(text)
            .map_or_else(|| "image".to_string(), |c| c[1].to_string());

        let width = dimension(text, "width")?;
        let height = dimension(text, "height")?;

        let open = text.find('{').context("missing '{' before image data")?;
        let close = text.rfind('}').context("missing '}' after image data")?;
        ensure!(open < close, "image data braces are inverted");

        let mut bits = Vec::new();
        for m in Regex::new(r"0[xX][0-9a-fA-F]+")
            .expect("pattern is static")
            .find_iter(&text[open..close])
        {
            let literal = m.as_str();
            let byte = u8::from_str_radix(&literal[2..], 16)
                .with_context(|| format!("image data {literal} does not fit a byte"))?;
            bits.push(byte);
        }

        let expected = width.div_ceil(8) * height;
        ensure!(
            bits.len() == expected,
            "expected {expected} data bytes for {width}x{height}, found {}",
            bits.len()
        );
        ensure!(
            bits.len() % 2 == 0,
            "byte count {} is odd and cannot be pair-swapped",
            bits.len()
        );

        Ok(XbmImage {
            name,
            width,
            height,
            bits,
        })
    }

    /// Image bytes in display order: every byte bit-reversed (XBM is
    /// LSB-first, the panel wants MSB-first) and adjacent byte pairs
    /// swapped.
    pub fn display_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.bits.len());
        for pair in self.bits.chunks_exact(2) {
            bytes.push(pair[1].reverse_bits());
            bytes.push(pair[0].reverse_bits());
        }
        bytes
    }

    /// Renders the image as a C header with include guard, dimension
    /// defines, and the `PROGMEM` byte array, 12 bytes per line.
    pub fn to_header(&self) -> String {
        let bytes = self.display_bytes();
        let name = &self.name;
        let guard = self.name.to_uppercase();

        let mut out = String::new();
        let _ = writeln!(out, "#ifndef _{guard}_H_");
        let _ = writeln!(out, "#define _{guard}_H_ 1");
        let _ = writeln!(out);
        let _ = writeln!(out, "#define {name}_width {}", self.width);
        let _ = writeln!(out, "#define {name}_height {}", self.height);
        let _ = writeln!(
            out,
            "const unsigned char {name}_bits[{}] PROGMEM = {{",
            bytes.len()
        );

        out.push_str("   ");
        for (index, byte) in bytes.iter().enumerate() {
            let _ = write!(out, "0x{byte:02x}");
            if index + 1 < bytes.len() {
                out.push_str(", ");
            }
            if (index + 1) % 12 == 0 {
                out.push_str("\n   ");
            }
        }
        out.push_str("};\n\n#endif\n");
        out
    }
}

fn dimension(text: &str, which: &str) -> Result<usize> {
    Regex::new(&format!(r"#define\s+\w+_{which}\s+(\d+)"))
        .expect("pattern is static")
        .captures(text)
        .with_context(|| format!("missing #define for image {which}"))?[1]
        .parse()
        .with_context(|| format!("image {which} is out of range"))
}
