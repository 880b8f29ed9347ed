//! # obptool
//!
//! Build support utilities for OBP60 firmware development.
//!
//! `obptool` bundles the small build-time transformations an e-paper
//! marine instrument firmware needs around its web configuration GUI and
//! display assets.
//!
//! ## Features
//!
//! - **Schema generation**: Convert an INI field description into the JSON
//!   configuration schema consumed by the web GUI, compiling per-field
//!   visibility conditions along the way
//! - **Page scaffolding**: Scan the firmware task source for registered
//!   display pages and emit the per-page schema entries
//! - **Hardware info**: Derive compiler defines from build flags and the
//!   display driver's `library.properties`
//! - **XBM conversion**: Turn GIMP-exported XBM bitmaps into C byte-array
//!   headers laid out for the display's `drawBitmap()`
//!
//! ## Modules
//!
//! - [`schema`] - INI description to JSON configuration schema
//! - [`pages`] - Page and field schema scaffolding
//! - [`hwinfo`] - Hardware define extraction
//! - [`xbm`] - XBM bitmap conversion
//!
//! All commands are single-pass, synchronous file transformations. The
//! condition mini-language itself lives in the [`condlang`] crate.

/// Hardware define extraction from build flags and library properties.
pub mod hwinfo;

/// Page and field schema scaffolding from firmware sources.
pub mod pages;

/// INI field description to JSON configuration schema conversion.
pub mod schema;

/// XBM bitmap to C byte-array header conversion.
pub mod xbm;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
