use clap::{Parser, Subcommand};
use env_logger::Env;

use obptool::{hwinfo, pages, schema, xbm};

#[derive(Parser)]
#[command(name = "obptool", version, about = "Build support utilities for OBP60 firmware")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert an INI field description into the GUI configuration schema
    Schema(schema::SchemaArgs),
    /// Generate page and field schema entries from the firmware task source
    Pages(pages::PagesArgs),
    /// Derive hardware defines from build flags and library properties
    Hwinfo(hwinfo::HwinfoArgs),
    /// Convert an XBM bitmap into a C byte-array header
    Xbm(xbm::XbmArgs),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Schema(args) => schema::run(&args),
        Command::Pages(args) => pages::run(&args),
        Command::Hwinfo(args) => hwinfo::run(&args),
        Command::Xbm(args) => xbm::run(&args),
    }
}
