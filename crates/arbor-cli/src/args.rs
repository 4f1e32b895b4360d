//! Command-line argument definitions for the Arbor CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the dataset and output paths, the output
//! format, configuration file selection and logging verbosity.

use clap::Parser;

use arbor::Format;

/// Command-line arguments for the Arbor diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the dataset (TOML)
    #[arg(help = "Path to the dataset file")]
    pub dataset: String,

    /// Path to the output file [default: `<title>.<format>`]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (dot, svg, pdf, png); inferred from the output
    /// extension when omitted
    #[arg(short, long)]
    pub format: Option<Format>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Seed of the cosmetic code generator
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
