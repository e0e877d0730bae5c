//! Command-line argument definitions for the mapstyle CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects what to do; the global options
//! control configuration file selection, output and logging verbosity.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for the mapstyle tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Write the result to this file instead of standard output
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compile a CQL expression and print its tree
    Expr {
        /// Expression text, e.g. "lanes * 2.5"
        text: String,
    },

    /// Compile a CQL filter and print its tree
    Filter {
        /// Filter text, e.g. "population > 10000"
        text: String,
    },

    /// Build a sample styled layer descriptor with the configured defaults
    Sample {
        /// Symbolizer the sample rule draws with
        #[arg(long, value_enum, default_value_t = SampleKind::Line)]
        kind: SampleKind,
    },
}

/// Symbolizer used by the `sample` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Line,
    Polygon,
    Point,
    Text,
    Raster,
}
