// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Marketcodec CLI
//!
//! Command-line tool for decoding wire buffers and working with
//! dictionary definition files.
//!
//! ## Usage
//!
//! ```sh
//! # Decode a hex-encoded field list against a dictionary
//! marketcodec inspect field-list 000003... --fields fields.def
//!
//! # Decode a hex-encoded message
//! marketcodec inspect msg 0206... --fields fields.def --json
//!
//! # Summarize a dictionary
//! marketcodec dict info fields.def --enums enums.def
//!
//! # Look up one field
//! marketcodec dict lookup fields.def BID
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DictCmd, InspectCmd};
use common::Result;

/// Marketcodec - market data wire format toolkit
///
/// Decode wire buffers entry by entry and inspect the dictionaries
/// that give field ids their meaning.
#[derive(Parser, Clone)]
#[command(name = "marketcodec")]
#[command(about = "Market data wire format toolkit", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Decode wire buffers (field lists, messages, any container)
    #[command(subcommand)]
    Inspect(InspectCmd),

    /// Dictionary operations (info, lookup)
    #[command(subcommand)]
    Dict(DictCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(cmd) => cmd.run(),
        Commands::Dict(cmd) => cmd.run(),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
