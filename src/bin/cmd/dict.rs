// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dict command - summarize and query dictionary definition files.

use std::path::PathBuf;

use clap::Subcommand;

use crate::common::{load_dictionary, Result};

/// Dictionary operations.
#[derive(Subcommand, Clone, Debug)]
pub enum DictCmd {
    /// Summarize a dictionary
    Info {
        /// Field definition file
        #[arg(value_name = "FILE")]
        fields: PathBuf,

        /// Enum definition file
        #[arg(long, value_name = "FILE")]
        enums: Option<PathBuf>,
    },

    /// Look up one field by id or acronym
    Lookup {
        /// Field definition file
        #[arg(value_name = "FILE")]
        fields: PathBuf,

        /// Field id or acronym
        #[arg(value_name = "ID|ACRONYM")]
        field: String,
    },
}

impl DictCmd {
    pub fn run(self) -> Result<()> {
        match self {
            DictCmd::Info { fields, enums } => cmd_info(&fields, enums.as_deref()),
            DictCmd::Lookup { fields, field } => cmd_lookup(&fields, &field),
        }
    }
}

/// Cmd: summarize a dictionary
fn cmd_info(fields: &std::path::Path, enums: Option<&std::path::Path>) -> Result<()> {
    let dictionary = load_dictionary(fields, enums)?;
    println!("=== {} ===", fields.display());
    println!("Fields: {}", dictionary.field_count());
    println!("Enum tables: {}", dictionary.enum_table_count());

    let mut defs: Vec<_> = dictionary.fields().collect();
    defs.sort_by_key(|def| def.fid);
    for def in defs {
        println!(
            "  {:>6}  {:<20} {:<14} len {}",
            def.fid, def.acronym, def.data_type, def.length
        );
    }
    Ok(())
}

/// Cmd: look up one field
fn cmd_lookup(fields: &std::path::Path, field: &str) -> Result<()> {
    let dictionary = load_dictionary(fields, None)?;
    let def = match field.parse::<i16>() {
        Ok(fid) => dictionary.field(fid),
        Err(_) => dictionary.field_by_name(field),
    };
    match def {
        Some(def) => {
            println!("acronym: {}", def.acronym);
            println!("fid: {}", def.fid);
            println!("type: {}", def.data_type);
            println!("length: {}", def.length);
        }
        None => {
            println!("not found: {field}");
        }
    }
    Ok(())
}
