// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - decode hex wire buffers entry by entry.

use std::path::PathBuf;

use anyhow::Context;
use clap::Subcommand;

use crate::common::{
    load_dictionary, msg_to_json, parse_hex, payload_to_json, render_field_list, render_payload,
    Result,
};
use marketcodec::container::FieldListRef;
use marketcodec::{DataType, MsgRef, PayloadRef};

/// Decode wire buffers.
#[derive(Subcommand, Clone, Debug)]
pub enum InspectCmd {
    /// Decode a field list buffer
    FieldList {
        /// Hex-encoded buffer
        #[arg(value_name = "HEX")]
        input: String,

        /// Field definition file
        #[arg(long, value_name = "FILE")]
        fields: PathBuf,

        /// Enum definition file
        #[arg(long, value_name = "FILE")]
        enums: Option<PathBuf>,

        /// Only show fields whose acronym matches this pattern
        #[arg(short, long)]
        filter: Option<String>,

        /// Emit JSON instead of a text tree
        #[arg(long)]
        json: bool,
    },

    /// Decode a message buffer
    Msg {
        /// Hex-encoded buffer
        #[arg(value_name = "HEX")]
        input: String,

        /// Field definition file
        #[arg(long, value_name = "FILE")]
        fields: PathBuf,

        /// Enum definition file
        #[arg(long, value_name = "FILE")]
        enums: Option<PathBuf>,

        /// Emit JSON instead of a text tree
        #[arg(long)]
        json: bool,
    },

    /// Decode a buffer with an explicit container type code
    Container {
        /// Wire type code of the buffer (e.g. 138 for map)
        #[arg(value_name = "TYPE_CODE")]
        type_code: u8,

        /// Hex-encoded buffer
        #[arg(value_name = "HEX")]
        input: String,

        /// Field definition file
        #[arg(long, value_name = "FILE")]
        fields: PathBuf,

        /// Enum definition file
        #[arg(long, value_name = "FILE")]
        enums: Option<PathBuf>,

        /// Emit JSON instead of a text tree
        #[arg(long)]
        json: bool,
    },
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        match self {
            InspectCmd::FieldList {
                input,
                fields,
                enums,
                filter,
                json,
            } => cmd_field_list(&input, &fields, enums.as_deref(), filter.as_deref(), json),
            InspectCmd::Msg {
                input,
                fields,
                enums,
                json,
            } => cmd_msg(&input, &fields, enums.as_deref(), json),
            InspectCmd::Container {
                type_code,
                input,
                fields,
                enums,
                json,
            } => cmd_container(type_code, &input, &fields, enums.as_deref(), json),
        }
    }
}

/// Cmd: decode a field list
fn cmd_field_list(
    input: &str,
    fields: &std::path::Path,
    enums: Option<&std::path::Path>,
    filter: Option<&str>,
    json: bool,
) -> Result<()> {
    let buf = parse_hex(input)?;
    let dictionary = load_dictionary(fields, enums)?;
    let decoded = FieldListRef::decode(&buf).context("decoding field list header")?;

    if json {
        let value = payload_to_json(&PayloadRef::FieldList(decoded), &dictionary);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let filter = filter
        .map(regex::Regex::new)
        .transpose()
        .context("invalid --filter pattern")?;
    let mut out = String::new();
    render_field_list(&mut out, &decoded, &dictionary, 0, filter.as_ref());
    print!("{out}");
    Ok(())
}

/// Cmd: decode a message
fn cmd_msg(
    input: &str,
    fields: &std::path::Path,
    enums: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let buf = parse_hex(input)?;
    let dictionary = load_dictionary(fields, enums)?;
    let decoded = MsgRef::decode(&buf).context("decoding message header")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&msg_to_json(&decoded, &dictionary))?
        );
        return Ok(());
    }

    let mut out = String::new();
    render_payload(
        &mut out,
        &PayloadRef::Msg(Box::new(decoded)),
        &dictionary,
        0,
    );
    print!("{out}");
    Ok(())
}

/// Cmd: decode any container by explicit type code
fn cmd_container(
    type_code: u8,
    input: &str,
    fields: &std::path::Path,
    enums: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let buf = parse_hex(input)?;
    let dictionary = load_dictionary(fields, enums)?;
    let data_type = DataType::from_code(type_code).context("unknown type code")?;
    let decoded = PayloadRef::decode(data_type, &buf).context("decoding container")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&payload_to_json(&decoded, &dictionary))?
        );
        return Ok(());
    }

    let mut out = String::new();
    render_payload(&mut out, &decoded, &dictionary, 0);
    print!("{out}");
    Ok(())
}
