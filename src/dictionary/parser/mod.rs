// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Definition-file parsers using Pest.
//!
//! The grammar in `dictionary.pest` covers both file kinds: field
//! definition files (one quoted acronym, field id, type keyword, and
//! display length per line) and enum definition files (FIDS lines
//! opening a table, VALUE lines filling it).

use crate::core::types::DataType;
use crate::dictionary::{DictionaryError, EnumTable, EnumValue, FieldDef};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

/// Pest parser for dictionary definition files.
#[derive(Parser)]
#[grammar = "dictionary/parser/dictionary.pest"] // Path relative to src/ directory
struct DictionaryParser;

fn syntax(message: impl Into<String>) -> DictionaryError {
    DictionaryError::Syntax {
        message: message.into(),
    }
}

fn quoted_text(pair: Pair<'_, Rule>) -> &str {
    // quoted = "\"" ~ quoted_inner ~ "\""
    pair.into_inner()
        .next()
        .map(|inner| inner.as_str())
        .unwrap_or("")
}

fn parse_int<T: std::str::FromStr>(pair: &Pair<'_, Rule>, what: &str) -> Result<T, DictionaryError> {
    pair.as_str()
        .parse::<T>()
        .map_err(|_| syntax(format!("{what} '{}' out of range", pair.as_str())))
}

/// Parse the contents of a field definition file.
pub(crate) fn parse_field_definitions(input: &str) -> Result<Vec<FieldDef>, DictionaryError> {
    let mut pairs = DictionaryParser::parse(Rule::field_file, input)
        .map_err(|e| syntax(e.to_string()))?;
    let file = pairs.next().expect("grammar yields one field_file");

    let mut defs = Vec::new();
    for line in file.into_inner() {
        if line.as_rule() != Rule::field_line {
            continue;
        }
        let mut parts = line.into_inner();
        let acronym = quoted_text(parts.next().expect("grammar: acronym")).to_string();
        let fid_pair = parts.next().expect("grammar: fid");
        let fid: i16 = parse_int(&fid_pair, "field id")?;
        let keyword_pair = parts.next().expect("grammar: type keyword");
        let keyword = keyword_pair.as_str();
        let data_type = DataType::try_from_keyword(keyword).ok_or_else(|| {
            DictionaryError::UnknownType {
                acronym: acronym.clone(),
                keyword: keyword.to_string(),
            }
        })?;
        let length_pair = parts.next().expect("grammar: length");
        let length: u16 = parse_int(&length_pair, "length")?;
        defs.push(FieldDef {
            acronym,
            fid,
            data_type,
            length,
        });
    }
    Ok(defs)
}

/// Parse the contents of an enum definition file.
pub(crate) fn parse_enum_definitions(input: &str) -> Result<Vec<EnumTable>, DictionaryError> {
    let mut pairs =
        DictionaryParser::parse(Rule::enum_file, input).map_err(|e| syntax(e.to_string()))?;
    let file = pairs.next().expect("grammar yields one enum_file");

    let mut tables: Vec<EnumTable> = Vec::new();
    for line in file.into_inner() {
        match line.as_rule() {
            Rule::fids_line => {
                let mut fids = Vec::new();
                for fid_pair in line.into_inner() {
                    fids.push(parse_int(&fid_pair, "field id")?);
                }
                tables.push(EnumTable::new(fids));
            }
            Rule::value_line => {
                let table = tables.last_mut().ok_or(DictionaryError::ValueOutsideTable)?;
                let mut parts = line.into_inner();
                let code_pair = parts.next().expect("grammar: code");
                let code: u16 = parse_int(&code_pair, "enum code")?;
                let display = quoted_text(parts.next().expect("grammar: display")).to_string();
                let meaning = parts.next().map(|pair| quoted_text(pair).to_string());
                table.insert(EnumValue {
                    code,
                    display,
                    meaning,
                });
            }
            _ => {}
        }
    }
    Ok(tables)
}
