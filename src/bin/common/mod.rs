// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Shared CLI helpers: hex input, dictionary loading, and rendering of
//! decoded payloads as text or JSON.

use std::path::Path;

use anyhow::Context;
use marketcodec::container::{
    ElementListRef, FieldListRef, FilterListRef, MapRef, SeriesRef, VectorRef,
};
use marketcodec::dictionary::DataDictionary;
use marketcodec::{CodecError, Datum, MsgRef, PayloadRef};
use serde_json::{json, Value};

/// CLI result type.
pub type Result<T> = anyhow::Result<T>;

/// Decode hex input, tolerating whitespace and an optional 0x prefix.
pub fn parse_hex(input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("0x")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    hex::decode(&cleaned).context("input is not valid hex")
}

/// Load a dictionary from a field definition file and an optional enum
/// definition file.
pub fn load_dictionary(fields: &Path, enums: Option<&Path>) -> Result<DataDictionary> {
    let mut dictionary = DataDictionary::new();
    dictionary
        .load_field_dictionary(fields)
        .with_context(|| format!("loading field dictionary {}", fields.display()))?;
    if let Some(enums) = enums {
        dictionary
            .load_enum_dictionary(enums)
            .with_context(|| format!("loading enum dictionary {}", enums.display()))?;
    }
    Ok(dictionary)
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// Format an entry-level decode error with its structured fields.
pub fn format_entry_error(e: &CodecError) -> String {
    let fields: Vec<String> = e
        .log_fields()
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    if fields.is_empty() {
        format!("<error: {e}>")
    } else {
        format!("<error: {e} ({})>", fields.join(", "))
    }
}

// ============================================================================
// Text rendering
// ============================================================================

/// Render a decoded payload as an indented text tree.
pub fn render_payload(
    out: &mut String,
    payload: &PayloadRef<'_>,
    dictionary: &DataDictionary,
    depth: usize,
) {
    match payload {
        PayloadRef::None => out.push_str(&format!("{}(no data)\n", indent(depth))),
        PayloadRef::Primitive(datum) => {
            out.push_str(&format!("{}{datum}\n", indent(depth)));
        }
        PayloadRef::FieldList(list) => render_field_list(out, list, dictionary, depth, None),
        PayloadRef::ElementList(list) => render_element_list(out, list, dictionary, depth),
        PayloadRef::FilterList(list) => render_filter_list(out, list, dictionary, depth),
        PayloadRef::Series(series) => render_series(out, series, dictionary, depth),
        PayloadRef::Vector(vector) => render_vector(out, vector, dictionary, depth),
        PayloadRef::Map(map) => render_map(out, map, dictionary, depth),
        PayloadRef::Msg(msg) => render_msg(out, msg, dictionary, depth),
        PayloadRef::Opaque(bytes) => {
            out.push_str(&format!("{}opaque {}\n", indent(depth), hex::encode(bytes)));
        }
    }
}

/// Render a field list, optionally filtering entries by acronym.
pub fn render_field_list(
    out: &mut String,
    list: &FieldListRef<'_>,
    dictionary: &DataDictionary,
    depth: usize,
    filter: Option<&regex::Regex>,
) {
    out.push_str(&format!(
        "{}field_list ({} entries)\n",
        indent(depth),
        list.count()
    ));
    for entry in list.iter(dictionary) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                out.push_str(&format!("{}{}\n", indent(depth + 1), format_entry_error(&e)));
                break;
            }
        };
        let acronym = entry.acronym(dictionary).unwrap_or("?");
        if let Some(filter) = filter {
            if !filter.is_match(acronym) {
                continue;
            }
        }
        out.push_str(&format!("{}{acronym} ({}):", indent(depth + 1), entry.field_id));
        match entry.payload() {
            Ok(PayloadRef::Primitive(datum)) => {
                out.push_str(&format!(" {datum}"));
                if let Ok(display) = entry.enum_display(dictionary) {
                    out.push_str(&format!(" \"{display}\""));
                }
                out.push('\n');
            }
            Ok(payload) => {
                out.push('\n');
                render_payload(out, payload, dictionary, depth + 2);
            }
            Err(e) => out.push_str(&format!(" {}\n", format_entry_error(&e))),
        }
    }
}

fn render_element_list(
    out: &mut String,
    list: &ElementListRef<'_>,
    dictionary: &DataDictionary,
    depth: usize,
) {
    out.push_str(&format!(
        "{}element_list ({} entries)\n",
        indent(depth),
        list.count()
    ));
    for entry in list.iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                out.push_str(&format!("{}{}\n", indent(depth + 1), format_entry_error(&e)));
                break;
            }
        };
        let name = entry.name().unwrap_or("?");
        out.push_str(&format!("{}{name}:", indent(depth + 1)));
        match entry.payload() {
            Ok(PayloadRef::Primitive(datum)) => out.push_str(&format!(" {datum}\n")),
            Ok(payload) => {
                out.push('\n');
                render_payload(out, payload, dictionary, depth + 2);
            }
            Err(e) => out.push_str(&format!(" {}\n", format_entry_error(&e))),
        }
    }
}

fn render_filter_list(
    out: &mut String,
    list: &FilterListRef<'_>,
    dictionary: &DataDictionary,
    depth: usize,
) {
    out.push_str(&format!(
        "{}filter_list ({} entries, default {})\n",
        indent(depth),
        list.count(),
        list.container_type
    ));
    for entry in list.iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                out.push_str(&format!("{}{}\n", indent(depth + 1), format_entry_error(&e)));
                break;
            }
        };
        out.push_str(&format!(
            "{}[{}] {:?}\n",
            indent(depth + 1),
            entry.id,
            entry.action
        ));
        match entry.payload() {
            Ok(payload) => render_payload(out, payload, dictionary, depth + 2),
            Err(e) => out.push_str(&format!("{}{}\n", indent(depth + 2), format_entry_error(&e))),
        }
    }
}

fn render_series(
    out: &mut String,
    series: &SeriesRef<'_>,
    dictionary: &DataDictionary,
    depth: usize,
) {
    out.push_str(&format!(
        "{}series ({} entries of {})\n",
        indent(depth),
        series.count(),
        series.container_type
    ));
    if let Ok(Some(summary)) = series.summary() {
        out.push_str(&format!("{}summary:\n", indent(depth + 1)));
        render_payload(out, &summary, dictionary, depth + 2);
    }
    for entry in series.iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                out.push_str(&format!("{}{}\n", indent(depth + 1), format_entry_error(&e)));
                break;
            }
        };
        match entry.payload() {
            Ok(payload) => render_payload(out, payload, dictionary, depth + 1),
            Err(e) => out.push_str(&format!("{}{}\n", indent(depth + 1), format_entry_error(&e))),
        }
    }
}

fn render_vector(
    out: &mut String,
    vector: &VectorRef<'_>,
    dictionary: &DataDictionary,
    depth: usize,
) {
    out.push_str(&format!(
        "{}vector ({} entries of {})\n",
        indent(depth),
        vector.count(),
        vector.container_type
    ));
    if let Ok(Some(summary)) = vector.summary() {
        out.push_str(&format!("{}summary:\n", indent(depth + 1)));
        render_payload(out, &summary, dictionary, depth + 2);
    }
    for entry in vector.iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                out.push_str(&format!("{}{}\n", indent(depth + 1), format_entry_error(&e)));
                break;
            }
        };
        out.push_str(&format!(
            "{}[{}] {:?}\n",
            indent(depth + 1),
            entry.index,
            entry.action
        ));
        match entry.payload() {
            Ok(payload) => render_payload(out, payload, dictionary, depth + 2),
            Err(e) => out.push_str(&format!("{}{}\n", indent(depth + 2), format_entry_error(&e))),
        }
    }
}

fn render_map(out: &mut String, map: &MapRef<'_>, dictionary: &DataDictionary, depth: usize) {
    out.push_str(&format!(
        "{}map ({} entries, {} keys, {} payloads)\n",
        indent(depth),
        map.count(),
        map.key_type,
        map.container_type
    ));
    if let Ok(Some(summary)) = map.summary() {
        out.push_str(&format!("{}summary:\n", indent(depth + 1)));
        render_payload(out, &summary, dictionary, depth + 2);
    }
    for entry in map.iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                out.push_str(&format!("{}{}\n", indent(depth + 1), format_entry_error(&e)));
                break;
            }
        };
        let key = match entry.key() {
            Ok(key) => key.to_string(),
            Err(e) => format_entry_error(&e),
        };
        out.push_str(&format!(
            "{}{key} {:?}\n",
            indent(depth + 1),
            entry.action
        ));
        match entry.load() {
            Ok(payload) => render_payload(out, payload, dictionary, depth + 2),
            Err(e) => out.push_str(&format!("{}{}\n", indent(depth + 2), format_entry_error(&e))),
        }
    }
}

fn render_msg(out: &mut String, msg: &MsgRef<'_>, dictionary: &DataDictionary, depth: usize) {
    out.push_str(&format!(
        "{}msg {:?} domain={} stream={}\n",
        indent(depth),
        msg.class(),
        msg.domain,
        msg.stream_id
    ));
    if let Some(key) = msg.key() {
        if let Some(name) = key.name() {
            out.push_str(&format!(
                "{}name: {}\n",
                indent(depth + 1),
                String::from_utf8_lossy(name)
            ));
        }
        if key.has_attrib() {
            out.push_str(&format!("{}attrib:\n", indent(depth + 1)));
            match key.attrib() {
                Ok(attrib) => render_payload(out, &attrib, dictionary, depth + 2),
                Err(e) => {
                    out.push_str(&format!("{}{}\n", indent(depth + 2), format_entry_error(&e)))
                }
            }
        }
    }
    out.push_str(&format!(
        "{}payload ({}):\n",
        indent(depth + 1),
        msg.payload_type()
    ));
    match msg.payload() {
        Ok(payload) => render_payload(out, &payload, dictionary, depth + 2),
        Err(e) => out.push_str(&format!("{}{}\n", indent(depth + 2), format_entry_error(&e))),
    }
}

// ============================================================================
// JSON rendering
// ============================================================================

fn datum_to_json(datum: &Datum) -> Value {
    match datum {
        Datum::Blank(data_type) => json!({ "blank": data_type.to_string() }),
        Datum::Present(value) => {
            serde_json::to_value(value).unwrap_or_else(|_| Value::String(value.to_string()))
        }
    }
}

fn error_to_json(e: &CodecError) -> Value {
    let mut fields = serde_json::Map::new();
    fields.insert("message".to_string(), Value::String(e.to_string()));
    for (name, value) in e.log_fields() {
        fields.insert(name.to_string(), Value::String(value));
    }
    json!({ "error": Value::Object(fields) })
}

/// Render a decoded payload as JSON.
pub fn payload_to_json(payload: &PayloadRef<'_>, dictionary: &DataDictionary) -> Value {
    match payload {
        PayloadRef::None => Value::Null,
        PayloadRef::Primitive(datum) => datum_to_json(datum),
        PayloadRef::FieldList(list) => {
            let entries: Vec<Value> = list
                .iter(dictionary)
                .map(|entry| match entry {
                    Ok(entry) => {
                        let payload = match entry.payload() {
                            Ok(payload) => payload_to_json(payload, dictionary),
                            Err(e) => error_to_json(&e),
                        };
                        json!({
                            "fid": entry.field_id,
                            "acronym": entry.acronym(dictionary),
                            "value": payload,
                        })
                    }
                    Err(e) => error_to_json(&e),
                })
                .collect();
            json!({ "field_list": entries })
        }
        PayloadRef::ElementList(list) => {
            let entries: Vec<Value> = list
                .iter()
                .map(|entry| match entry {
                    Ok(entry) => {
                        let payload = match entry.payload() {
                            Ok(payload) => payload_to_json(payload, dictionary),
                            Err(e) => error_to_json(&e),
                        };
                        json!({
                            "name": entry.name().unwrap_or("?"),
                            "value": payload,
                        })
                    }
                    Err(e) => error_to_json(&e),
                })
                .collect();
            json!({ "element_list": entries })
        }
        PayloadRef::FilterList(list) => {
            let entries: Vec<Value> = list
                .iter()
                .map(|entry| match entry {
                    Ok(entry) => {
                        let payload = match entry.payload() {
                            Ok(payload) => payload_to_json(payload, dictionary),
                            Err(e) => error_to_json(&e),
                        };
                        json!({
                            "id": entry.id,
                            "action": format!("{:?}", entry.action),
                            "value": payload,
                        })
                    }
                    Err(e) => error_to_json(&e),
                })
                .collect();
            json!({ "filter_list": entries })
        }
        PayloadRef::Series(series) => {
            let entries: Vec<Value> = series
                .iter()
                .map(|entry| match entry {
                    Ok(entry) => match entry.payload() {
                        Ok(payload) => payload_to_json(payload, dictionary),
                        Err(e) => error_to_json(&e),
                    },
                    Err(e) => error_to_json(&e),
                })
                .collect();
            json!({ "series": entries })
        }
        PayloadRef::Vector(vector) => {
            let entries: Vec<Value> = vector
                .iter()
                .map(|entry| match entry {
                    Ok(entry) => {
                        let payload = match entry.payload() {
                            Ok(payload) => payload_to_json(payload, dictionary),
                            Err(e) => error_to_json(&e),
                        };
                        json!({
                            "index": entry.index,
                            "action": format!("{:?}", entry.action),
                            "value": payload,
                        })
                    }
                    Err(e) => error_to_json(&e),
                })
                .collect();
            json!({ "vector": entries })
        }
        PayloadRef::Map(map) => {
            let entries: Vec<Value> = map
                .iter()
                .map(|entry| match entry {
                    Ok(entry) => {
                        let key = match entry.key() {
                            Ok(key) => datum_to_json(key),
                            Err(e) => error_to_json(&e),
                        };
                        let payload = match entry.load() {
                            Ok(payload) => payload_to_json(payload, dictionary),
                            Err(e) => error_to_json(&e),
                        };
                        json!({
                            "key": key,
                            "action": format!("{:?}", entry.action),
                            "value": payload,
                        })
                    }
                    Err(e) => error_to_json(&e),
                })
                .collect();
            json!({ "map": entries })
        }
        PayloadRef::Msg(msg) => msg_to_json(msg, dictionary),
        PayloadRef::Opaque(bytes) => json!({ "opaque": hex::encode(bytes) }),
    }
}

/// Render a decoded message as JSON.
pub fn msg_to_json(msg: &MsgRef<'_>, dictionary: &DataDictionary) -> Value {
    let payload = match msg.payload() {
        Ok(payload) => payload_to_json(&payload, dictionary),
        Err(e) => error_to_json(&e),
    };
    let attrib = msg.key().filter(|key| key.has_attrib()).map(|key| {
        match key.attrib() {
            Ok(attrib) => payload_to_json(&attrib, dictionary),
            Err(e) => error_to_json(&e),
        }
    });
    json!({
        "class": format!("{:?}", msg.class()),
        "domain": msg.domain,
        "stream_id": msg.stream_id,
        "name": msg
            .key()
            .and_then(|key| key.name())
            .map(|name| String::from_utf8_lossy(name).into_owned()),
        "attrib": attrib,
        "payload_type": msg.payload_type().to_string(),
        "payload": payload,
    })
}
