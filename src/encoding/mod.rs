// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encoding layers.
//!
//! - [`wire`] - byte-level cursor and writer for the wire layout
//! - [`primitive`] - scalar values to and from wire payloads
//!
//! Container and message encoding build on these; see the
//! [`container`](crate::container) and [`message`](crate::message)
//! modules.

pub mod primitive;
pub mod wire;

pub use primitive::{decode_datum, decode_primitive, encode_datum_slot, encode_primitive};
pub use wire::{WireCursor, WireWriter};
