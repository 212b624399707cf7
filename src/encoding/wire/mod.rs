// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte-level wire layer.
//!
//! This module defines the crate's wire layout. All multi-byte scalars
//! are big-endian and nothing is ever padded; delimiting is done with
//! length prefixes:
//!
//! | form   | width     | use                                    |
//! |--------|-----------|----------------------------------------|
//! | u15rb  | 1-2 bytes | slot lengths, entry counts             |
//! | u30rb  | 1-4 bytes | total-count hints, vector indexes      |
//! | slot   | prefix+N  | any delimited payload; empty slot = blank |
//!
//! Writers emit the two-byte u15rb form when the payload length is not
//! known in advance (the prefix is reserved and patched); readers accept
//! both widths everywhere. Slot payloads are limited to 15-bit lengths
//! (32 KiB); a larger payload is a caller error, not a wire condition.

pub mod cursor;
pub mod writer;

pub use cursor::WireCursor;
pub use writer::{SlotMark, WireWriter, MAX_SLOT_LEN, MAX_U30};
