// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types shared by every codec layer.
//!
//! - [`error`] - error taxonomy and `Result` alias
//! - [`types`] - wire type tags
//! - [`value`] - primitive value model with blank semantics
//! - [`real`] - fixed-point decimal
//! - [`temporal`] - date, time, and datetime
//! - [`quality`] - quality of service and stream state

pub mod error;
pub mod quality;
pub mod real;
pub mod temporal;
pub mod types;
pub mod value;

pub use error::{CodecError, Result};
pub use quality::{DataState, Qos, Rate, State, StreamState, Timeliness};
pub use real::{Real, RealHint};
pub use temporal::{Date, DateTime, Time};
pub use types::DataType;
pub use value::{ArrayValue, DataCode, Datum, PrimitiveValue};
