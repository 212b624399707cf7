// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Quality-of-service and stream state values.
//!
//! `Qos` describes how current and how conflated a data stream is.
//! `State` describes the stream lifecycle and the trustworthiness of the
//! data on it, with an optional code and human-readable text.

use crate::core::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How current the data on a stream is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Timeliness {
    /// Timeliness not specified
    #[default]
    Unspecified = 0,
    /// Data is current
    Realtime = 1,
    /// Delayed by an unknown amount
    DelayedUnknown = 2,
    /// Delayed by a known amount carried in `time_info`
    Delayed = 3,
}

impl Timeliness {
    /// Decode from a wire code.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Timeliness::Unspecified),
            1 => Ok(Timeliness::Realtime),
            2 => Ok(Timeliness::DelayedUnknown),
            3 => Ok(Timeliness::Delayed),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized timeliness code {other}"
            ))),
        }
    }
}

/// How conflated the data on a stream is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rate {
    /// Rate not specified
    #[default]
    Unspecified = 0,
    /// Every tick is delivered
    TickByTick = 1,
    /// Conflated as needed under load
    JustInTimeConflated = 2,
    /// Conflated on a fixed interval carried in `rate_info`
    TimeConflated = 3,
}

impl Rate {
    /// Decode from a wire code.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Rate::Unspecified),
            1 => Ok(Rate::TickByTick),
            2 => Ok(Rate::JustInTimeConflated),
            3 => Ok(Rate::TimeConflated),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized rate code {other}"
            ))),
        }
    }
}

/// Quality of service for a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qos {
    /// Timeliness classification
    pub timeliness: Timeliness,
    /// Rate classification
    pub rate: Rate,
    /// Whether the QoS may change over the stream's life
    pub dynamic: bool,
    /// Delay in seconds, meaningful only with `Timeliness::Delayed`
    pub time_info: u16,
    /// Conflation interval in milliseconds, meaningful only with `Rate::TimeConflated`
    pub rate_info: u16,
}

impl Qos {
    /// Create a realtime tick-by-tick QoS.
    #[must_use]
    pub fn realtime_tick_by_tick() -> Self {
        Self {
            timeliness: Timeliness::Realtime,
            rate: Rate::TickByTick,
            ..Self::default()
        }
    }
}

impl fmt::Display for Qos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.timeliness, self.rate)?;
        if self.dynamic {
            write!(f, " (dynamic)")?;
        }
        Ok(())
    }
}

/// Lifecycle of the stream carrying the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum StreamState {
    /// State not specified
    #[default]
    Unspecified = 0,
    /// Stream is open and may deliver further data
    Open = 1,
    /// Stream delivers a single response then closes
    NonStreaming = 2,
    /// Stream is closed
    Closed = 3,
    /// Stream is closed but may be reopened later
    ClosedRecover = 4,
    /// Stream is closed; the item is available elsewhere
    ClosedRedirected = 5,
}

impl StreamState {
    /// Decode from a wire code.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(StreamState::Unspecified),
            1 => Ok(StreamState::Open),
            2 => Ok(StreamState::NonStreaming),
            3 => Ok(StreamState::Closed),
            4 => Ok(StreamState::ClosedRecover),
            5 => Ok(StreamState::ClosedRedirected),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized stream state code {other}"
            ))),
        }
    }
}

/// Trustworthiness of the data on the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DataState {
    /// No change from the previous state
    #[default]
    NoChange = 0,
    /// Data is current and consistent
    Ok = 1,
    /// Data may be stale or inconsistent
    Suspect = 2,
}

impl DataState {
    /// Decode from a wire code.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(DataState::NoChange),
            1 => Ok(DataState::Ok),
            2 => Ok(DataState::Suspect),
            other => Err(CodecError::invalid_argument(format!(
                "unrecognized data state code {other}"
            ))),
        }
    }
}

/// Well-known state code values.
pub mod state_code {
    /// No additional information
    pub const NONE: u8 = 0;
    /// Item not found
    pub const NOT_FOUND: u8 = 5;
    /// Request timed out
    pub const TIMEOUT: u8 = 6;
    /// Not entitled to the item
    pub const NOT_ENTITLED: u8 = 7;
    /// Invalid argument in the request
    pub const INVALID_ARGUMENT: u8 = 8;
    /// Usage error
    pub const USAGE_ERROR: u8 = 9;
    /// Source temporarily unavailable
    pub const NO_RESOURCES: u8 = 11;
    /// Request was already open
    pub const ALREADY_OPEN: u8 = 14;
}

/// Stream and data state with code and text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    /// Stream lifecycle
    pub stream_state: StreamState,
    /// Data trustworthiness
    pub data_state: DataState,
    /// Code giving more detail, see [`state_code`]
    pub code: u8,
    /// Human-readable description
    pub text: String,
}

impl State {
    /// Create a state with empty text.
    #[must_use]
    pub fn new(stream_state: StreamState, data_state: DataState, code: u8) -> Self {
        Self {
            stream_state,
            data_state,
            code,
            text: String::new(),
        }
    }

    /// Create an open/ok state with the given text.
    #[must_use]
    pub fn open_ok(text: impl Into<String>) -> Self {
        Self {
            stream_state: StreamState::Open,
            data_state: DataState::Ok,
            code: state_code::NONE,
            text: text.into(),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}/{:?} code={}",
            self.stream_state, self.data_state, self.code
        )?;
        if !self.text.is_empty() {
            write!(f, " \"{}\"", self.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeliness_codes() {
        assert_eq!(Timeliness::from_code(1).unwrap(), Timeliness::Realtime);
        assert_eq!(Timeliness::from_code(3).unwrap(), Timeliness::Delayed);
        assert!(Timeliness::from_code(4).is_err());
    }

    #[test]
    fn test_rate_codes() {
        assert_eq!(Rate::from_code(1).unwrap(), Rate::TickByTick);
        assert_eq!(Rate::from_code(3).unwrap(), Rate::TimeConflated);
        assert!(Rate::from_code(9).is_err());
    }

    #[test]
    fn test_stream_state_codes() {
        assert_eq!(StreamState::from_code(1).unwrap(), StreamState::Open);
        assert_eq!(
            StreamState::from_code(5).unwrap(),
            StreamState::ClosedRedirected
        );
        assert!(StreamState::from_code(6).is_err());
    }

    #[test]
    fn test_data_state_codes() {
        assert_eq!(DataState::from_code(2).unwrap(), DataState::Suspect);
        assert!(DataState::from_code(3).is_err());
    }

    #[test]
    fn test_qos_display() {
        let qos = Qos::realtime_tick_by_tick();
        assert_eq!(qos.to_string(), "Realtime/TickByTick");

        let mut dynamic = qos;
        dynamic.dynamic = true;
        assert_eq!(dynamic.to_string(), "Realtime/TickByTick (dynamic)");
    }

    #[test]
    fn test_state_display() {
        let state = State::open_ok("All is well");
        assert_eq!(state.to_string(), "Open/Ok code=0 \"All is well\"");

        let bare = State::new(StreamState::Closed, DataState::Suspect, state_code::NOT_FOUND);
        assert_eq!(bare.to_string(), "Closed/Suspect code=5");
    }
}
