//! Core types for the Seesaw transaction decoder
//!
//! This module defines the bus events the decoder consumes, the transaction
//! records it emits, and the error type shared by the whole library.

use crate::registers::Action;
use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Timestamp type used for display
pub type Timestamp = DateTime<Utc>;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Convert a capture timestamp in nanoseconds to a `Timestamp`
pub fn timestamp_from_ns(ns: u64) -> Timestamp {
    let secs = (ns / 1_000_000_000) as i64;
    let nsecs = (ns % 1_000_000_000) as u32;
    DateTime::from_timestamp(secs, nsecs).unwrap_or_default()
}

/// One primitive bus occurrence as delivered by the capture host
///
/// Every event carries the span it occupied on the bus, in nanoseconds
/// since the start of the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BusEvent {
    /// Start (or repeated start) condition
    Start {
        #[serde(default)]
        start_ns: u64,
        #[serde(default)]
        end_ns: u64,
    },
    /// Stop condition
    Stop {
        #[serde(default)]
        start_ns: u64,
        #[serde(default)]
        end_ns: u64,
    },
    /// Address byte with its read/write bit
    #[serde(rename = "address")]
    AddressPhase {
        /// 7-bit device address
        address: u8,
        /// True for a read, false for a write
        #[serde(rename = "read")]
        is_read: bool,
        start_ns: u64,
        end_ns: u64,
    },
    /// One data byte
    #[serde(rename = "data")]
    DataPhase {
        #[serde(rename = "data")]
        byte: u8,
        start_ns: u64,
        end_ns: u64,
    },
}

impl BusEvent {
    /// Start of the event, in nanoseconds
    pub fn start_ns(&self) -> u64 {
        match self {
            BusEvent::Start { start_ns, .. }
            | BusEvent::Stop { start_ns, .. }
            | BusEvent::AddressPhase { start_ns, .. }
            | BusEvent::DataPhase { start_ns, .. } => *start_ns,
        }
    }

    /// End of the event, in nanoseconds
    pub fn end_ns(&self) -> u64 {
        match self {
            BusEvent::Start { end_ns, .. }
            | BusEvent::Stop { end_ns, .. }
            | BusEvent::AddressPhase { end_ns, .. }
            | BusEvent::DataPhase { end_ns, .. } => *end_ns,
        }
    }

    /// Short name of the event type, as used in captures
    pub fn type_name(&self) -> &'static str {
        match self {
            BusEvent::Start { .. } => "start",
            BusEvent::Stop { .. } => "stop",
            BusEvent::AddressPhase { .. } => "address",
            BusEvent::DataPhase { .. } => "data",
        }
    }
}

/// Errors that can occur while configuring the analyzer or reading captures
///
/// The decoding state machine itself never fails; protocol desynchronization
/// is absorbed silently.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Target address is missing")]
    MissingTargetAddress,

    #[error("Invalid target address: {0}")]
    InvalidTargetAddress(String),

    #[error("Invalid temperature unit: {0} (expected C or F)")]
    InvalidTemperatureUnit(String),

    #[error("Failed to parse capture line {line}: {message}")]
    CaptureParseError { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Direction of a bus transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Write,
    Read,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Write => f.pad("Write"),
            TransactionKind::Read => f.pad("Read"),
        }
    }
}

/// Selects the output template of a record: `default` or a formatted action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayKind {
    #[default]
    Default,
    Action(Action),
}

impl fmt::Display for DisplayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayKind::Default => f.pad("default"),
            DisplayKind::Action(action) => f.pad(action.name()),
        }
    }
}

impl Serialize for DisplayKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rendered value of a finished transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValue {
    /// Raw accumulated value (default template), as wide as the read
    Integer(BigUint),
    /// Formatted value or write label
    Text(String),
}

impl From<u64> for RecordValue {
    fn from(value: u64) -> Self {
        RecordValue::Integer(BigUint::from(value))
    }
}

impl Serialize for RecordValue {
    /// Integers that fit a `u64` serialize as numbers, wider ones as decimal strings
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            RecordValue::Integer(v) => match u64::try_from(v) {
                Ok(small) => serializer.serialize_u64(small),
                Err(_) => serializer.collect_str(v),
            },
            RecordValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordValue::Integer(v) => write!(f, "{}", v),
            RecordValue::Text(s) => f.write_str(s),
        }
    }
}

/// A finished transaction, emitted once when the next address phase arrives
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub kind: TransactionKind,
    pub display_kind: DisplayKind,
    pub start_ns: u64,
    pub end_ns: u64,
    pub value: RecordValue,
}

impl TransactionRecord {
    pub fn start_time(&self) -> Timestamp {
        timestamp_from_ns(self.start_ns)
    }

    pub fn end_time(&self) -> Timestamp {
        timestamp_from_ns(self.end_ns)
    }

    /// Render the record value through its display template
    ///
    /// `default` renders the bare value; `Temperature` appends the unit.
    pub fn display(&self, unit: crate::config::TemperatureUnit) -> String {
        match self.display_kind {
            DisplayKind::Action(Action::Temperature) => format!("{} {}", self.value, unit),
            _ => self.value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemperatureUnit;

    #[test]
    fn test_bus_event_from_json() {
        let event: BusEvent =
            serde_json::from_str(r#"{"type":"address","address":73,"read":true,"start_ns":10,"end_ns":20}"#)
                .unwrap();
        assert_eq!(
            event,
            BusEvent::AddressPhase { address: 0x49, is_read: true, start_ns: 10, end_ns: 20 }
        );

        let event: BusEvent = serde_json::from_str(r#"{"type":"stop"}"#).unwrap();
        assert_eq!(event, BusEvent::Stop { start_ns: 0, end_ns: 0 });
        assert_eq!(event.type_name(), "stop");

        let event = BusEvent::DataPhase { byte: 0x2C, start_ns: 400, end_ns: 490 };
        assert_eq!((event.start_ns(), event.end_ns()), (400, 490));
    }

    #[test]
    fn test_record_display_templates() {
        let mut record = TransactionRecord {
            kind: TransactionKind::Read,
            display_kind: DisplayKind::Action(Action::Temperature),
            start_ns: 0,
            end_ns: 5,
            value: RecordValue::Text("100.00".to_string()),
        };
        assert_eq!(record.display(TemperatureUnit::Celsius), "100.00 C");

        record.display_kind = DisplayKind::Default;
        record.value = RecordValue::from(300u64);
        assert_eq!(record.display(TemperatureUnit::Fahrenheit), "300");
    }

    #[test]
    fn test_record_serialization() {
        let record = TransactionRecord {
            kind: TransactionKind::Write,
            display_kind: DisplayKind::Default,
            start_ns: 1,
            end_ns: 2,
            value: RecordValue::Text("Capacitive".to_string()),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"write","display_kind":"default","start_ns":1,"end_ns":2,"value":"Capacitive"}"#
        );
    }

    #[test]
    fn test_wide_integer_serialization() {
        let small = RecordValue::from(300u64);
        assert_eq!(serde_json::to_string(&small).unwrap(), "300");

        let wide = RecordValue::Integer(BigUint::from_bytes_be(&[0x01, 0, 0, 0, 0, 0, 0, 0, 0x02]));
        assert_eq!(wide.to_string(), "18446744073709551618");
        assert_eq!(serde_json::to_string(&wide).unwrap(), r#""18446744073709551618""#);
    }

    #[test]
    fn test_timestamp_conversion() {
        let ts = timestamp_from_ns(1_500_000_000);
        assert_eq!(ts.timestamp(), 1);
        assert_eq!(ts.timestamp_subsec_nanos(), 500_000_000);
    }
}
