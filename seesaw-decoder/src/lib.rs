//! Seesaw Transaction Decoder Library
//!
//! Reconstructs register accesses to an Adafruit Seesaw peripheral from the
//! bus-level events (start, stop, address, data) produced by a logic
//! analyzer's I2C decoder.
//!
//! # Architecture
//!
//! Decoding is a two-stage pipeline per target device:
//! - [`AddressFilter`] forwards only the events of one bus address
//! - [`TransactionDecoder`] parses the two-byte register addressing
//!   convention, accumulates read values and emits finished
//!   [`TransactionRecord`]s
//!
//! [`Analyzer`] wires the two together. Signal sampling, rendering and the
//! host's settings UI are not part of this library.
//!
//! # Example Usage
//!
//! ```
//! use seesaw_decoder::{Analyzer, AnalyzerConfig, BusEvent, RecordValue};
//!
//! let config = AnalyzerConfig::from_settings(Some("0x49"), Some("C")).unwrap();
//! let mut analyzer = Analyzer::new(config);
//!
//! let events = [
//!     BusEvent::AddressPhase { address: 0x49, is_read: false, start_ns: 0, end_ns: 10 },
//!     BusEvent::DataPhase { byte: 0x0F, start_ns: 10, end_ns: 20 },
//!     BusEvent::DataPhase { byte: 0x10, start_ns: 20, end_ns: 30 },
//!     BusEvent::AddressPhase { address: 0x49, is_read: true, start_ns: 40, end_ns: 50 },
//!     BusEvent::DataPhase { byte: 0x01, start_ns: 50, end_ns: 60 },
//!     BusEvent::DataPhase { byte: 0x2C, start_ns: 60, end_ns: 70 },
//! ];
//!
//! let records = analyzer.decode_all(&events);
//! assert_eq!(records[0].value, RecordValue::Text("Capacitive".into()));
//! assert_eq!(records[1].value, RecordValue::from(300u64));
//! ```

// Public modules
pub mod analyzer;
pub mod capture;
pub mod config;
pub mod decoder;
pub mod filter;
pub mod registers;
pub mod types;

// Re-export main types for convenience
pub use analyzer::{Analyzer, AnalyzerStats};
pub use capture::CaptureReader;
pub use config::{parse_target_address, AnalyzerConfig, TemperatureUnit};
pub use decoder::{GroupResolution, TransactionDecoder, WritePhase};
pub use filter::AddressFilter;
pub use registers::{Action, BaseGroup, RegisterTable, TableStats};
pub use types::{
    BusEvent, DecoderError, DisplayKind, RecordValue, Result, Timestamp, TransactionKind,
    TransactionRecord,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh analyzer has seen nothing
        let analyzer = Analyzer::new(AnalyzerConfig::new(0x49));
        assert_eq!(analyzer.stats(), AnalyzerStats::default());
        assert_eq!(analyzer.target_address(), 0x49);
    }
}
