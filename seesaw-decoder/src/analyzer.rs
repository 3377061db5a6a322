//! Filter → decoder pipeline for one target device

use crate::config::AnalyzerConfig;
use crate::decoder::TransactionDecoder;
use crate::filter::AddressFilter;
use crate::types::{BusEvent, TransactionRecord};

/// One analyzer instance: an address filter feeding a transaction decoder
///
/// Instances share nothing, so several devices on the same bus are analyzed
/// by independent analyzers over the same event stream.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    filter: AddressFilter,
    decoder: TransactionDecoder,
    stats: AnalyzerStats,
}

/// Event and record counters of an analyzer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerStats {
    pub forwarded_events: usize,
    pub suppressed_events: usize,
    pub records: usize,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        log::debug!(
            "Creating analyzer for address 0x{:02X} ({})",
            config.target_address,
            config.temperature_unit
        );
        Self {
            config,
            filter: AddressFilter::new(config.target_address),
            decoder: TransactionDecoder::new(config.temperature_unit),
            stats: AnalyzerStats::default(),
        }
    }

    /// Run one event through the filter and, if forwarded, the decoder
    pub fn decode(&mut self, event: &BusEvent) -> Option<TransactionRecord> {
        let Some(event) = self.filter.decode(event) else {
            log::trace!(
                "Suppressed {} event at {}..{} ns",
                event.type_name(),
                event.start_ns(),
                event.end_ns()
            );
            self.stats.suppressed_events += 1;
            return None;
        };
        self.stats.forwarded_events += 1;

        let record = self.decoder.decode(event);
        if record.is_some() {
            self.stats.records += 1;
        }
        record
    }

    /// Flush the transaction still in flight at the end of a capture
    pub fn finish(&mut self) -> Option<TransactionRecord> {
        let record = self.decoder.finish();
        if record.is_some() {
            self.stats.records += 1;
        }
        record
    }

    /// Decode a whole event sequence, flushing the final transaction
    pub fn decode_all<'e, I>(&mut self, events: I) -> Vec<TransactionRecord>
    where
        I: IntoIterator<Item = &'e BusEvent>,
    {
        let mut records: Vec<TransactionRecord> =
            events.into_iter().filter_map(|event| self.decode(event)).collect();
        records.extend(self.finish());
        records
    }

    pub fn target_address(&self) -> u8 {
        self.config.target_address
    }

    pub fn stats(&self) -> AnalyzerStats {
        self.stats
    }
}
