//! Report generation
//!
//! Prints the decoded transactions of every device, as aligned text or as
//! JSON lines.

use anyhow::Result;
use seesaw_decoder::{AnalyzerConfig, AnalyzerStats, TransactionRecord};
use serde::Serialize;
use std::io::Write;

/// Decoded transactions of one device
#[derive(Debug, Clone)]
pub struct DeviceReport {
    pub name: String,
    pub config: AnalyzerConfig,
    pub records: Vec<TransactionRecord>,
    pub stats: AnalyzerStats,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    device: &'a str,
    address: u8,
    #[serde(flatten)]
    record: &'a TransactionRecord,
    rendered: String,
}

/// Write one JSON object per transaction
pub fn write_json<W: Write>(out: &mut W, reports: &[DeviceReport]) -> Result<()> {
    for report in reports {
        for record in &report.records {
            let line = JsonRecord {
                device: &report.name,
                address: report.config.target_address,
                record,
                rendered: record.display(report.config.temperature_unit),
            };
            serde_json::to_writer(&mut *out, &line)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Write a human-readable listing with a summary per device
pub fn write_text<W: Write>(out: &mut W, reports: &[DeviceReport]) -> Result<()> {
    for report in reports {
        writeln!(
            out,
            "=== {} (0x{:02X}) ===",
            report.name, report.config.target_address
        )?;
        for record in &report.records {
            writeln!(
                out,
                "{} - {}  {:<5}  {:<11}  {}",
                record.start_time().format("%H:%M:%S%.9f"),
                record.end_time().format("%H:%M:%S%.9f"),
                record.kind,
                record.display_kind,
                record.display(report.config.temperature_unit),
            )?;
        }
        writeln!(
            out,
            "{} transactions ({} events forwarded, {} suppressed)\n",
            report.stats.records, report.stats.forwarded_events, report.stats.suppressed_events
        )?;
    }
    Ok(())
}
