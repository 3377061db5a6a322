//! Seesaw Analyzer CLI Application
//!
//! Replays a recorded I2C capture through one analyzer per target device and
//! prints the decoded register transactions. Devices are independent, so
//! they are analyzed in parallel over the same event list.

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use seesaw_decoder::{Analyzer, BusEvent, CaptureReader, RegisterTable};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::{DeviceConfig, OutputFormat};
use report::DeviceReport;

/// Seesaw Analyzer - Decode Seesaw register accesses from I2C captures
#[derive(Parser, Debug)]
#[command(name = "seesaw-cli")]
#[command(about = "Decode Seesaw register transactions from an I2C capture", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the capture (JSON lines of bus events)
    #[arg(short, long, value_name = "FILE")]
    capture: PathBuf,

    /// Target device address (decimal or 0x-prefixed hex)
    #[arg(short, long, value_name = "ADDR")]
    address: Option<String>,

    /// Temperature unit for the target device (C or F)
    #[arg(short, long, value_name = "UNIT", requires = "address")]
    units: Option<String>,

    /// Path to configuration file (config.toml) describing several devices
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for decoded transactions (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Seesaw Analyzer CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", seesaw_decoder::VERSION);

    let (devices, config_format) = resolve_devices(&args)?;
    let format = args.format.or(config_format).unwrap_or_default();

    let stats = RegisterTable::new().stats();
    log::debug!(
        "Register table: {} base groups, {} actions",
        stats.num_groups,
        stats.num_actions
    );

    let events = read_capture(&args.capture)?;
    log::info!("Loaded {} bus events from {:?}", events.len(), args.capture);

    let reports = analyze(&devices, &events)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            let mut out = BufWriter::new(file);
            write_report(&mut out, format, &reports)?;
            out.flush()?;
            log::info!("Report written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_report(&mut out, format, &reports)?;
        }
    }

    Ok(())
}

/// Devices come from --address (single device) or from the config file
fn resolve_devices(args: &Args) -> Result<(Vec<DeviceConfig>, Option<OutputFormat>)> {
    if let Some(address) = &args.address {
        let device = DeviceConfig {
            name: None,
            address: address.clone(),
            temperature_unit: args.units.clone(),
        };
        let format = match &args.config {
            Some(path) => Some(config::load_config(path)?.output.format),
            None => None,
        };
        return Ok((vec![device], format));
    }

    if let Some(path) = &args.config {
        log::info!("Loading configuration from: {:?}", path);
        let config = config::load_config(path)?;
        log::debug!("Configuration loaded: {} devices", config.devices.len());
        return Ok((config.devices, Some(config.output.format)));
    }

    bail!("No target device given: use --address or --config")
}

fn read_capture(path: &Path) -> Result<Vec<BusEvent>> {
    let reader = CaptureReader::open(path)
        .with_context(|| format!("Failed to open capture: {:?}", path))?;
    let events = reader
        .collect::<seesaw_decoder::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read capture: {:?}", path))?;
    Ok(events)
}

fn analyze(devices: &[DeviceConfig], events: &[BusEvent]) -> Result<Vec<DeviceReport>> {
    // Validate every device before spending time on decoding
    let configs = devices
        .iter()
        .map(|device| -> Result<_> { Ok((device.display_name(), device.analyzer_config()?)) })
        .collect::<Result<Vec<_>>>()?;

    let reports = configs
        .into_par_iter()
        .map(|(name, config)| {
            let mut analyzer = Analyzer::new(config);
            let records = analyzer.decode_all(events);
            log::info!(
                "{}: {} transactions from 0x{:02X}",
                name,
                records.len(),
                config.target_address
            );
            DeviceReport {
                name,
                config,
                records,
                stats: analyzer.stats(),
            }
        })
        .collect();

    Ok(reports)
}

fn write_report<W: Write>(out: &mut W, format: OutputFormat, reports: &[DeviceReport]) -> Result<()> {
    match format {
        OutputFormat::Text => report::write_text(out, reports),
        OutputFormat::Json => report::write_json(out, reports),
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use seesaw_decoder::RecordValue;

    fn device(address: &str, unit: Option<&str>) -> DeviceConfig {
        DeviceConfig {
            name: None,
            address: address.to_string(),
            temperature_unit: unit.map(str::to_string),
        }
    }

    #[test]
    fn test_analyze_multiple_devices() {
        let events = vec![
            BusEvent::AddressPhase { address: 0x49, is_read: false, start_ns: 0, end_ns: 10 },
            BusEvent::DataPhase { byte: 0x00, start_ns: 10, end_ns: 20 },
            BusEvent::DataPhase { byte: 0x04, start_ns: 20, end_ns: 30 },
            BusEvent::AddressPhase { address: 0x49, is_read: true, start_ns: 40, end_ns: 50 },
            BusEvent::DataPhase { byte: 0x00, start_ns: 50, end_ns: 60 },
            BusEvent::DataPhase { byte: 0x64, start_ns: 60, end_ns: 70 },
            BusEvent::DataPhase { byte: 0x00, start_ns: 70, end_ns: 80 },
            BusEvent::DataPhase { byte: 0x00, start_ns: 80, end_ns: 90 },
        ];
        let devices = vec![device("0x49", Some("F")), device("54", None)];

        let reports = analyze(&devices, &events).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].records.len(), 2);
        assert_eq!(reports[0].records[1].value, RecordValue::Text("212.00".to_string()));
        assert!(reports[1].records.is_empty());
        assert_eq!(reports[1].stats.suppressed_events, events.len());
    }

    #[test]
    fn test_units_require_address() {
        let args = ["seesaw-cli", "--capture", "cap.jsonl", "--config", "c.toml", "--units", "F"];
        assert!(Args::try_parse_from(args).is_err());

        let args = Args::try_parse_from(["seesaw-cli", "-c", "cap.jsonl", "-a", "0x49", "-u", "F"]).unwrap();
        assert_eq!(args.units.as_deref(), Some("F"));
    }

    #[test]
    fn test_analyze_rejects_bad_device() {
        let devices = vec![device("0x49", None), device("", None)];
        assert!(analyze(&devices, &[]).is_err());
    }
}
