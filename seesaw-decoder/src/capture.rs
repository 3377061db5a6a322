//! Recorded capture reader
//!
//! A capture is stored as JSON lines, one bus event per line, e.g.
//!
//! ```text
//! {"type":"start","start_ns":0,"end_ns":0}
//! {"type":"address","address":73,"read":false,"start_ns":100,"end_ns":190}
//! {"type":"data","data":15,"start_ns":200,"end_ns":290}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::types::{BusEvent, DecoderError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// Lazily parses bus events from a JSON-lines capture
pub struct CaptureReader<R: BufRead> {
    lines: Lines<R>,
    line_number: usize,
}

impl CaptureReader<BufReader<File>> {
    /// Open a capture file
    pub fn open(path: &Path) -> Result<Self> {
        log::info!("Opening capture: {:?}", path);
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> CaptureReader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
        }
    }
}

impl<R: BufRead> Iterator for CaptureReader<R> {
    type Item = Result<BusEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = self.lines.next()?;
            self.line_number += 1;
            let line = match next {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(serde_json::from_str(trimmed).map_err(|e| {
                DecoderError::CaptureParseError {
                    line: self.line_number,
                    message: e.to_string(),
                }
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_capture() {
        let text = r#"
# register read of TOUCH_BASE/Capacitive
{"type":"start"}
{"type":"address","address":73,"read":false,"start_ns":100,"end_ns":190}
{"type":"data","data":15,"start_ns":200,"end_ns":290}

{"type":"stop","start_ns":300,"end_ns":300}
"#;
        let events: Vec<BusEvent> = CaptureReader::from_reader(Cursor::new(text))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(events[2], BusEvent::DataPhase { byte: 0x0F, start_ns: 200, end_ns: 290 });
    }

    #[test]
    fn test_parse_error_reports_line() {
        let text = "{\"type\":\"start\"}\n{\"type\":\"bogus\"}\n";
        let mut reader = CaptureReader::from_reader(Cursor::new(text));
        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(DecoderError::CaptureParseError { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_unreadable_line_still_counts() {
        let text: &[u8] = b"{\"type\":\"start\"}\n\xFF\xFE\n{\"type\":\"bogus\"}\n";
        let mut reader = CaptureReader::from_reader(Cursor::new(text));
        assert!(reader.next().unwrap().is_ok());
        assert!(matches!(reader.next().unwrap(), Err(DecoderError::IoError(_))));
        match reader.next().unwrap() {
            Err(DecoderError::CaptureParseError { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
