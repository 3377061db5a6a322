//! Transaction decoding state machine
//!
//! Consumes the event stream of one device (already passed through the
//! [`AddressFilter`](crate::filter::AddressFilter)) and reconstructs register
//! accesses. A register read on the Seesaw is a write of two addressing
//! bytes (base group, then action) followed by a read whose bytes form a
//! big-endian value.
//!
//! A transaction is finished, and emitted, when the *next* address phase
//! arrives. Stop conditions do not close anything.

use crate::config::TemperatureUnit;
use crate::registers::{Action, BaseGroup, RegisterTable};
use crate::types::{BusEvent, DisplayKind, RecordValue, TransactionKind, TransactionRecord};
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// Position within the addressing bytes of a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// Next data byte selects the base group
    AwaitingGroupByte,
    /// Next data byte selects the action within the group
    AwaitingActionByte,
    /// Addressing is done; further bytes are payload
    Passthrough,
}

/// Outcome of the base group lookup for the current write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupResolution {
    Unresolved,
    Known(BaseGroup),
    Unknown,
}

/// A transaction that has been opened but not yet finished
#[derive(Debug, Clone)]
struct PendingTransaction {
    start_ns: u64,
    end_ns: u64,
    display_kind: DisplayKind,
    /// Read bytes in bus order, most significant first
    bytes: Vec<u8>,
}

impl PendingTransaction {
    fn open(start_ns: u64, end_ns: u64, display_kind: DisplayKind) -> Self {
        Self {
            start_ns,
            end_ns,
            display_kind,
            bytes: Vec::new(),
        }
    }
}

/// Stateful interpreter of the Seesaw register-addressing convention
#[derive(Debug, Clone)]
pub struct TransactionDecoder {
    table: RegisterTable,
    temperature_unit: TemperatureUnit,
    is_read: bool,
    write_transaction: Option<PendingTransaction>,
    read_transaction: Option<PendingTransaction>,
    /// End of the latest accepted data byte of the current transaction
    last_data_end_ns: Option<u64>,
    write_phase: WritePhase,
    resolved_group: GroupResolution,
    resolved_action: Option<Action>,
}

impl TransactionDecoder {
    pub fn new(temperature_unit: TemperatureUnit) -> Self {
        Self {
            table: RegisterTable::new(),
            temperature_unit,
            is_read: false,
            write_transaction: None,
            read_transaction: None,
            last_data_end_ns: None,
            write_phase: WritePhase::AwaitingGroupByte,
            resolved_group: GroupResolution::Unresolved,
            resolved_action: None,
        }
    }

    /// Feed one event; returns the transaction it finished, if any
    pub fn decode(&mut self, event: &BusEvent) -> Option<TransactionRecord> {
        match *event {
            BusEvent::AddressPhase { is_read, start_ns, end_ns, .. } => {
                self.on_address(is_read, start_ns, end_ns)
            }
            BusEvent::DataPhase { byte, end_ns, .. } => {
                self.on_data(byte, end_ns);
                None
            }
            BusEvent::Start { .. } | BusEvent::Stop { .. } => None,
        }
    }

    /// Finish whatever transaction is still in flight
    ///
    /// Used at the end of a capture, where no further address phase will
    /// arrive to close it.
    pub fn finish(&mut self) -> Option<TransactionRecord> {
        let record = self.close_current();
        self.last_data_end_ns = None;
        record
    }

    pub fn write_phase(&self) -> WritePhase {
        self.write_phase
    }

    pub fn resolved_group(&self) -> GroupResolution {
        self.resolved_group
    }

    pub fn resolved_action(&self) -> Option<Action> {
        self.resolved_action
    }

    fn on_address(&mut self, is_read: bool, start_ns: u64, end_ns: u64) -> Option<TransactionRecord> {
        let display_kind = self.display_kind();
        let had_write = self.write_transaction.is_some();
        let finished = self.close_current();

        self.is_read = is_read;
        self.last_data_end_ns = None;

        if is_read {
            if had_write {
                log::debug!("Opening read transaction ({})", display_kind);
                self.read_transaction = Some(PendingTransaction::open(start_ns, end_ns, display_kind));
            } else {
                log::debug!("Read without addressing write, waiting for next address phase");
            }
            self.write_transaction = None;
        } else {
            log::debug!("Opening write transaction");
            self.write_transaction = Some(PendingTransaction::open(start_ns, end_ns, DisplayKind::Default));
            self.read_transaction = None;
            self.write_phase = WritePhase::AwaitingGroupByte;
            self.resolved_group = GroupResolution::Unresolved;
            self.resolved_action = None;
        }

        finished
    }

    fn on_data(&mut self, byte: u8, end_ns: u64) {
        if self.is_read {
            if let Some(read) = self.read_transaction.as_mut() {
                read.bytes.push(byte);
                log::trace!("Read byte 0x{:02X} ({} so far)", byte, read.bytes.len());
            }
        } else {
            if self.write_transaction.is_none() {
                log::debug!("Data byte 0x{:02X} without open write, dropping", byte);
                return;
            }
            self.resolve_addressing(byte);
        }

        self.last_data_end_ns = Some(end_ns);
    }

    fn resolve_addressing(&mut self, byte: u8) {
        match self.write_phase {
            WritePhase::AwaitingGroupByte => match self.table.base_group(byte) {
                Some(group) => {
                    log::trace!("Base group {}", group);
                    self.resolved_group = GroupResolution::Known(group);
                    self.write_phase = WritePhase::AwaitingActionByte;
                }
                None => {
                    log::debug!("Unknown base group 0x{:02X}", byte);
                    self.resolved_group = GroupResolution::Unknown;
                    self.write_phase = WritePhase::Passthrough;
                }
            },
            WritePhase::AwaitingActionByte => {
                if let GroupResolution::Known(group) = self.resolved_group {
                    self.resolved_action = self.table.action(group, byte);
                    log::trace!("Action {:?} in {}", self.resolved_action, group);
                }
                self.write_phase = WritePhase::Passthrough;
            }
            WritePhase::Passthrough => {}
        }
    }

    /// Template for the read that follows the current addressing write
    fn display_kind(&self) -> DisplayKind {
        match self.resolved_action {
            Some(action) if self.table.is_formatted(action) => DisplayKind::Action(action),
            _ => DisplayKind::Default,
        }
    }

    fn close_current(&mut self) -> Option<TransactionRecord> {
        if let Some(read) = self.read_transaction.take() {
            Some(self.close_read(read))
        } else {
            self.write_transaction.take().map(|write| self.close_write(write))
        }
    }

    fn close_read(&self, read: PendingTransaction) -> TransactionRecord {
        let raw = BigUint::from_bytes_be(&read.bytes);
        let value = match read.display_kind {
            DisplayKind::Action(Action::Temperature) => {
                let celsius = raw.to_f64().unwrap_or(f64::INFINITY) / 65536.0;
                RecordValue::Text(format!("{:.2}", self.temperature_unit.convert(celsius)))
            }
            _ => RecordValue::Integer(raw),
        };
        let record = TransactionRecord {
            kind: TransactionKind::Read,
            display_kind: read.display_kind,
            start_ns: read.start_ns,
            end_ns: self.last_data_end_ns.unwrap_or(read.end_ns),
            value,
        };
        log::debug!("Finished read: {} ({})", record.value, record.display_kind);
        record
    }

    fn close_write(&self, write: PendingTransaction) -> TransactionRecord {
        let label = self
            .resolved_action
            .map(|action| action.name())
            .unwrap_or("default");
        let record = TransactionRecord {
            kind: TransactionKind::Write,
            display_kind: write.display_kind,
            start_ns: write.start_ns,
            end_ns: self.last_data_end_ns.unwrap_or(write.end_ns),
            value: RecordValue::Text(label.to_string()),
        };
        log::debug!("Finished write: {}", label);
        record
    }
}
