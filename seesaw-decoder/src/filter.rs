//! Address-scoped event filter
//!
//! Isolates the events that belong to one device. The address of the most
//! recent address phase is remembered, and every event is forwarded only
//! while that address equals the configured target.

use crate::types::BusEvent;

/// Forwards bus events belonging to a single target address
#[derive(Debug, Clone)]
pub struct AddressFilter {
    target_address: u8,
    tracked_address: Option<u8>,
    is_read: bool,
}

impl AddressFilter {
    pub fn new(target_address: u8) -> Self {
        Self {
            target_address,
            tracked_address: None,
            is_read: false,
        }
    }

    /// Pass an event through the filter
    ///
    /// Returns the event unchanged if it belongs to the target device,
    /// `None` otherwise. Start/stop events are scoped by the address that
    /// was most recently seen, like every other event.
    pub fn decode<'e>(&mut self, event: &'e BusEvent) -> Option<&'e BusEvent> {
        if let BusEvent::AddressPhase { address, is_read, .. } = event {
            self.is_read = *is_read;
            self.tracked_address = Some(*address);
        }

        if self.tracked_address == Some(self.target_address) {
            log::trace!("Forwarding {} event", event.type_name());
            Some(event)
        } else {
            None
        }
    }

    pub fn target_address(&self) -> u8 {
        self.target_address
    }

    /// Address of the most recent address phase, if any has been seen
    pub fn tracked_address(&self) -> Option<u8> {
        self.tracked_address
    }

    /// Direction of the current transaction
    pub fn is_read(&self) -> bool {
        self.is_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(address: u8, is_read: bool) -> BusEvent {
        BusEvent::AddressPhase { address, is_read, start_ns: 0, end_ns: 1 }
    }

    fn data(byte: u8) -> BusEvent {
        BusEvent::DataPhase { byte, start_ns: 1, end_ns: 2 }
    }

    #[test]
    fn test_suppresses_until_first_address() {
        let mut filter = AddressFilter::new(0x49);
        assert!(filter.decode(&BusEvent::Start { start_ns: 0, end_ns: 0 }).is_none());
        assert!(filter.decode(&data(0x01)).is_none());
        assert_eq!(filter.tracked_address(), None);
    }

    #[test]
    fn test_forwards_target_traffic() {
        let mut filter = AddressFilter::new(0x49);
        let addr = address(0x49, false);
        assert_eq!(filter.decode(&addr), Some(&addr));
        assert!(!filter.is_read());

        let byte = data(0x0F);
        assert_eq!(filter.decode(&byte), Some(&byte));

        let stop = BusEvent::Stop { start_ns: 3, end_ns: 3 };
        assert_eq!(filter.decode(&stop), Some(&stop));
    }

    #[test]
    fn test_suppresses_other_devices_including_framing() {
        let mut filter = AddressFilter::new(0x49);
        filter.decode(&address(0x49, false));

        assert!(filter.decode(&address(0x36, true)).is_none());
        assert!(filter.is_read());
        assert_eq!(filter.tracked_address(), Some(0x36));
        assert!(filter.decode(&data(0xAA)).is_none());
        assert!(filter.decode(&BusEvent::Stop { start_ns: 0, end_ns: 0 }).is_none());
        assert!(filter.decode(&BusEvent::Start { start_ns: 0, end_ns: 0 }).is_none());

        // Target traffic resumes on its next address phase
        assert!(filter.decode(&address(0x49, true)).is_some());
        assert!(filter.decode(&data(0x01)).is_some());
    }
}
