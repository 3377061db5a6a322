//! Static register tables of the Seesaw peripheral
//!
//! A register access addresses a base group with its first byte and a
//! register (action) within that group with its second byte. The tables are
//! fixed at compile time; nothing is discovered from the bus.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse peripheral sub-block selected by the first addressing byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseGroup {
    Status,
    Gpio,
    Sercom0,
    Timer,
    Adc,
    Dac,
    Interrupt,
    Dap,
    Eeprom,
    Neopixel,
    Touch,
    Keypad,
    Encoder,
}

impl BaseGroup {
    /// Register name as printed in the peripheral documentation
    pub fn name(&self) -> &'static str {
        match self {
            BaseGroup::Status => "STATUS_BASE",
            BaseGroup::Gpio => "GPIO_BASE",
            BaseGroup::Sercom0 => "SERCOM0_BASE",
            BaseGroup::Timer => "TIMER_BASE",
            BaseGroup::Adc => "ADC_BASE",
            BaseGroup::Dac => "DAC_BASE",
            BaseGroup::Interrupt => "INTERRUPT_BASE",
            BaseGroup::Dap => "DAP_BASE",
            BaseGroup::Eeprom => "EEPROM_BASE",
            BaseGroup::Neopixel => "NEOPIXEL_BASE",
            BaseGroup::Touch => "TOUCH_BASE",
            BaseGroup::Keypad => "KEYPAD_BASE",
            BaseGroup::Encoder => "ENCODER_BASE",
        }
    }

    /// Actions known within this group, keyed by the second addressing byte
    pub fn actions(&self) -> &'static [(u8, Action)] {
        match self {
            BaseGroup::Touch => TOUCH_ACTIONS,
            BaseGroup::Status => STATUS_ACTIONS,
            _ => &[],
        }
    }
}

impl fmt::Display for BaseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named register within a base group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Temperature,
    Capacitive,
    #[serde(rename = "HW_ID")]
    HwId,
    #[serde(rename = "VERSION")]
    Version,
    #[serde(rename = "OPTIONS")]
    Options,
    #[serde(rename = "SWRST")]
    SwReset,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Temperature => "Temperature",
            Action::Capacitive => "Capacitive",
            Action::HwId => "HW_ID",
            Action::Version => "VERSION",
            Action::Options => "OPTIONS",
            Action::SwReset => "SWRST",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const BASE_GROUPS: &[(u8, BaseGroup)] = &[
    (0x00, BaseGroup::Status),
    (0x01, BaseGroup::Gpio),
    (0x02, BaseGroup::Sercom0),
    (0x08, BaseGroup::Timer),
    (0x09, BaseGroup::Adc),
    (0x0A, BaseGroup::Dac),
    (0x0B, BaseGroup::Interrupt),
    (0x0C, BaseGroup::Dap),
    (0x0D, BaseGroup::Eeprom),
    (0x0E, BaseGroup::Neopixel),
    (0x0F, BaseGroup::Touch),
    (0x10, BaseGroup::Keypad),
    (0x11, BaseGroup::Encoder),
];

const TOUCH_ACTIONS: &[(u8, Action)] = &[(0x10, Action::Capacitive)];

const STATUS_ACTIONS: &[(u8, Action)] = &[
    (0x01, Action::HwId),
    (0x02, Action::Version),
    (0x03, Action::Options),
    (0x04, Action::Temperature),
    (0x7F, Action::SwReset),
];

/// Actions whose read values get a custom rendering
const FORMATTED_ACTIONS: &[Action] = &[Action::Temperature];

/// Two-level lookup: base group byte, then action byte within the group
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterTable;

impl RegisterTable {
    pub fn new() -> Self {
        Self
    }

    /// Look up the base group selected by a first addressing byte
    pub fn base_group(&self, byte: u8) -> Option<BaseGroup> {
        BASE_GROUPS
            .iter()
            .find(|(code, _)| *code == byte)
            .map(|(_, group)| *group)
    }

    /// Look up the action selected by a second addressing byte
    pub fn action(&self, group: BaseGroup, byte: u8) -> Option<Action> {
        group
            .actions()
            .iter()
            .find(|(code, _)| *code == byte)
            .map(|(_, action)| *action)
    }

    /// True if read values of this action need custom formatting
    pub fn is_formatted(&self, action: Action) -> bool {
        FORMATTED_ACTIONS.contains(&action)
    }

    /// Get table statistics
    pub fn stats(&self) -> TableStats {
        TableStats {
            num_groups: BASE_GROUPS.len(),
            num_actions: BASE_GROUPS.iter().map(|(_, g)| g.actions().len()).sum(),
        }
    }
}

/// Register table statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    pub num_groups: usize,
    pub num_actions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_group_lookup() {
        let table = RegisterTable::new();
        assert_eq!(table.base_group(0x00), Some(BaseGroup::Status));
        assert_eq!(table.base_group(0x0F), Some(BaseGroup::Touch));
        assert_eq!(table.base_group(0x11), Some(BaseGroup::Encoder));
        assert_eq!(table.base_group(0x03), None);
        assert_eq!(table.base_group(0xFF), None);
    }

    #[test]
    fn test_action_lookup() {
        let table = RegisterTable::new();
        assert_eq!(table.action(BaseGroup::Touch, 0x10), Some(Action::Capacitive));
        assert_eq!(table.action(BaseGroup::Status, 0x04), Some(Action::Temperature));
        assert_eq!(table.action(BaseGroup::Status, 0x7F), Some(Action::SwReset));
        assert_eq!(table.action(BaseGroup::Status, 0x10), None);
        // Groups without an action table never resolve
        assert_eq!(table.action(BaseGroup::Gpio, 0x04), None);
    }

    #[test]
    fn test_formatted_actions() {
        let table = RegisterTable::new();
        assert!(table.is_formatted(Action::Temperature));
        assert!(!table.is_formatted(Action::Capacitive));
        assert!(!table.is_formatted(Action::HwId));
    }

    #[test]
    fn test_names() {
        assert_eq!(BaseGroup::Touch.to_string(), "TOUCH_BASE");
        assert_eq!(Action::HwId.to_string(), "HW_ID");
        assert_eq!(Action::SwReset.to_string(), "SWRST");
    }

    #[test]
    fn test_stats() {
        let stats = RegisterTable::new().stats();
        assert_eq!(stats.num_groups, 13);
        assert_eq!(stats.num_actions, 6);
    }
}
