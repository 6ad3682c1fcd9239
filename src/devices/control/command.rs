use serde::{Deserialize, Serialize};
use std::fmt;

/// Peripherals on the locator board that accept control commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlDevice {
    Led,
    Buzzer,
}

impl ControlDevice {
    /// Wire spelling, exactly as the firmware expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlDevice::Led => "LED",
            ControlDevice::Buzzer => "Buzzer",
        }
    }

    /// Exact, case-sensitive match against the HTTP field value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LED" => Some(ControlDevice::Led),
            "Buzzer" => Some(ControlDevice::Buzzer),
            _ => None,
        }
    }
}

impl fmt::Display for ControlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlAction {
    On,
    Off,
}

impl ControlAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlAction::On => "on",
            ControlAction::Off => "off",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "on" => Some(ControlAction::On),
            "off" => Some(ControlAction::Off),
            _ => None,
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated device/action pair ready for the outbound port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlCommand {
    pub device: ControlDevice,
    pub action: ControlAction,
}

impl ControlCommand {
    pub fn new(device: ControlDevice, action: ControlAction) -> Self {
        Self { device, action }
    }

    /// The newline-terminated wire form, `<DEVICE>_<ACTION>\n` with the
    /// action upper-cased: `LED_ON\n`, `Buzzer_OFF\n`.
    pub fn to_line(&self) -> String {
        format!("{}_{}\n", self.device.as_str(), self.action.as_str().to_uppercase())
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.device.as_str(), self.action.as_str().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_form_for_all_pairs() {
        let cases = [
            (ControlDevice::Led, ControlAction::On, "LED_ON\n"),
            (ControlDevice::Led, ControlAction::Off, "LED_OFF\n"),
            (ControlDevice::Buzzer, ControlAction::On, "Buzzer_ON\n"),
            (ControlDevice::Buzzer, ControlAction::Off, "Buzzer_OFF\n"),
        ];

        for (device, action, expected) in cases {
            assert_eq!(ControlCommand::new(device, action).to_line(), expected);
        }
    }

    #[test]
    fn test_device_parse_is_exact() {
        assert_eq!(ControlDevice::parse("LED"), Some(ControlDevice::Led));
        assert_eq!(ControlDevice::parse("Buzzer"), Some(ControlDevice::Buzzer));
        assert_eq!(ControlDevice::parse("led"), None);
        assert_eq!(ControlDevice::parse("Fan"), None);
    }

    #[test]
    fn test_action_parse_is_exact() {
        assert_eq!(ControlAction::parse("on"), Some(ControlAction::On));
        assert_eq!(ControlAction::parse("off"), Some(ControlAction::Off));
        assert_eq!(ControlAction::parse("ON"), None);
        assert_eq!(ControlAction::parse("toggle"), None);
    }
}
