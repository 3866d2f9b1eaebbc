//! Enumeration of serial ports present on the host.

use super::error::PortError;
use serialport::{available_ports, SerialPortInfo, SerialPortType};
use std::fmt;

/// A port the system reports, with USB identification when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSummary {
    pub name: String,
    pub kind: &'static str,
    pub usb_id: Option<(u16, u16)>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortSummary {
    fn from(info: SerialPortInfo) -> Self {
        match info.port_type {
            SerialPortType::UsbPort(usb) => Self {
                name: info.port_name,
                kind: "USB",
                usb_id: Some((usb.vid, usb.pid)),
                manufacturer: usb.manufacturer,
                product: usb.product,
            },
            other => Self {
                name: info.port_name,
                kind: match other {
                    SerialPortType::PciPort => "PCI",
                    SerialPortType::BluetoothPort => "Bluetooth",
                    _ => "Unknown",
                },
                usb_id: None,
                manufacturer: None,
                product: None,
            },
        }
    }
}

impl fmt::Display for PortSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)?;
        if let Some((vid, pid)) = self.usb_id {
            write!(f, " {vid:04x}:{pid:04x}")?;
        }
        match (&self.manufacturer, &self.product) {
            (Some(m), Some(p)) => write!(f, " {m} {p}"),
            (Some(m), None) => write!(f, " {m}"),
            (None, Some(p)) => write!(f, " {p}"),
            (None, None) => Ok(()),
        }
    }
}

/// List the serial ports currently present.
pub fn list_ports() -> Result<Vec<PortSummary>, PortError> {
    Ok(available_ports()?.into_iter().map(PortSummary::from).collect())
}
