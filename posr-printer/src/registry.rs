//! Driver registry
//!
//! Maps a printer driver config (the `type` string plus transport fields
//! from the request JSON) to a boxed [`Device`]. Absence of a native
//! backend is an explicit [`PrintError::DriverUnavailable`] at resolution
//! time, not a null check at call sites.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::device::{Device, NetworkDevice};
use crate::error::{PrintError, PrintResult};

/// Driver configuration as posted per printer
///
/// One flat shape for all transports; the `type` field selects which
/// other fields are required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriverConfig {
    #[serde(rename = "type")]
    pub kind: Option<String>,

    // network
    pub ip: Option<String>,
    pub port: Option<u16>,

    // serial
    pub path: Option<String>,
    pub baud_rate: Option<u32>,
    pub data_bits: Option<u8>,
    pub stop_bits: Option<u8>,
    pub parity: Option<String>,

    // usb (hex string "0x04b8", decimal string, or number)
    pub vid: Option<Value>,
    pub pid: Option<Value>,

    // bluetooth
    pub address: Option<String>,
    pub channel: Option<u8>,
}

/// Parse a USB vendor/product id from the loose wire formats
fn parse_usb_id(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u16::try_from(v).ok()),
        Value::String(s) => {
            let s = s.trim();
            if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                u16::from_str_radix(hex, 16).ok()
            } else {
                s.parse().ok()
            }
        }
        _ => None,
    }
}

/// Capability provider: resolves a driver config into a device
///
/// The production implementation is [`DriverRegistry`]; tests inject
/// their own factory to exercise dispatch without hardware.
pub trait DeviceFactory: Send + Sync {
    fn create(&self, config: &DriverConfig) -> PrintResult<Box<dyn Device>>;
}

/// Production driver registry
#[derive(Debug, Clone)]
pub struct DriverRegistry {
    connect_timeout: Duration,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Override the network connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    fn create_network(&self, config: &DriverConfig) -> PrintResult<Box<dyn Device>> {
        let ip = config.ip.as_deref().filter(|s| !s.is_empty()).ok_or(
            PrintError::MissingField {
                driver: "network",
                field: "ip",
            },
        )?;
        let port = config.port.unwrap_or(9100);
        debug!(ip, port, "resolved network printer");
        Ok(Box::new(
            NetworkDevice::new(ip, port).with_timeout(self.connect_timeout),
        ))
    }

    fn create_serial(&self, config: &DriverConfig) -> PrintResult<Box<dyn Device>> {
        let path = config.path.as_deref().filter(|s| !s.is_empty()).ok_or(
            PrintError::MissingField {
                driver: "serial",
                field: "path",
            },
        )?;

        #[cfg(unix)]
        {
            debug!(
                path,
                baud_rate = config.baud_rate.unwrap_or(9600),
                data_bits = config.data_bits.unwrap_or(8),
                stop_bits = config.stop_bits.unwrap_or(1),
                parity = config.parity.as_deref().unwrap_or("none"),
                "resolved serial printer"
            );
            Ok(Box::new(crate::device::SerialDevice::new(path)))
        }
        #[cfg(not(unix))]
        {
            let _ = path;
            Err(PrintError::DriverUnavailable(
                "serial transport is only available on unix builds".to_string(),
            ))
        }
    }

    fn create_usb(&self, config: &DriverConfig) -> PrintResult<Box<dyn Device>> {
        let vid = config.vid.as_ref().and_then(parse_usb_id);
        let pid = config.pid.as_ref().and_then(parse_usb_id);

        #[cfg(target_os = "linux")]
        {
            debug!(?vid, ?pid, "resolved usb printer");
            Ok(Box::new(crate::device::UsbDevice::new(vid, pid)))
        }
        #[cfg(not(target_os = "linux"))]
        {
            let _ = (vid, pid);
            Err(PrintError::DriverUnavailable(
                "usb transport is only available on linux builds".to_string(),
            ))
        }
    }

    fn create_bluetooth(&self, config: &DriverConfig) -> PrintResult<Box<dyn Device>> {
        // Validate the config before reporting backend availability so a
        // misconfigured printer is diagnosable on any platform.
        let _address = config.address.as_deref().filter(|s| !s.is_empty()).ok_or(
            PrintError::MissingField {
                driver: "bluetooth",
                field: "address",
            },
        )?;
        let _channel = config.channel.unwrap_or(1);

        Err(PrintError::DriverUnavailable(
            "bluetooth transport requires an RFCOMM backend, none is linked in this build"
                .to_string(),
        ))
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceFactory for DriverRegistry {
    fn create(&self, config: &DriverConfig) -> PrintResult<Box<dyn Device>> {
        let kind = config.kind.as_deref().unwrap_or("");
        match kind {
            "network" => self.create_network(config),
            "serial" => self.create_serial(config),
            "usb" => self.create_usb(config),
            "bluetooth" => self.create_bluetooth(config),
            other => Err(PrintError::UnknownDriver(if other.is_empty() {
                "(missing)".to_string()
            } else {
                other.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(v: Value) -> DriverConfig {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_network_requires_ip() {
        let registry = DriverRegistry::new();
        let err = registry
            .create(&config(json!({"type": "network"})))
            .unwrap_err();
        assert!(matches!(
            err,
            PrintError::MissingField {
                driver: "network",
                field: "ip"
            }
        ));

        assert!(registry
            .create(&config(json!({"type": "network", "ip": "192.168.1.50"})))
            .is_ok());
    }

    #[test]
    fn test_unknown_driver_type() {
        let registry = DriverRegistry::new();
        let err = registry
            .create(&config(json!({"type": "carrier-pigeon"})))
            .unwrap_err();
        assert!(matches!(err, PrintError::UnknownDriver(t) if t == "carrier-pigeon"));

        let err = registry.create(&config(json!({}))).unwrap_err();
        assert!(matches!(err, PrintError::UnknownDriver(t) if t == "(missing)"));
    }

    #[test]
    fn test_bluetooth_validates_then_reports_unavailable() {
        let registry = DriverRegistry::new();

        let err = registry
            .create(&config(json!({"type": "bluetooth"})))
            .unwrap_err();
        assert!(matches!(
            err,
            PrintError::MissingField {
                driver: "bluetooth",
                field: "address"
            }
        ));

        let err = registry
            .create(&config(json!({"type": "bluetooth", "address": "00:11:22:33:44:55"})))
            .unwrap_err();
        assert!(matches!(err, PrintError::DriverUnavailable(_)));
    }

    #[test]
    fn test_serial_requires_path() {
        let registry = DriverRegistry::new();
        let err = registry
            .create(&config(json!({"type": "serial"})))
            .unwrap_err();
        assert!(matches!(
            err,
            PrintError::MissingField {
                driver: "serial",
                field: "path"
            }
        ));
    }

    #[test]
    fn test_parse_usb_id_formats() {
        assert_eq!(parse_usb_id(&json!("0x04b8")), Some(0x04b8));
        assert_eq!(parse_usb_id(&json!("1208")), Some(1208));
        assert_eq!(parse_usb_id(&json!(1208)), Some(1208));
        assert_eq!(parse_usb_id(&json!("nonsense")), None);
        assert_eq!(parse_usb_id(&json!(null)), None);
    }
}
