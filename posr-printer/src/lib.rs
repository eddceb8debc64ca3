//! # posr-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS command building
//! - CP1252 encoding for western receipt printers
//! - The `Device` open/write/close capability and its transports
//!   (network TCP 9100, serial, USB)
//! - Driver resolution via `DriverRegistry`
//! - Image/logo processing
//!
//! Business logic (WHAT to print) stays in the print server: receipt and
//! summary documents are composed there and arrive here as bytes.
//!
//! ## Example
//!
//! ```ignore
//! use posr_printer::{DeviceFactory, DriverConfig, DriverRegistry, EscPosBuilder};
//!
//! // Build ESC/POS content
//! let mut builder = EscPosBuilder::new(48);
//! builder.center();
//! builder.double_size();
//! builder.line("Final Bill");
//! builder.reset_size();
//! builder.sep_double();
//! builder.left();
//! builder.line_lr("Total", "$548.56");
//! builder.cut_feed(4);
//!
//! // Resolve and drive a device
//! let registry = DriverRegistry::new();
//! let mut device = registry.create(&config)?;
//! device.open().await?;
//! device.write(&builder.build()).await?;
//! device.close().await?;
//! ```

mod device;
mod encoding;
mod error;
mod escpos;
mod registry;

// Re-exports
pub use device::{Device, NetworkDevice};
pub use encoding::{center_width, compose_lr, convert_to_cp1252, display_width, pad_width, truncate_width};
pub use error::{PrintError, PrintResult};
pub use escpos::{EscPosBuilder, EscposOptions};
pub use registry::{DeviceFactory, DriverConfig, DriverRegistry};

#[cfg(feature = "image")]
pub use escpos::raster_image;

#[cfg(unix)]
pub use device::SerialDevice;

#[cfg(target_os = "linux")]
pub use device::UsbDevice;
