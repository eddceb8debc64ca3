//! Device adapters for sending ESC/POS data
//!
//! Every hardware transport implements the same open/write/close
//! capability; callers depend only on the [`Device`] trait.
//!
//! Supported transports:
//! - Network printers (TCP port 9100)
//! - Serial printers (unix character device)
//! - USB printers (linux usblp device node)

use crate::error::{PrintError, PrintResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument};

/// Capability contract for one physical printer connection
///
/// `open` and `close` bracket a print job; `write` may be called any
/// number of times in between. Implementations report failures through
/// [`PrintError`], never by panicking.
#[async_trait]
pub trait Device: Send + std::fmt::Debug {
    /// Open the underlying transport
    async fn open(&mut self) -> PrintResult<()>;

    /// Send raw ESC/POS data to the printer
    async fn write(&mut self, data: &[u8]) -> PrintResult<()>;

    /// Close the underlying transport
    async fn close(&mut self) -> PrintResult<()>;
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug)]
pub struct NetworkDevice {
    host: String,
    port: u16,
    timeout: Duration,
    stream: Option<TcpStream>,
}

impl NetworkDevice {
    /// Create a new network device; the connection is made in `open`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: Duration::from_secs(5),
            stream: None,
        }
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[async_trait]
impl Device for NetworkDevice {
    #[instrument(skip(self), fields(addr = %self.target()))]
    async fn open(&mut self) -> PrintResult<()> {
        let target = self.target();
        info!("connecting to printer");

        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(&target))
            .await
            .map_err(|_| PrintError::Timeout(format!("connection timeout: {}", target)))?
            .map_err(|e| PrintError::Connection(format!("{}: {}", target, e)))?;

        self.stream = Some(stream);
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        let stream = self.stream.as_mut().ok_or(PrintError::NotOpen)?;
        stream.write_all(data).await?;
        stream.flush().await?;
        info!(bytes = data.len(), "print data sent");
        Ok(())
    }

    async fn close(&mut self) -> PrintResult<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await?;
        }
        Ok(())
    }
}

/// Serial printer (pre-configured character device)
///
/// The port is opened as a character device for writing; line settings
/// (baud rate, data bits, parity) are expected to be configured at the
/// OS level for the port. The configured values are logged so a mismatch
/// is visible in traces.
#[cfg(unix)]
#[derive(Debug)]
pub struct SerialDevice {
    path: String,
    file: Option<tokio::fs::File>,
}

#[cfg(unix)]
impl SerialDevice {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }
}

#[cfg(unix)]
#[async_trait]
impl Device for SerialDevice {
    #[instrument(skip(self), fields(path = %self.path))]
    async fn open(&mut self) -> PrintResult<()> {
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(&self.path)
            .await
            .map_err(|e| PrintError::Connection(format!("{}: {}", self.path, e)))?;
        self.file = Some(file);
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        let file = self.file.as_mut().ok_or(PrintError::NotOpen)?;
        file.write_all(data).await?;
        file.flush().await?;
        info!(bytes = data.len(), "print data sent");
        Ok(())
    }

    async fn close(&mut self) -> PrintResult<()> {
        self.file.take();
        Ok(())
    }
}

/// USB printer (linux usblp class device)
///
/// Resolves the `/dev/usb/lpN` node at open time, by scanning sysfs for
/// a matching vendor/product id when one is given, otherwise taking the
/// first usblp node present.
#[cfg(target_os = "linux")]
#[derive(Debug)]
pub struct UsbDevice {
    vid: Option<u16>,
    pid: Option<u16>,
    file: Option<tokio::fs::File>,
}

#[cfg(target_os = "linux")]
impl UsbDevice {
    pub fn new(vid: Option<u16>, pid: Option<u16>) -> Self {
        Self {
            vid,
            pid,
            file: None,
        }
    }

    /// Find the device node for this printer via /sys/class/usbmisc
    fn resolve_node(&self) -> PrintResult<std::path::PathBuf> {
        let class_dir = std::path::Path::new("/sys/class/usbmisc");
        let entries = std::fs::read_dir(class_dir)
            .map_err(|e| PrintError::Connection(format!("usblp scan failed: {}", e)))?;

        let mut fallback = None;
        for entry in entries.flatten() {
            let name = entry.file_name();
            let name = name.to_string_lossy().into_owned();
            if !name.starts_with("lp") {
                continue;
            }
            let node = std::path::PathBuf::from("/dev/usb").join(&name);
            if fallback.is_none() {
                fallback = Some(node.clone());
            }

            if self.vid.is_none() && self.pid.is_none() {
                return Ok(node);
            }

            // usbmisc/lpN/device is the interface dir; ids live one level up
            let dev_dir = entry.path().join("device").join("..");
            let read_id = |file: &str| -> Option<u16> {
                let raw = std::fs::read_to_string(dev_dir.join(file)).ok()?;
                u16::from_str_radix(raw.trim(), 16).ok()
            };

            let vid_ok = self.vid.is_none_or(|v| read_id("idVendor") == Some(v));
            let pid_ok = self.pid.is_none_or(|p| read_id("idProduct") == Some(p));
            if vid_ok && pid_ok {
                return Ok(node);
            }
        }

        match (self.vid, self.pid) {
            (None, None) => fallback.ok_or_else(|| {
                PrintError::Connection("no usblp device present".to_string())
            }),
            (vid, pid) => Err(PrintError::Connection(format!(
                "no usblp device matching vid={:04x?} pid={:04x?}",
                vid, pid
            ))),
        }
    }
}

#[cfg(target_os = "linux")]
#[async_trait]
impl Device for UsbDevice {
    #[instrument(skip(self))]
    async fn open(&mut self) -> PrintResult<()> {
        let node = self.resolve_node()?;
        info!(node = %node.display(), "opening usblp node");
        let file = tokio::fs::OpenOptions::new()
            .write(true)
            .open(&node)
            .await
            .map_err(|e| PrintError::Connection(format!("{}: {}", node.display(), e)))?;
        self.file = Some(file);
        Ok(())
    }

    async fn write(&mut self, data: &[u8]) -> PrintResult<()> {
        let file = self.file.as_mut().ok_or(PrintError::NotOpen)?;
        file.write_all(data).await?;
        file.flush().await?;
        info!(bytes = data.len(), "print data sent");
        Ok(())
    }

    async fn close(&mut self) -> PrintResult<()> {
        self.file.take();
        Ok(())
    }
}
