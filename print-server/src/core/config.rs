//! Server configuration
//!
//! All settings can be overridden through environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | PRINT_PORT | 3132 | HTTP listen port |
//! | PAPER_WIDTH | 48 | Default paper width in characters (58mm=32, 80mm=48) |
//! | CONNECT_TIMEOUT_MS | 5000 | Network printer connect timeout |
//! | LOG_LEVEL | info | Log filter when RUST_LOG is unset |
//! | LOG_DIR | (none) | Directory for daily-rolling log files |

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API listen port
    pub print_port: u16,
    /// Default paper width in characters
    pub paper_width: usize,
    /// Network printer connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Log level when RUST_LOG is not set
    pub log_level: String,
    /// Optional log file directory
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// anything unset
    pub fn from_env() -> Self {
        Self {
            print_port: std::env::var("PRINT_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3132),
            paper_width: std::env::var("PAPER_WIDTH")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(48),
            connect_timeout_ms: std::env::var("CONNECT_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
