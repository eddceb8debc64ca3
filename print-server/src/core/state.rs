//! Application state
//!
//! Per-process wiring: the driver registry and the dispatcher built on
//! top of it. Everything request-scoped (config, bills, documents) is
//! created per request and dropped with the response.

use std::sync::Arc;
use std::time::Duration;

use posr_printer::{DeviceFactory, DriverRegistry};

use crate::core::Config;
use crate::dispatch::PrinterDispatcher;

/// Shared application state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<PrinterDispatcher>,
}

impl AppState {
    /// Build the production state from configuration
    pub fn initialize(config: &Config) -> Self {
        let registry = DriverRegistry::new()
            .with_connect_timeout(Duration::from_millis(config.connect_timeout_ms));
        Self::with_factory(config, Arc::new(registry))
    }

    /// Build state with a custom device factory (used by tests)
    pub fn with_factory(config: &Config, factory: Arc<dyn DeviceFactory>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            dispatcher: Arc::new(PrinterDispatcher::new(factory, config.paper_width)),
        }
    }
}
