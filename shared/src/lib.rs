//! Shared types for the posr print server
//!
//! Renderer-agnostic values used across crates: the external order input
//! model, the receipt display configuration, and numeric coercion rules.

pub mod models;
pub mod money;
pub mod receipt_config;

// Re-exports
pub use models::order::{Order, OrderItem, Payment, Extra};
pub use money::{format_money, safe_div, safe_number};
pub use receipt_config::{PartialReceiptConfig, ReceiptConfig};
