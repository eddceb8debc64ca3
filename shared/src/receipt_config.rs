//! Receipt display configuration
//!
//! The back office stores a sparse, partially-typed display configuration;
//! [`ReceiptConfig::normalize`] resolves it into a fully-defaulted value.
//! Normalization never fails: unknown fields are ignored, invalid numerics
//! fall back to their defaults, and margins clamp to nonnegative integers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::serde_helpers::coerce_f64;

/// Fully-resolved display configuration (immutable per request)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptConfig {
    pub bottom_margin: u32,
    pub top_margin: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub company_name: String,
    /// Logo as base64 or data-URI; decoded at document build time
    pub logo: Option<String>,
    pub show_company_name: bool,
    pub show_item_name: bool,
    pub show_item_price: bool,
    pub show_item_quantity: bool,
    pub show_item_total: bool,
    pub show_vat_number: bool,
    pub vat_name: String,
    pub vat_number: Option<String>,
    pub currency_symbol: String,
}

/// Sparse configuration as it arrives over the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialReceiptConfig {
    pub bottom_margin: Option<Value>,
    pub top_margin: Option<Value>,
    pub left_margin: Option<Value>,
    pub right_margin: Option<Value>,
    pub company_name: Option<String>,
    pub logo: Option<String>,
    pub show_company_name: Option<bool>,
    pub show_item_name: Option<bool>,
    pub show_item_price: Option<bool>,
    pub show_item_quantity: Option<bool>,
    pub show_item_total: Option<bool>,
    pub show_vat_number: Option<bool>,
    pub vat_name: Option<String>,
    pub vat_number: Option<String>,
    pub currency_symbol: Option<String>,
}

/// Clamp a loosely-typed numeric option to a nonnegative integer
fn clamp_margin(value: Option<&Value>, default: u32) -> u32 {
    match value {
        None | Some(Value::Null) => default,
        Some(v) => {
            let n = coerce_f64(v);
            if n.is_finite() && n > 0.0 {
                n.trunc() as u32
            } else {
                0
            }
        }
    }
}

impl ReceiptConfig {
    /// Resolve a sparse configuration into a fully-defaulted one
    pub fn normalize(partial: &PartialReceiptConfig) -> Self {
        Self {
            bottom_margin: clamp_margin(partial.bottom_margin.as_ref(), 0),
            top_margin: clamp_margin(partial.top_margin.as_ref(), 0),
            left_margin: clamp_margin(partial.left_margin.as_ref(), 0),
            right_margin: clamp_margin(partial.right_margin.as_ref(), 0),
            company_name: partial.company_name.clone().unwrap_or_default(),
            logo: partial.logo.clone().filter(|l| !l.is_empty()),
            show_company_name: partial.show_company_name.unwrap_or(false),
            show_item_name: partial.show_item_name.unwrap_or(true),
            show_item_price: partial.show_item_price.unwrap_or(true),
            show_item_quantity: partial.show_item_quantity.unwrap_or(true),
            show_item_total: partial.show_item_total.unwrap_or(false),
            show_vat_number: partial.show_vat_number.unwrap_or(false),
            vat_name: partial
                .vat_name
                .clone()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "VAT Number".to_string()),
            vat_number: partial.vat_number.clone().filter(|v| !v.is_empty()),
            currency_symbol: partial
                .currency_symbol
                .clone()
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| "$".to_string()),
        }
    }
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self::normalize(&PartialReceiptConfig::default())
    }
}
