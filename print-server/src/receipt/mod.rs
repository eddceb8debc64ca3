//! Receipt composition
//!
//! Orders come in, renderer-agnostic documents come out:
//! `Order(s) + ReceiptConfig -> Bill | SummaryReport -> Document`.

pub mod bill;
pub mod bill_document;
pub mod document;
pub mod kitchen_document;
pub mod summary;
pub mod summary_document;

use serde::Deserialize;

use shared::{Order, ReceiptConfig};

pub use bill::{Bill, BillItem, ExtraLine, KitchenTicket, PaymentLine};
pub use bill_document::{BillOptions, build_bill_document};
pub use document::{Align, Cell, Document, DocumentBuilder, RenderOp, Size, Style};
pub use kitchen_document::build_kitchen_document;
pub use summary::{QtyTotal, SummaryReport, compute_summary};
pub use summary_document::build_summary_document;

/// The five receipt variants plus the batch summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintType {
    Temp,
    Final,
    Delivery,
    Refund,
    Kitchen,
    Summary,
}

impl PrintType {
    /// Parse the wire `printType` string; None for anything unknown
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "temp" | "presale" => Some(Self::Temp),
            "final" => Some(Self::Final),
            "delivery" => Some(Self::Delivery),
            "refund" => Some(Self::Refund),
            "kitchen" => Some(Self::Kitchen),
            "summary" => Some(Self::Summary),
            _ => None,
        }
    }
}

/// Print payload as posted under `data`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintData {
    pub print_type: Option<String>,
    pub order: Option<Order>,
    pub orders: Option<Vec<Order>>,
    pub original_order: Option<Order>,
    pub duplicate: bool,
    /// Display label for summary reports; defaults to the current date
    pub date: Option<String>,
}

/// Errors from document construction
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("unknown print type: {0}")]
    UnknownPrintType(String),

    #[error("missing order data: {0}")]
    MissingOrderData(&'static str),
}

/// Select the builder for the payload's print type and build the document
///
/// The document is built once per request; the dispatcher fans it out
/// across every resolved device.
pub fn build_document(data: &PrintData, config: &ReceiptConfig) -> Result<Document, BuildError> {
    let raw_type = data.print_type.as_deref().unwrap_or("");
    let print_type = PrintType::parse(raw_type).ok_or_else(|| {
        BuildError::UnknownPrintType(if raw_type.is_empty() {
            "(missing)".to_string()
        } else {
            raw_type.to_string()
        })
    })?;

    let order = || data.order.as_ref().ok_or(BuildError::MissingOrderData("order"));

    let document = match print_type {
        PrintType::Temp => {
            let bill = bill::map_order_to_temp(order()?);
            build_bill_document(&bill, config, &BillOptions::temp())
        }
        PrintType::Final => {
            let bill = bill::map_order_to_final(order()?, data.duplicate);
            build_bill_document(&bill, config, &BillOptions::final_bill())
        }
        PrintType::Delivery => {
            let bill = bill::map_order_to_delivery(order()?);
            build_bill_document(&bill, config, &BillOptions::delivery())
        }
        PrintType::Refund => {
            let bill = bill::map_order_to_refund(order()?, data.original_order.as_ref());
            build_bill_document(&bill, config, &BillOptions::refund())
        }
        PrintType::Kitchen => {
            let ticket = bill::map_order_to_kitchen(order()?);
            build_kitchen_document(&ticket, config)
        }
        PrintType::Summary => {
            let orders = data
                .orders
                .as_ref()
                .ok_or(BuildError::MissingOrderData("orders"))?;
            let date = data
                .date
                .clone()
                .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            let report = compute_summary(orders, &date);
            build_summary_document(&report, config)
        }
    };

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_print_type_parsing() {
        assert_eq!(PrintType::parse("final"), Some(PrintType::Final));
        assert_eq!(PrintType::parse("presale"), Some(PrintType::Temp));
        assert_eq!(PrintType::parse("receipt"), None);
    }

    #[test]
    fn test_build_document_unknown_type() {
        let data: PrintData =
            serde_json::from_value(json!({"printType": "poster"})).unwrap();
        let err = build_document(&data, &ReceiptConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::UnknownPrintType(t) if t == "poster"));
    }

    #[test]
    fn test_build_document_missing_order() {
        let data: PrintData =
            serde_json::from_value(json!({"printType": "final"})).unwrap();
        let err = build_document(&data, &ReceiptConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::MissingOrderData("order")));

        let data: PrintData =
            serde_json::from_value(json!({"printType": "summary"})).unwrap();
        let err = build_document(&data, &ReceiptConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::MissingOrderData("orders")));
    }

    #[test]
    fn test_build_document_happy_paths() {
        let order = json!({
            "invoice_number": "7",
            "items": [{"name": "Chai", "price": 30, "quantity": 2}],
            "created_at": 1722960000000i64
        });

        for print_type in ["temp", "final", "delivery", "refund", "kitchen"] {
            let data: PrintData =
                serde_json::from_value(json!({"printType": print_type, "order": order}))
                    .unwrap();
            let doc = build_document(&data, &ReceiptConfig::default())
                .unwrap_or_else(|e| panic!("{print_type}: {e}"));
            assert!(!doc.ops().is_empty());
        }

        let data: PrintData = serde_json::from_value(
            json!({"printType": "summary", "orders": [order], "date": "2026-08-07"}),
        )
        .unwrap();
        assert!(build_document(&data, &ReceiptConfig::default()).is_ok());
    }
}
