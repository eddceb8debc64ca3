//! Kitchen ticket document builder
//!
//! Kitchen tickets carry no money: table in large type, timestamp,
//! priority marker, item lines with notes.

use shared::ReceiptConfig;
use shared::money::format_rate;

use super::bill::KitchenTicket;
use super::document::{Align, Document, DocumentBuilder, Size, Style};

const FINAL_FEED: u32 = 3;

/// Build the document for a kitchen ticket
pub fn build_kitchen_document(ticket: &KitchenTicket, config: &ReceiptConfig) -> Document {
    let mut b = DocumentBuilder::new();

    b.feed(config.top_margin);

    // Table in large type, centered
    b.align(Align::Center).size(Size::Double).style(Style::Bold);
    b.text(if ticket.table.is_empty() {
        "TAKEAWAY".to_string()
    } else {
        ticket.table.clone()
    });
    b.style(Style::Normal).size(Size::Normal);

    b.text(ticket.created_at.clone());
    if !ticket.order_id.is_empty() {
        b.text(format!("Order# {}", ticket.order_id));
    }

    if let Some(priority) = ticket.priority.as_deref() {
        b.style(Style::Bold);
        b.text(format!("*** {} ***", priority));
        b.style(Style::Normal);
    }

    b.align(Align::Left);
    b.rule();

    for item in &ticket.items {
        b.size(Size::DoubleHeight);
        if item.qty > 1.0 {
            b.text(format!("{} x{}", item.name, format_rate(item.qty)));
        } else {
            b.text(item.name.clone());
        }
        b.size(Size::Normal);

        if let Some(notes) = item.notes.as_deref()
            && !notes.is_empty()
        {
            b.style(Style::Bold);
            b.text(format!("   * {}", notes));
            b.style(Style::Normal);
        }
    }

    b.feed(config.bottom_margin + FINAL_FEED);
    b.cut();

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::bill::map_order_to_kitchen;
    use crate::receipt::document::RenderOp;
    use serde_json::json;
    use shared::Order;

    fn ticket() -> KitchenTicket {
        let order: Order = serde_json::from_value(json!({
            "invoice_number": "88",
            "table": {"name": "Table ", "number": "3", "priority": "RUSH"},
            "items": [
                {"name": "Seekh Kebab", "price": 120, "quantity": 2, "notes": "extra spicy"},
                {"name": "Raita", "price": 30, "quantity": 1}
            ],
            "created_at": 1722960000000i64
        }))
        .unwrap();
        map_order_to_kitchen(&order)
    }

    #[test]
    fn test_kitchen_ticket_layout() {
        let doc = build_kitchen_document(&ticket(), &ReceiptConfig::default());

        let texts: Vec<&str> = doc
            .ops()
            .iter()
            .filter_map(|op| match op {
                RenderOp::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();

        assert!(texts.contains(&"Table 3"));
        assert!(texts.contains(&"Order# 88"));
        assert!(texts.contains(&"*** RUSH ***"));
        assert!(texts.contains(&"Seekh Kebab x2"));
        assert!(texts.contains(&"Raita"));
        assert!(texts.contains(&"   * extra spicy"));
    }

    #[test]
    fn test_kitchen_ticket_has_no_money() {
        let doc = build_kitchen_document(&ticket(), &ReceiptConfig::default());
        for op in doc.ops() {
            if let RenderOp::Text(t) = op {
                assert!(!t.contains('$'), "kitchen ticket must not show prices: {t}");
            }
            assert!(!matches!(op, RenderOp::Row { .. }));
        }
    }

    #[test]
    fn test_takeaway_fallback_when_no_table() {
        let order: Order = serde_json::from_value(json!({"items": []})).unwrap();
        let doc = build_kitchen_document(&map_order_to_kitchen(&order), &ReceiptConfig::default());
        assert!(doc
            .ops()
            .iter()
            .any(|op| matches!(op, RenderOp::Text(t) if t == "TAKEAWAY")));
    }
}
