//! Bill document builder
//!
//! Emits the renderer-agnostic `Document` for one bill. Every row has an
//! explicit guard; the emitted op sequence is fully determined by the
//! bill, the config, and the variant options.

use posr_printer::truncate_width;
use shared::ReceiptConfig;
use shared::money::{format_money, format_rate};

use super::bill::Bill;
use super::document::{Align, Cell, Document, DocumentBuilder, Style, decode_logo};

const ADDRESS_MAX: usize = 40;
const NOTES_MAX: usize = 48;
const ITEM_NAME_MAX: usize = 28;
const FINAL_FEED: u32 = 4;

/// Which optional blocks a receipt variant includes
#[derive(Debug, Clone, Copy, Default)]
pub struct BillOptions {
    pub show_payments: bool,
    pub show_change: bool,
    pub with_delivery: bool,
}

impl BillOptions {
    pub fn temp() -> Self {
        Self::default()
    }

    pub fn final_bill() -> Self {
        Self {
            show_payments: true,
            show_change: true,
            with_delivery: false,
        }
    }

    pub fn delivery() -> Self {
        Self {
            show_payments: true,
            show_change: true,
            with_delivery: true,
        }
    }

    pub fn refund() -> Self {
        Self {
            show_payments: true,
            show_change: false,
            with_delivery: false,
        }
    }
}

/// Emit the header shared by bill and summary documents: top margin,
/// logo, company name.
pub(super) fn emit_letterhead(b: &mut DocumentBuilder, config: &ReceiptConfig) {
    b.feed(config.top_margin);

    if let Some(logo) = config.logo.as_deref()
        && let Some((bytes, mime)) = decode_logo(logo)
    {
        b.image(bytes, mime);
    }

    if config.show_company_name && !config.company_name.is_empty() {
        b.align(Align::Center).style(Style::Bold);
        b.text(config.company_name.clone());
        b.style(Style::Normal);
    }
}

/// Emit the trailing VAT line when configured
pub(super) fn emit_vat_line(b: &mut DocumentBuilder, config: &ReceiptConfig) {
    if config.show_vat_number
        && let Some(vat) = config.vat_number.as_deref()
    {
        b.row(config.vat_name.clone(), vat.to_string());
    }
}

/// Build the document for one bill
pub fn build_bill_document(bill: &Bill, config: &ReceiptConfig, opts: &BillOptions) -> Document {
    let money = |amount: f64| format_money(&config.currency_symbol, amount);
    let mut b = DocumentBuilder::new();

    // -- Header --
    emit_letterhead(&mut b, config);

    b.align(Align::Center).style(Style::Bold);
    b.text(bill.title.clone());
    b.style(Style::Normal).align(Align::Left);

    b.row(format!("Invoice# {}", bill.order_id), bill.date.clone());
    b.row(bill.table.clone(), bill.user_name.clone());

    if let Some(address) = bill.address.as_deref() {
        b.text(truncate_width(address, ADDRESS_MAX));
    }
    if let Some(phone) = bill.phone.as_deref() {
        b.text(phone.to_string());
    }
    b.rule();

    // -- Items --
    for item in &bill.items {
        let name = if config.show_item_name {
            truncate_width(&item.name, ITEM_NAME_MAX)
        } else {
            String::new()
        };
        let qty = format_rate(item.qty);

        if config.show_item_total {
            b.table_row(vec![
                Cell::new(name, Align::Left, 0.45),
                Cell::new(
                    if config.show_item_quantity { qty } else { String::new() },
                    Align::Right,
                    0.15,
                ),
                Cell::new(
                    if config.show_item_price {
                        money(item.price)
                    } else {
                        String::new()
                    },
                    Align::Right,
                    0.2,
                ),
                Cell::new(money(item.total), Align::Right, 0.2),
            ]);
        } else {
            let left = match (config.show_item_name, config.show_item_quantity) {
                (true, true) => format!("{} x{}", name, qty),
                (true, false) => name,
                (false, true) => format!("x{}", qty),
                (false, false) => String::new(),
            };
            let right = if config.show_item_price {
                money(item.total)
            } else {
                String::new()
            };
            b.row_ratio(left, right, 0.65);
        }
    }
    b.rule();

    // -- Summary --
    b.row(
        format!("Items ({})", bill.items_count),
        money(bill.items_total),
    );
    if bill.tax != 0.0 {
        b.row(bill.tax_label.clone(), money(bill.tax));
    }
    if bill.discount && bill.discount_amount != 0.0 {
        b.row("Discount", money(bill.discount_amount));
    }
    if let Some(label) = bill.service_charge_label.as_deref()
        && bill.service_charge_amount != 0.0
    {
        b.row(label.to_string(), money(bill.service_charge_amount));
    }
    for extra in &bill.extras {
        b.row(extra.name.clone(), money(extra.value));
    }
    if bill.tip_amount != 0.0 {
        b.row(bill.tip_label.clone(), money(bill.tip_amount));
    }
    if opts.with_delivery && bill.delivery_charges != 0.0 {
        b.row("Delivery charges", money(bill.delivery_charges));
    }
    b.rule();

    // -- Total --
    b.style(Style::Bold);
    b.row("Total", money(bill.total));
    b.style(Style::Normal);

    // -- Payments --
    if opts.show_payments && !bill.payments.is_empty() {
        b.rule();
        for payment in &bill.payments {
            b.row(payment.method.clone(), money(payment.amount));
        }
    }

    // -- Change --
    if opts.show_change {
        b.rule();
        b.style(Style::Bold);
        b.row("Change", money(bill.change));
        b.style(Style::Normal);
    }

    emit_vat_line(&mut b, config);

    if let Some(notes) = bill.notes.as_deref() {
        b.text(truncate_width(notes, NOTES_MAX));
    }
    if let Some(thank_you) = bill.thank_you.as_deref() {
        b.align(Align::Center);
        b.text(thank_you.to_string());
        b.align(Align::Left);
    }

    b.feed(config.bottom_margin + FINAL_FEED);
    b.cut();

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::bill::map_order_to_final;
    use crate::receipt::document::RenderOp;
    use serde_json::json;
    use shared::Order;

    fn order_with_tax(tax_amount: f64) -> Order {
        serde_json::from_value(json!({
            "invoice_number": "1042",
            "items": [
                {"name": "Chicken Karahi", "price": 234, "quantity": 1},
                {"name": "Mutton Karahi", "price": 234, "quantity": 1}
            ],
            "tax": {"name": "GST", "rate": 17},
            "tax_amount": tax_amount,
            "payments": [{"amount": 500}],
            "created_at": 1722960000000i64
        }))
        .unwrap()
    }

    fn doc_for(tax_amount: f64) -> Document {
        let bill = map_order_to_final(&order_with_tax(tax_amount), false);
        build_bill_document(&bill, &ReceiptConfig::default(), &BillOptions::final_bill())
    }

    #[test]
    fn test_tax_row_omitted_when_zero() {
        let without = doc_for(0.0);
        let with = doc_for(79.56);

        let is_tax_row = |op: &RenderOp| {
            matches!(op, RenderOp::Row { left, .. } if left.starts_with("GST"))
        };
        assert_eq!(without.count_ops(is_tax_row), 0);
        assert_eq!(with.count_ops(is_tax_row), 1);
    }

    #[test]
    fn test_tax_change_adds_exactly_one_op() {
        let without = doc_for(0.0);
        let with = doc_for(79.56);
        assert_eq!(with.ops().len(), without.ops().len() + 1);

        // Every op except the inserted tax row (and the totals it feeds)
        // is unchanged in content and order.
        let diff: Vec<_> = with
            .ops()
            .iter()
            .filter(|&op| !without.ops().contains(op))
            .collect();
        for op in diff {
            match op {
                RenderOp::Row { left, .. } => {
                    assert!(left.starts_with("GST") || left == "Total" || left == "Change")
                }
                other => panic!("unexpected differing op: {:?}", other),
            }
        }
    }

    #[test]
    fn test_payments_block_guard() {
        let bill = map_order_to_final(&order_with_tax(0.0), false);

        let with = build_bill_document(&bill, &ReceiptConfig::default(), &BillOptions::final_bill());
        let without = build_bill_document(&bill, &ReceiptConfig::default(), &BillOptions::temp());

        let is_payment_row = |op: &RenderOp| {
            matches!(op, RenderOp::Row { left, .. } if left == "Payment")
        };
        assert_eq!(with.count_ops(is_payment_row), 1);
        assert_eq!(without.count_ops(is_payment_row), 0);
    }

    #[test]
    fn test_document_ends_with_feed_and_cut() {
        let doc = doc_for(79.56);
        let ops = doc.ops();
        assert!(matches!(ops[ops.len() - 2], RenderOp::Feed(_)));
        assert!(matches!(ops[ops.len() - 1], RenderOp::Cut));
    }

    #[test]
    fn test_item_name_truncated_to_28() {
        let order: Order = serde_json::from_value(json!({
            "items": [{"name": "An exceptionally long dish name that keeps going",
                       "price": 10, "quantity": 1}]
        }))
        .unwrap();
        let bill = map_order_to_final(&order, false);
        let doc = build_bill_document(&bill, &ReceiptConfig::default(), &BillOptions::final_bill());

        let found = doc.ops().iter().any(|op| {
            matches!(op, RenderOp::Row { left, .. }
                if left.starts_with("An exceptionally long dish n x1"))
        });
        assert!(found, "item row should carry the 28-char truncated name");
    }

    #[test]
    fn test_show_item_total_switches_to_table_rows() {
        let cfg = ReceiptConfig::normalize(
            &serde_json::from_value(json!({"showItemTotal": true})).unwrap(),
        );
        let bill = map_order_to_final(&order_with_tax(0.0), false);
        let doc = build_bill_document(&bill, &cfg, &BillOptions::final_bill());
        assert_eq!(
            doc.count_ops(|op| matches!(op, RenderOp::TableRow { .. })),
            bill.items.len()
        );
    }

    #[test]
    fn test_vat_line_guard() {
        let bill = map_order_to_final(&order_with_tax(0.0), false);

        let cfg = ReceiptConfig::normalize(
            &serde_json::from_value(json!({"showVatNumber": true, "vatNumber": "123456-7"}))
                .unwrap(),
        );
        let doc = build_bill_document(&bill, &cfg, &BillOptions::final_bill());
        assert_eq!(
            doc.count_ops(|op| matches!(op, RenderOp::Row { right, .. } if right == "123456-7")),
            1
        );

        // number configured but flag off -> no line
        let cfg = ReceiptConfig::normalize(
            &serde_json::from_value(json!({"vatNumber": "123456-7"})).unwrap(),
        );
        let doc = build_bill_document(&bill, &cfg, &BillOptions::final_bill());
        assert_eq!(
            doc.count_ops(|op| matches!(op, RenderOp::Row { right, .. } if right == "123456-7")),
            0
        );
    }
}
