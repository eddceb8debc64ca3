//! Summary document builder
//!
//! Emits the end-of-day summary as a `Document`. Section order is fixed:
//! totals, tips, covers/orders, categories, dishes, payment types, taxes,
//! discounts, extras, VAT.

use std::collections::BTreeMap;

use shared::ReceiptConfig;
use shared::money::{format_money, format_rate};

use super::bill_document::{emit_letterhead, emit_vat_line};
use super::document::{Align, Cell, Document, DocumentBuilder, Style};
use super::summary::{QtyTotal, SummaryReport};

const FINAL_FEED: u32 = 4;

/// Emit a qty/total table section with a bold heading
fn emit_qty_table(
    b: &mut DocumentBuilder,
    heading: &str,
    entries: &BTreeMap<String, QtyTotal>,
    money: &impl Fn(f64) -> String,
) {
    if entries.is_empty() {
        return;
    }
    b.style(Style::Bold);
    b.text(heading.to_string());
    b.style(Style::Normal);
    b.table_row(vec![
        Cell::new("Name", Align::Left, 0.5),
        Cell::new("Qty", Align::Right, 0.2),
        Cell::new("Total", Align::Right, 0.3),
    ]);
    for (name, entry) in entries {
        b.table_row(vec![
            Cell::new(name.clone(), Align::Left, 0.5),
            Cell::new(format_rate(entry.quantity), Align::Right, 0.2),
            Cell::new(money(entry.total), Align::Right, 0.3),
        ]);
    }
    b.rule();
}

/// Emit a label/amount section with a bold heading
fn emit_amount_rows(
    b: &mut DocumentBuilder,
    heading: &str,
    entries: &BTreeMap<String, f64>,
    money: &impl Fn(f64) -> String,
) {
    if entries.is_empty() {
        return;
    }
    b.style(Style::Bold);
    b.text(heading.to_string());
    b.style(Style::Normal);
    for (name, amount) in entries {
        b.row(name.clone(), money(*amount));
    }
    b.rule();
}

/// Build the document for a summary report
pub fn build_summary_document(report: &SummaryReport, config: &ReceiptConfig) -> Document {
    let money = |amount: f64| format_money(&config.currency_symbol, amount);
    let mut b = DocumentBuilder::new();

    // -- Header --
    emit_letterhead(&mut b, config);

    b.align(Align::Center).style(Style::Bold);
    b.text("SUMMARY REPORT");
    b.style(Style::Normal);
    b.text(report.date.clone());
    b.align(Align::Left);
    b.rule();

    // -- Totals --
    b.row("Gross sales", money(report.g_sales));
    b.row("Refunds", money(report.refunds));
    b.row("Discounts", money(report.discounts));
    b.row("Gross", money(report.gross));
    b.row("Exclusive", money(report.exclusive));
    b.row("Taxes", money(report.taxes));
    b.row("Service charges", money(report.service_charges));
    b.row("Total extras", money(report.total_extras));
    b.row("Amount due", money(report.amount_due));
    b.row("Amount collected", money(report.amount_collected));
    b.row("Rounding", money(report.rounding));
    b.style(Style::Bold);
    b.row("Net", money(report.net));
    b.style(Style::Normal);
    b.row("Voids", money(report.voids));
    b.rule();

    // -- Tips --
    b.row("Tips", money(report.tips));

    // -- Covers / Orders --
    b.row("Covers", format_rate(report.covers));
    b.row("Orders", report.orders_count.to_string());
    b.row("Average cover", money(report.average_cover));
    b.row("Average order", money(report.average_order));
    b.rule();

    // -- Breakdowns, fixed order --
    emit_qty_table(&mut b, "Categories", &report.categories, &money);
    emit_qty_table(&mut b, "Dishes", &report.dishes, &money);
    emit_amount_rows(&mut b, "Payment types", &report.payment_types, &money);
    emit_amount_rows(&mut b, "Taxes", &report.taxes_list, &money);
    emit_amount_rows(&mut b, "Discounts", &report.discounts_list, &money);
    emit_amount_rows(&mut b, "Extras", &report.extras, &money);

    emit_vat_line(&mut b, config);

    b.feed(config.bottom_margin + FINAL_FEED);
    b.cut();

    b.build()
}
