//! Summary aggregation
//!
//! Reduces a list of orders plus a date label into the end-of-day
//! `SummaryReport`. Every figure goes through `safe_number`; breakdown
//! maps are BTreeMaps keyed by display label so both renderers emit the
//! same bytes on every run.

use std::collections::BTreeMap;

use serde::Serialize;

use shared::Order;
use shared::money::{format_rate, safe_div, safe_number};

/// Quantity/total pair for category and dish breakdowns
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct QtyTotal {
    pub quantity: f64,
    pub total: f64,
}

/// Aggregated end-of-day figures over a set of orders
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryReport {
    pub date: String,

    pub exclusive: f64,
    pub g_sales: f64,
    pub gross: f64,
    pub refunds: f64,
    pub service_charges: f64,
    pub discounts: f64,
    pub taxes: f64,
    pub net: f64,
    pub amount_due: f64,
    pub amount_collected: f64,
    pub total_extras: f64,
    pub rounding: f64,
    pub voids: f64,
    pub tips: f64,
    pub covers: f64,
    pub orders_count: usize,
    pub average_cover: f64,
    pub average_order: f64,

    pub discounts_list: BTreeMap<String, f64>,
    pub taxes_list: BTreeMap<String, f64>,
    pub payment_types: BTreeMap<String, f64>,
    pub extras: BTreeMap<String, f64>,
    pub categories: BTreeMap<String, QtyTotal>,
    pub dishes: BTreeMap<String, QtyTotal>,
}

/// Compute the summary report for a batch of orders
pub fn compute_summary(orders: &[Order], date: &str) -> SummaryReport {
    let mut report = SummaryReport {
        date: date.to_string(),
        orders_count: orders.len(),
        ..Default::default()
    };

    for order in orders {
        let mut item_discounts = 0.0;

        for item in &order.items {
            let line_total = item.line_total();

            if item.is_voided() {
                report.voids += line_total;
                continue;
            }

            report.exclusive += line_total;
            item_discounts += safe_number(item.discount);

            if let Some(label) = item.category_label() {
                let entry = report.categories.entry(label).or_default();
                entry.quantity += safe_number(item.quantity);
                entry.total += line_total;
            }
            if let Some(label) = item.dish_label() {
                let entry = report.dishes.entry(label).or_default();
                entry.quantity += safe_number(item.quantity);
                entry.total += line_total;
            }
        }

        // Order-level discount beyond what the items already carry
        let subtotal_discount = (safe_number(order.discount_amount) - item_discounts).max(0.0);
        report.discounts += item_discounts + subtotal_discount;

        report.taxes += safe_number(order.tax_amount);
        report.service_charges += safe_number(order.service_charge_amount);
        report.tips += safe_number(order.tip_amount);
        report.covers += safe_number(order.covers);

        for extra in &order.extras {
            let value = safe_number(extra.value);
            report.total_extras += value;
            if let Some(name) = extra.name.clone().filter(|n| !n.is_empty()) {
                *report.extras.entry(name).or_default() += value;
            }
        }

        let cancelled = order.status.as_deref() == Some("Cancelled");
        for payment in &order.payments {
            let amount = safe_number(payment.amount);
            report.amount_collected += amount;

            // Cancelled orders count every negative payment as a refund;
            // on other orders only the negative amounts themselves do.
            if cancelled {
                report.refunds += amount.min(0.0).abs();
            } else if amount < 0.0 {
                report.refunds += amount.abs();
            }

            *report.payment_types.entry(payment.method()).or_default() +=
                safe_number(payment.collected());
        }

        if let Some(discount) = &order.discount
            && let Some(name) = discount.name.clone().filter(|n| !n.is_empty())
        {
            *report.discounts_list.entry(name).or_default() +=
                safe_number(order.discount_amount);
        }

        if let Some(tax) = &order.tax {
            let name = tax.name.as_deref().unwrap_or("Tax");
            let key = match tax.rate {
                Some(rate) => format!("{} {}", name, format_rate(rate)),
                None => name.to_string(),
            };
            *report.taxes_list.entry(key).or_default() += safe_number(order.tax_amount);
        }
    }

    report.exclusive = safe_number(report.exclusive);
    report.amount_due = safe_number(
        report.exclusive + report.taxes + report.service_charges + report.total_extras
            - report.discounts,
    );
    report.rounding = safe_number(report.amount_collected - report.amount_due);
    report.net = safe_number(report.amount_collected - report.service_charges - report.taxes);
    report.gross = safe_number(report.amount_collected + report.refunds + report.discounts);
    report.g_sales = safe_number(report.amount_due + report.discounts);
    report.average_cover = safe_div(report.amount_due, report.covers);
    report.average_order = safe_div(report.amount_due, report.orders_count as f64);

    report
}
