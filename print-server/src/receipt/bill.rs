//! Bill mapping
//!
//! Converts one order into the canonical, renderer-agnostic `Bill` value.
//! One mapper per receipt variant; all of them are pure functions of the
//! order. Figures go through `safe_number` so a malformed order degrades
//! to zeros instead of NaN.

use serde::Serialize;

use shared::money::{format_rate, safe_number};
use shared::{Order, OrderItem};

/// One line of a bill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillItem {
    pub name: String,
    pub qty: f64,
    pub price: f64,
    pub total: f64,
    pub notes: Option<String>,
}

/// One payment line of a bill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentLine {
    pub method: String,
    pub amount: f64,
}

/// An extra charge line of a bill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtraLine {
    pub name: String,
    pub value: f64,
}

/// Canonical representation of a single receipt's content
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bill {
    pub order_id: String,
    pub table: String,
    pub date: String,
    pub user_name: String,
    pub items: Vec<BillItem>,
    pub items_count: usize,
    pub items_total: f64,
    pub discount: bool,
    pub discount_amount: f64,
    pub tax: f64,
    pub tax_label: String,
    pub service_charge_label: Option<String>,
    pub service_charge_amount: f64,
    pub extras: Vec<ExtraLine>,
    pub tip_amount: f64,
    pub tip_label: String,
    pub delivery_charges: f64,
    pub total: f64,
    pub payments: Vec<PaymentLine>,
    pub change: f64,
    pub title: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub thank_you: Option<String>,
}

/// Kitchen ticket shape (no prices)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KitchenTicket {
    pub order_id: String,
    pub table: String,
    pub items: Vec<BillItem>,
    pub created_at: String,
    pub priority: Option<String>,
}

/// Order totals, computed over the filtered items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub items_total: f64,
    pub discount_amount: f64,
    pub extras_total: f64,
    pub tax: f64,
    pub service: f64,
    pub tip: f64,
    pub delivery_charges: f64,
    pub total: f64,
    pub total_with_delivery: f64,
}

fn to_bill_item(item: &OrderItem) -> BillItem {
    BillItem {
        name: item.name.clone().unwrap_or_default(),
        qty: safe_number(item.quantity),
        price: safe_number(item.price),
        total: item.line_total(),
        notes: item.notes.clone(),
    }
}

/// Items that appear on sale receipts: soft-deleted, refunded, and
/// suspended lines are dropped
pub fn order_items(order: &Order) -> Vec<BillItem> {
    order
        .items
        .iter()
        .filter(|i| !i.is_voided())
        .map(to_bill_item)
        .collect()
}

/// Refund receipts bypass the filter entirely: a refund order already
/// contains only the lines selected for refund
pub fn refund_order_items(order: &Order) -> Vec<BillItem> {
    order.items.iter().map(to_bill_item).collect()
}

/// Invoice number, suffixed `/split` for split orders
pub fn order_id(order: &Order) -> String {
    let invoice = order.invoice_number.clone().unwrap_or_default();
    match order.split.as_deref() {
        Some(split) if !split.is_empty() => format!("{}/split", invoice),
        _ => invoice,
    }
}

/// Table name and number concatenated without separator
pub fn order_table(order: &Order) -> String {
    match &order.table {
        Some(table) => format!(
            "{}{}",
            table.name.as_deref().unwrap_or(""),
            table.number.as_deref().unwrap_or("")
        ),
        None => String::new(),
    }
}

/// Tax display label: `"{name} {rate}%"` when a rate is present
pub fn order_tax_label(order: &Order) -> String {
    match &order.tax {
        Some(tax) => {
            let name = tax.name.as_deref().unwrap_or("Tax");
            match tax.rate {
                Some(rate) => format!("{} {}%", name, format_rate(rate)),
                None => name.to_string(),
            }
        }
        None => "Tax".to_string(),
    }
}

/// Service charge label, emitted only when a service charge is set
pub fn order_service_charge_label(order: &Order) -> Option<String> {
    let charge = safe_number(order.service_charge);
    if charge <= 0.0 {
        return None;
    }
    let is_percent = matches!(
        order.service_charge_type.as_deref(),
        Some("Percent") | Some("%")
    );
    if is_percent {
        Some(format!("Service charges ({}%)", format_rate(charge)))
    } else {
        Some(format!("Service charges ({})", format_rate(charge)))
    }
}

/// Display name of the user who took the order
pub fn order_user_name(order: &Order) -> String {
    let Some(user) = &order.user else {
        return String::new();
    };

    let full = format!(
        "{} {}",
        user.first_name.as_deref().unwrap_or(""),
        user.last_name.as_deref().unwrap_or("")
    );
    let full = full.trim();
    if !full.is_empty() {
        return full.to_string();
    }

    user.name
        .clone()
        .or_else(|| user.login.clone())
        .unwrap_or_default()
}

/// Payments mapped to display lines, plus the change against a total
pub fn order_payment_summary(order: &Order, total: f64) -> (Vec<PaymentLine>, f64) {
    let payments: Vec<PaymentLine> = order
        .payments
        .iter()
        .map(|p| PaymentLine {
            method: p.method(),
            amount: safe_number(p.amount),
        })
        .collect();

    let paid: f64 = payments.iter().map(|p| p.amount).sum();
    let change = safe_number(paid - total);
    (payments, change)
}

/// Totals over the filtered items plus order-level adjustments
pub fn order_totals(order: &Order) -> OrderTotals {
    let items_total: f64 = order
        .items
        .iter()
        .filter(|i| !i.is_voided())
        .map(|i| i.line_total())
        .sum();
    let items_total = safe_number(items_total);

    let discount_amount = safe_number(order.discount_amount);
    let extras_total = safe_number(order.extras.iter().map(|e| safe_number(e.value)).sum());
    let tax = safe_number(order.tax_amount);
    let service = safe_number(order.service_charge_amount);
    let tip = safe_number(order.tip_amount);

    let delivery_charges = if order.delivery_charges != 0.0 {
        safe_number(order.delivery_charges)
    } else {
        order
            .delivery
            .as_ref()
            .and_then(|d| d.delivery_charges.or(d.charges))
            .map(safe_number)
            .unwrap_or(0.0)
    };

    let total = safe_number(items_total + extras_total - discount_amount + tax + service + tip);

    OrderTotals {
        items_total,
        discount_amount,
        extras_total,
        tax,
        service,
        tip,
        delivery_charges,
        total,
        total_with_delivery: safe_number(total + delivery_charges),
    }
}

fn order_date(order: &Order) -> String {
    order
        .created_at
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d %H:%M").to_string())
}

fn extra_lines(order: &Order) -> Vec<ExtraLine> {
    order
        .extras
        .iter()
        .map(|e| ExtraLine {
            name: e.name.clone().unwrap_or_else(|| "Extra".to_string()),
            value: safe_number(e.value),
        })
        .collect()
}

fn base_bill(order: &Order, title: &str) -> Bill {
    let items = order_items(order);
    let totals = order_totals(order);
    Bill {
        order_id: order_id(order),
        table: order_table(order),
        date: order_date(order),
        user_name: order_user_name(order),
        items_count: items.len(),
        items,
        items_total: totals.items_total,
        discount: totals.discount_amount != 0.0,
        discount_amount: totals.discount_amount,
        tax: totals.tax,
        tax_label: order_tax_label(order),
        service_charge_label: order_service_charge_label(order),
        service_charge_amount: totals.service,
        extras: extra_lines(order),
        tip_amount: totals.tip,
        tip_label: "Tip".to_string(),
        delivery_charges: totals.delivery_charges,
        total: totals.total,
        payments: Vec::new(),
        change: 0.0,
        title: title.to_string(),
        address: None,
        phone: None,
        notes: order.notes.clone(),
        thank_you: None,
    }
}

/// Pre-sale ("temp") bill: no payments, no change
pub fn map_order_to_temp(order: &Order) -> Bill {
    base_bill(order, "Pre-Sale Bill")
}

/// Final bill, optionally marked as a duplicate print
pub fn map_order_to_final(order: &Order, duplicate: bool) -> Bill {
    let title = if duplicate {
        "Duplicate Final Bill"
    } else {
        "Final Bill"
    };
    let mut bill = base_bill(order, title);
    let (payments, change) = order_payment_summary(order, bill.total);
    bill.payments = payments;
    bill.change = change;
    bill.thank_you = Some("Thank you for your visit!".to_string());
    bill
}

/// Delivery bill: delivery charges folded into the total, destination
/// details populated from the delivery record or the customer
pub fn map_order_to_delivery(order: &Order) -> Bill {
    let mut bill = base_bill(order, "DELIVERY");
    let totals = order_totals(order);
    bill.total = totals.total_with_delivery;

    let (payments, change) = order_payment_summary(order, bill.total);
    bill.payments = payments;
    bill.change = change;

    bill.address = order
        .delivery
        .as_ref()
        .and_then(|d| d.address.clone())
        .or_else(|| order.customer.as_ref().and_then(|c| c.address.clone()));
    bill.phone = order
        .delivery
        .as_ref()
        .and_then(|d| d.phone.clone())
        .or_else(|| order.customer.as_ref().and_then(|c| c.phone.clone()));
    bill.notes = order
        .delivery
        .as_ref()
        .and_then(|d| d.notes.clone())
        .or_else(|| order.notes.clone());
    bill
}

/// Kitchen ticket: order reference, table, items, priority; no money
pub fn map_order_to_kitchen(order: &Order) -> KitchenTicket {
    let priority = order
        .table
        .as_ref()
        .and_then(|t| t.priority.clone())
        .or_else(|| order.tags.first().cloned())
        .filter(|p| !p.is_empty());

    KitchenTicket {
        order_id: order_id(order),
        table: order_table(order),
        items: order_items(order),
        created_at: order_date(order),
        priority,
    }
}

/// Refund bill
///
/// Items are taken unfiltered from the refund order. The total adds the
/// discount amount instead of subtracting it: refund orders store the
/// discount as an already-negated adjustment, so the sign convention
/// differs from the sale path on purpose.
pub fn map_order_to_refund(refund_order: &Order, original_order: Option<&Order>) -> Bill {
    let items = refund_order_items(refund_order);
    let items_total: f64 = safe_number(items.iter().map(|i| i.total).sum());

    let discount_amount = safe_number(refund_order.discount_amount);
    let extras_total = safe_number(
        refund_order
            .extras
            .iter()
            .map(|e| safe_number(e.value))
            .sum(),
    );
    let tax = safe_number(refund_order.tax_amount);
    let service = safe_number(refund_order.service_charge_amount);
    let tip = safe_number(refund_order.tip_amount);

    let total = safe_number(items_total + tax + service + tip + extras_total + discount_amount);

    let source = |f: fn(&Order) -> String| -> String {
        let v = f(refund_order);
        if !v.is_empty() {
            return v;
        }
        original_order.map(f).unwrap_or_default()
    };

    let (payments, _) = order_payment_summary(refund_order, total);

    Bill {
        order_id: source(order_id),
        table: source(order_table),
        date: order_date(refund_order),
        user_name: source(order_user_name),
        items_count: items.len(),
        items,
        items_total,
        discount: discount_amount != 0.0,
        discount_amount,
        tax,
        tax_label: order_tax_label(refund_order),
        service_charge_label: order_service_charge_label(refund_order),
        service_charge_amount: service,
        extras: extra_lines(refund_order),
        tip_amount: tip,
        tip_label: "Tip".to_string(),
        delivery_charges: 0.0,
        total,
        payments,
        change: 0.0,
        title: "REFUND".to_string(),
        address: None,
        phone: None,
        notes: refund_order.notes.clone(),
        thank_you: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Two 234-rupee mains, GST, a service charge, and a delivery fee
    /// paid to the rupee; exercises every term of the total formula
    fn fixture_order() -> Order {
        serde_json::from_value(json!({
            "invoice_number": "1042",
            "table": {"name": "Table ", "number": "7"},
            "user": {"first_name": "Ayesha", "last_name": "Khan"},
            "items": [
                {"name": "Chicken Karahi", "price": 234, "quantity": 1},
                {"name": "Mutton Karahi", "price": 234, "quantity": 1}
            ],
            "tax": {"name": "GST", "rate": 17},
            "tax_amount": 79.56,
            "service_charge": 1,
            "service_charge_amount": 1,
            "delivery": {"delivery_charges": 149, "address": "House 12, Street 4", "phone": "0300-1234567"},
            "payments": [{"amount": 697.56, "payment_type": {"name": "Cash"}}],
            "created_at": 1722960000000i64
        }))
        .unwrap()
    }

    #[test]
    fn test_total_invariant_final_bill() {
        let bill = map_order_to_final(&fixture_order(), false);
        assert_eq!(bill.items_total, 468.0);
        assert_eq!(bill.total, 468.0 + 79.56 + 1.0);
        assert!((bill.change - 149.0).abs() < 1e-9);
        assert_eq!(bill.title, "Final Bill");
        assert!(bill.thank_you.is_some());
    }

    #[test]
    fn test_delivery_total_folds_delivery_charges() {
        let bill = map_order_to_delivery(&fixture_order());
        assert!((bill.total - 697.56).abs() < 1e-9);
        assert!((bill.change - 0.0).abs() < 1e-9);
        assert_eq!(bill.address.as_deref(), Some("House 12, Street 4"));
        assert_eq!(bill.title, "DELIVERY");
    }

    #[test]
    fn test_temp_bill_has_no_payments() {
        let bill = map_order_to_temp(&fixture_order());
        assert_eq!(bill.title, "Pre-Sale Bill");
        assert!(bill.payments.is_empty());
        assert_eq!(bill.change, 0.0);
        assert!(bill.thank_you.is_none());
    }

    #[test]
    fn test_duplicate_final_title() {
        let bill = map_order_to_final(&fixture_order(), true);
        assert_eq!(bill.title, "Duplicate Final Bill");
    }

    #[test]
    fn test_item_filtering_vs_refund() {
        let order: Order = serde_json::from_value(json!({
            "items": [
                {"name": "Kept", "price": 10, "quantity": 1},
                {"name": "Deleted", "price": 10, "quantity": 1, "deleted_at": "2026-08-01"},
                {"name": "Refunded", "price": 10, "quantity": 1, "is_refunded": true},
                {"name": "Suspended", "price": 10, "quantity": 1, "is_suspended": true}
            ]
        }))
        .unwrap();

        let filtered = order_items(&order);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Kept");

        let unfiltered = refund_order_items(&order);
        assert_eq!(unfiltered.len(), 4);
    }

    #[test]
    fn test_refund_total_adds_discount() {
        let refund: Order = serde_json::from_value(json!({
            "items": [{"name": "Returned", "price": 100, "quantity": 2, "is_refunded": true}],
            "tax_amount": 34,
            "discount_amount": -20
        }))
        .unwrap();

        let bill = map_order_to_refund(&refund, None);
        // 200 + 34 + (-20): the discount is additive on the refund path
        assert_eq!(bill.items_total, 200.0);
        assert_eq!(bill.total, 214.0);
        assert_eq!(bill.title, "REFUND");
    }

    #[test]
    fn test_refund_falls_back_to_original_order() {
        let refund: Order =
            serde_json::from_value(json!({"items": [], "discount_amount": 0})).unwrap();
        let original = fixture_order();
        let bill = map_order_to_refund(&refund, Some(&original));
        assert_eq!(bill.order_id, "1042");
        assert_eq!(bill.table, "Table 7");
    }

    #[test]
    fn test_order_id_split_suffix() {
        let order: Order =
            serde_json::from_value(json!({"invoice_number": "55", "split": "B"})).unwrap();
        assert_eq!(order_id(&order), "55/split");

        let order: Order =
            serde_json::from_value(json!({"invoice_number": "55", "split": ""})).unwrap();
        assert_eq!(order_id(&order), "55");
    }

    #[test]
    fn test_order_table_concatenation() {
        assert_eq!(order_table(&fixture_order()), "Table 7");
        assert_eq!(order_table(&Order::default()), "");
    }

    #[test]
    fn test_tax_label() {
        assert_eq!(order_tax_label(&fixture_order()), "GST 17%");

        let no_rate: Order =
            serde_json::from_value(json!({"tax": {"name": "Sales Tax"}})).unwrap();
        assert_eq!(order_tax_label(&no_rate), "Sales Tax");

        assert_eq!(order_tax_label(&Order::default()), "Tax");
    }

    #[test]
    fn test_service_charge_label() {
        let percent: Order = serde_json::from_value(
            json!({"service_charge": 10, "service_charge_type": "Percent"}),
        )
        .unwrap();
        assert_eq!(
            order_service_charge_label(&percent).as_deref(),
            Some("Service charges (10%)")
        );

        let flat: Order = serde_json::from_value(json!({"service_charge": 50})).unwrap();
        assert_eq!(
            order_service_charge_label(&flat).as_deref(),
            Some("Service charges (50)")
        );

        assert!(order_service_charge_label(&Order::default()).is_none());
    }

    #[test]
    fn test_user_name_fallbacks() {
        assert_eq!(order_user_name(&fixture_order()), "Ayesha Khan");

        let only_first: Order =
            serde_json::from_value(json!({"user": {"first_name": "Ali"}})).unwrap();
        assert_eq!(order_user_name(&only_first), "Ali");

        let login_only: Order =
            serde_json::from_value(json!({"user": {"login": "cashier01"}})).unwrap();
        assert_eq!(order_user_name(&login_only), "cashier01");

        assert_eq!(order_user_name(&Order::default()), "");
    }

    #[test]
    fn test_payment_method_fallbacks() {
        let order: Order = serde_json::from_value(json!({
            "payments": [
                {"amount": 10, "payment_type": {"name": "Card"}},
                {"amount": 20, "payment_type": {"title": "Voucher"}},
                {"amount": 30}
            ]
        }))
        .unwrap();
        let (payments, change) = order_payment_summary(&order, 50.0);
        assert_eq!(payments[0].method, "Card");
        assert_eq!(payments[1].method, "Voucher");
        assert_eq!(payments[2].method, "Payment");
        assert_eq!(change, 10.0);
    }

    #[test]
    fn test_kitchen_priority_resolution() {
        let with_table: Order = serde_json::from_value(json!({
            "table": {"name": "T", "number": "1", "priority": "RUSH"},
            "tags": ["vip"]
        }))
        .unwrap();
        assert_eq!(
            map_order_to_kitchen(&with_table).priority.as_deref(),
            Some("RUSH")
        );

        let with_tags: Order =
            serde_json::from_value(json!({"tags": ["expedite"]})).unwrap();
        assert_eq!(
            map_order_to_kitchen(&with_tags).priority.as_deref(),
            Some("expedite")
        );

        assert!(map_order_to_kitchen(&Order::default()).priority.is_none());
    }

    #[test]
    fn test_totals_delivery_charge_fallback_chain() {
        let direct: Order =
            serde_json::from_value(json!({"delivery_charges": 99})).unwrap();
        assert_eq!(order_totals(&direct).delivery_charges, 99.0);

        let nested: Order =
            serde_json::from_value(json!({"delivery": {"charges": 45}})).unwrap();
        assert_eq!(order_totals(&nested).delivery_charges, 45.0);

        assert_eq!(order_totals(&Order::default()).delivery_charges, 0.0);
    }
}
