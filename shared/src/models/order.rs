//! Order input model
//!
//! Read-only view of the order JSON posted by the back office. Every field
//! is optional or defaulted: the rendering engine never rejects an order
//! for a missing field, it degrades per the `safe_number` contract.

use serde::Deserialize;

use super::serde_helpers::{bool_false, lenient_f64, lenient_opt_f64, lenient_opt_string};

/// Table reference on an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableRef {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub number: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub priority: Option<String>,
}

/// User (waiter/cashier) reference on an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserRef {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub login: Option<String>,
}

/// Tax definition attached to an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaxRef {
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub rate: Option<f64>,
}

/// Discount definition attached to an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscountRef {
    pub name: Option<String>,
}

/// Payment type lookup record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PaymentTypeRef {
    pub name: Option<String>,
    pub title: Option<String>,
}

/// A payment applied to an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Payment {
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    /// Amount actually payable after cash rounding; falls back to `amount`
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub payable: Option<f64>,
    pub payment_type: Option<PaymentTypeRef>,
}

impl Payment {
    /// Display name for the payment method:
    /// `payment_type.name` -> `payment_type.title` -> `"Payment"`
    pub fn method(&self) -> String {
        self.payment_type
            .as_ref()
            .and_then(|pt| pt.name.clone().or_else(|| pt.title.clone()))
            .unwrap_or_else(|| "Payment".to_string())
    }

    /// Collected amount for summary purposes (`payable ?? amount`)
    pub fn collected(&self) -> f64 {
        self.payable.unwrap_or(self.amount)
    }
}

/// An order-level extra charge (packaging, surcharge, ...)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Extra {
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub value: f64,
}

/// Category reference on an item: plain string or `{name}` object.
/// Anything else deserializes to `Other` and yields no label.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    Name(String),
    Object { name: Option<String> },
    Other(serde_json::Value),
}

impl CategoryRef {
    pub fn label(&self) -> Option<&str> {
        match self {
            CategoryRef::Name(s) if !s.is_empty() => Some(s),
            CategoryRef::Object { name: Some(s) } if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Catalog item behind an order line (`item.item` in the source payload)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogItemRef {
    pub name: Option<String>,
    pub categories: Vec<CategoryName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CategoryName {
    pub name: Option<String>,
}

/// Dish reference on an order line (legacy payload shape)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DishRef {
    pub name: Option<String>,
}

/// One line of an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderItem {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub quantity: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub discount: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub service_charges: f64,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub notes: Option<String>,

    // Soft-delete / refund / suspend flags
    #[serde(deserialize_with = "lenient_opt_string")]
    pub deleted_at: Option<String>,
    #[serde(deserialize_with = "bool_false")]
    pub is_refunded: bool,
    #[serde(deserialize_with = "bool_false")]
    pub is_suspended: bool,

    // Category / catalog lookups (summary breakdowns)
    pub category: Option<CategoryRef>,
    pub item: Option<CatalogItemRef>,
    pub dish: Option<DishRef>,
}

impl OrderItem {
    /// Line total before order-level adjustments
    pub fn line_total(&self) -> f64 {
        crate::money::safe_number(self.price * self.quantity)
    }

    /// True when the line must not appear on sale receipts
    pub fn is_voided(&self) -> bool {
        self.deleted_at.is_some() || self.is_refunded || self.is_suspended
    }

    /// Category display label: `category` string -> `category.name` ->
    /// first catalog category name
    pub fn category_label(&self) -> Option<String> {
        if let Some(cat) = &self.category
            && let Some(label) = cat.label()
        {
            return Some(label.to_string());
        }
        self.item
            .as_ref()
            .and_then(|i| i.categories.first())
            .and_then(|c| c.name.clone())
            .filter(|n| !n.is_empty())
    }

    /// Dish display label: catalog item name -> dish name
    pub fn dish_label(&self) -> Option<String> {
        self.item
            .as_ref()
            .and_then(|i| i.name.clone())
            .or_else(|| self.dish.as_ref().and_then(|d| d.name.clone()))
            .filter(|n| !n.is_empty())
    }
}

/// Delivery details attached to an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeliveryRef {
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub delivery_charges: Option<f64>,
    #[serde(deserialize_with = "lenient_opt_f64")]
    pub charges: Option<f64>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub notes: Option<String>,
}

/// Customer details attached to an order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerRef {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub phone: Option<String>,
}

/// Order entity as posted by the back office (read-only input)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Order {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub invoice_number: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub split: Option<String>,
    pub table: Option<TableRef>,
    pub user: Option<UserRef>,
    pub items: Vec<OrderItem>,
    pub payments: Vec<Payment>,
    pub extras: Vec<Extra>,

    pub discount: Option<DiscountRef>,
    #[serde(deserialize_with = "lenient_f64")]
    pub discount_amount: f64,

    pub tax: Option<TaxRef>,
    #[serde(deserialize_with = "lenient_f64")]
    pub tax_amount: f64,

    #[serde(deserialize_with = "lenient_f64")]
    pub service_charge: f64,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub service_charge_type: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub service_charge_amount: f64,

    #[serde(deserialize_with = "lenient_f64")]
    pub tip_amount: f64,

    #[serde(deserialize_with = "lenient_f64")]
    pub delivery_charges: f64,
    pub delivery: Option<DeliveryRef>,
    pub customer: Option<CustomerRef>,

    #[serde(deserialize_with = "lenient_opt_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub covers: f64,
    pub tags: Vec<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub notes: Option<String>,

    /// Creation time, unix millis
    pub created_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_deserializes_leniently() {
        let order: Order = serde_json::from_value(json!({
            "invoice_number": 1042,
            "items": [
                {"name": "Karahi", "price": "234", "quantity": 1},
                {"name": "Naan", "price": 15, "quantity": "4", "is_refunded": true}
            ],
            "payments": [{"amount": 697.56, "payment_type": {"title": "Cash"}}],
            "tax_amount": "79.56",
            "covers": null
        }))
        .unwrap();

        assert_eq!(order.invoice_number.as_deref(), Some("1042"));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].line_total(), 234.0);
        assert!(order.items[1].is_voided());
        assert_eq!(order.tax_amount, 79.56);
        assert_eq!(order.covers, 0.0);
        assert_eq!(order.payments[0].method(), "Cash");
    }

    #[test]
    fn test_category_label_resolution_order() {
        let plain: OrderItem =
            serde_json::from_value(json!({"category": "Grill"})).unwrap();
        assert_eq!(plain.category_label().as_deref(), Some("Grill"));

        let object: OrderItem =
            serde_json::from_value(json!({"category": {"name": "BBQ"}})).unwrap();
        assert_eq!(object.category_label().as_deref(), Some("BBQ"));

        let nested: OrderItem = serde_json::from_value(
            json!({"item": {"name": "Seekh", "categories": [{"name": "Starters"}]}}),
        )
        .unwrap();
        assert_eq!(nested.category_label().as_deref(), Some("Starters"));

        let none: OrderItem = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert!(none.category_label().is_none());
    }

    #[test]
    fn test_payment_collected_prefers_payable() {
        let p: Payment =
            serde_json::from_value(json!({"amount": 10.0, "payable": 10.37})).unwrap();
        assert_eq!(p.collected(), 10.37);

        let p: Payment = serde_json::from_value(json!({"amount": 10.0})).unwrap();
        assert_eq!(p.collected(), 10.0);
    }
}
