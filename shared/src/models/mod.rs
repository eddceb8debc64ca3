//! Input models for the print pipeline

pub mod order;
pub mod serde_helpers;

pub use order::{
    CatalogItemRef, CategoryRef, CustomerRef, DeliveryRef, DiscountRef, DishRef, Extra, Order,
    OrderItem, Payment, PaymentTypeRef, TableRef, TaxRef, UserRef,
};
