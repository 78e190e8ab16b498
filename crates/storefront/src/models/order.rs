//! Order domain types.
//!
//! An order is an immutable financial record. Item prices are copies taken
//! at checkout and the order total is always derived from the items.

use chrono::{DateTime, Utc};

use football_shop_core::{
    CustomerDetails, OrderId, OrderItemId, OrderLineDraft, OrderStatus, Price, ProductId, UserId,
};

/// A placed order with its items.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub delivery_address: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of item line totals. Never stored.
    #[must_use]
    pub fn total_amount(&self) -> Price {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// One order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub product_name: String,
    pub qty: u32,
    /// Price at the time of purchase.
    pub unit_price: Price,
}

impl OrderItem {
    /// `unit_price * qty`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.qty)
    }
}

/// Everything needed to place an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLineDraft>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i32, cents: i64, qty: u32) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(id),
            order_id: OrderId::new(1),
            product_id: ProductId::new(id),
            product_name: format!("Product {id}"),
            qty,
            unit_price: Price::from_cents(cents),
        }
    }

    fn order(items: Vec<OrderItem>) -> Order {
        Order {
            id: OrderId::new(1),
            user_id: UserId::new(1),
            customer_name: "Ivan".to_owned(),
            customer_phone: "+7".to_owned(),
            customer_email: "ivan@example.com".to_owned(),
            delivery_address: None,
            status: OrderStatus::New,
            created_at: Utc::now(),
            items,
        }
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let order = order(vec![item(1, 499_000, 2), item(2, 129_000, 3)]);
        assert_eq!(order.items[0].line_total(), Price::from_cents(998_000));
        assert_eq!(order.total_amount(), Price::from_cents(1_385_000));
    }

    #[test]
    fn test_empty_order_totals_zero() {
        assert_eq!(order(Vec::new()).total_amount(), Price::ZERO);
    }
}
