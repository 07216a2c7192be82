//! Order domain types.
//!
//! Line items are a snapshot taken at checkout: later catalog edits must not
//! reach back into historical orders, so name/price/image/size/color are
//! denormalized here rather than joined from `products`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use footflex_core::{Email, OrderId, ProductId, UserId};

/// A purchased line item, denormalized at order-creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ProductId,
    pub name: String,
    pub qty: i32,
    pub image: String,
    pub price: Decimal,
    pub size: String,
    pub color: String,
}

/// Shipping address snapshot captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Payment confirmation snapshot stored by the pay operation.
///
/// Field names follow the payment gateway's callback payload, so no case
/// renaming here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub email_address: String,
}

/// The owning user joined into an order response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOwner {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// Reference to an order's owner: a bare id, or the joined user document.
///
/// Detail and admin-list responses join the owner in; owner-scoped lists
/// keep the bare id.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Id(UserId),
    Joined(OrderOwner),
}

/// A placed order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user: OwnerRef,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub total_price: Decimal,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for placing an order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub total_price: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_ref_serializes_flat_id_or_document() {
        let bare = OwnerRef::Id(UserId::new(3));
        assert_eq!(serde_json::to_value(&bare).unwrap(), serde_json::json!(3));

        let joined = OwnerRef::Joined(OrderOwner {
            id: UserId::new(3),
            name: "Jane Doe".to_string(),
            email: None,
        });
        assert_eq!(
            serde_json::to_value(&joined).unwrap(),
            serde_json::json!({"id": 3, "name": "Jane Doe"})
        );
    }

    #[test]
    fn test_order_item_wire_shape() {
        let item = OrderItem {
            product: ProductId::new(9),
            name: "Runner Pro".to_string(),
            qty: 2,
            image: "/uploads/runner.jpg".to_string(),
            price: Decimal::new(9999, 2),
            size: "42".to_string(),
            color: "Black".to_string(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["product"], serde_json::json!(9));
        assert_eq!(value["qty"], serde_json::json!(2));
        // Decimal serializes as a string on the wire
        assert_eq!(value["price"], serde_json::json!("99.99"));
    }

    #[test]
    fn test_payment_result_keeps_gateway_field_names() {
        let result = PaymentResult {
            id: "PAY-1".to_string(),
            status: "COMPLETED".to_string(),
            update_time: "2026-08-01T12:00:00Z".to_string(),
            email_address: "buyer@example.com".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("update_time").is_some());
        assert!(value.get("email_address").is_some());
    }
}
