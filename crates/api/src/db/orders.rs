//! Order repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use footflex_core::{Email, OrderId, UserId};

use super::RepositoryError;
use crate::models::order::{
    NewOrder, Order, OrderItem, OrderOwner, OwnerRef, PaymentResult, ShippingAddress,
};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    user_id: i32,
    order_items: Json<Vec<OrderItem>>,
    shipping_address: Json<ShippingAddress>,
    payment_method: String,
    total_price: Decimal,
    is_paid: bool,
    paid_at: Option<DateTime<Utc>>,
    is_delivered: bool,
    delivered_at: Option<DateTime<Utc>>,
    status: String,
    payment_result: Option<Json<PaymentResult>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    /// Convert to a domain order; callers choose how the owner is exposed.
    fn into_order(self, owner: OwnerRef) -> Order {
        Order {
            id: OrderId::new(self.id),
            user: owner,
            order_items: self.order_items.0,
            shipping_address: self.shipping_address.0,
            payment_method: self.payment_method,
            total_price: self.total_price,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            is_delivered: self.is_delivered,
            delivered_at: self.delivered_at,
            status: self.status,
            payment_result: self.payment_result.map(|Json(result)| result),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn into_order_with_bare_owner(self) -> Order {
        let owner = OwnerRef::Id(UserId::new(self.user_id));
        self.into_order(owner)
    }
}

/// Order row joined with its owner's user record.
#[derive(Debug, sqlx::FromRow)]
struct OrderWithUserRow {
    #[sqlx(flatten)]
    order: OrderRow,
    user_name: String,
    user_email: Email,
}

impl OrderWithUserRow {
    fn into_order(self, include_email: bool) -> Order {
        let owner = OwnerRef::Joined(OrderOwner {
            id: UserId::new(self.order.user_id),
            name: self.user_name,
            email: include_email.then_some(self.user_email),
        });
        self.order.into_order(owner)
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for the given user.
    ///
    /// The line items arrive already denormalized and are stored verbatim;
    /// status starts at `Pending` with payment and delivery flags unset.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, user: UserId, new: NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (user_id, order_items, shipping_address, payment_method, total_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            ",
        )
        .bind(user)
        .bind(Json(&new.order_items))
        .bind(Json(&new.shipping_address))
        .bind(&new.payment_method)
        .bind(new.total_price)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_order_with_bare_owner())
    }

    /// Get an order by id with the owning user's name and email joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderWithUserRow>(
            r"
            SELECT o.*, u.name AS user_name, u.email AS user_email
            FROM orders o
            JOIN users u ON u.id = o.user_id
            WHERE o.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| r.into_order(true)))
    }

    /// Mark an order paid and store the payment confirmation snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_paid(
        &self,
        id: OrderId,
        payment: &PaymentResult,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders SET
                is_paid = TRUE,
                paid_at = now(),
                payment_result = $2,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(Json(payment))
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order_with_bare_owner)
            .ok_or(RepositoryError::NotFound)
    }

    /// Overwrite the order status.
    ///
    /// Any string is accepted; there is no transition table. An empty string
    /// counts as "not supplied" and keeps the prior status. The single
    /// codified side effect: entering the literal `Delivered` also flips
    /// `is_delivered` and stamps `delivered_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(&self, id: OrderId, status: &str) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders SET
                status = CASE WHEN $2 = '' THEN status ELSE $2 END,
                is_delivered = CASE WHEN $2 = 'Delivered' THEN TRUE ELSE is_delivered END,
                delivered_at = CASE WHEN $2 = 'Delivered' THEN now() ELSE delivered_at END,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        row.map(OrderRow::into_order_with_bare_owner)
            .ok_or(RepositoryError::NotFound)
    }

    /// List the orders owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows =
            sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE user_id = $1 ORDER BY id")
                .bind(user)
                .fetch_all(self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(OrderRow::into_order_with_bare_owner)
            .collect())
    }

    /// List every order with the owning user's id and name joined in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderWithUserRow>(
            r"
            SELECT o.*, u.name AS user_name, u.email AS user_email
            FROM orders o
            JOIN users u ON u.id = o.user_id
            ORDER BY o.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_order(false)).collect())
    }
}
