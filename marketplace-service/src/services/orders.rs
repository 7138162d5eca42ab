//! Order workflow: placement and status transitions.
//!
//! Placement runs inside a single database transaction. The stock check and
//! decrement are one conditional UPDATE per product row, so two concurrent
//! orders against the same product can never drive stock negative - the
//! second conditional update affects zero rows and the whole order rolls
//! back with no partial order, item, or stock mutation.

use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{OrderStatus, Product};
use crate::services::Database;

/// One line of a cart: a product and a quantity.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Result of a successful placement.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub total_amount: f64,
}

/// Effective unit price after applying the percentage discount.
pub fn effective_unit_price(price: f64, discount_pct: f64) -> f64 {
    price * (1.0 - discount_pct / 100.0)
}

/// Order placement and status-advance workflow.
#[derive(Clone)]
pub struct OrderService {
    db: Database,
}

impl OrderService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Place an order for `user_id` from a non-empty cart.
    ///
    /// Fetches each product, decrements its stock with a conditional UPDATE,
    /// freezes the discounted unit price per line, then inserts the order and
    /// its items. All of it commits or none of it does.
    pub async fn place_order(
        &self,
        user_id: Uuid,
        items: &[CartLine],
    ) -> Result<PlacedOrder, AppError> {
        if items.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Order must contain at least one item"
            )));
        }
        if items.iter().any(|line| line.quantity <= 0) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Item quantity must be positive"
            )));
        }

        let mut tx = self.db.pool().begin().await.map_err(AppError::from)?;

        let mut total_amount = 0.0_f64;
        let mut priced_lines = Vec::with_capacity(items.len());

        // Sequential per line: the check-then-decrement ordering per product
        // row is what the conditional UPDATE protects.
        for line in items {
            let product =
                sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
                    .bind(line.product_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::from)?
                    .ok_or_else(|| {
                        AppError::NotFound(anyhow::anyhow!(
                            "Product {} not found",
                            line.product_id
                        ))
                    })?;

            let updated = sqlx::query(
                "UPDATE products SET stock = stock - $1 WHERE id = $2 AND stock >= $1",
            )
            .bind(line.quantity)
            .bind(line.product_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

            if updated.rows_affected() == 0 {
                return Err(AppError::InsufficientStock(format!(
                    "Insufficient stock for {}",
                    product.name
                )));
            }

            let unit_price = effective_unit_price(product.price, product.discount);
            total_amount += unit_price * f64::from(line.quantity);
            priced_lines.push((line.product_id, line.quantity, unit_price));
        }

        let order_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO orders (id, user_id, total_amount, status) VALUES ($1, $2, $3, $4)",
        )
        .bind(order_id)
        .bind(user_id)
        .bind(total_amount)
        .bind(OrderStatus::Pending.as_str())
        .execute(&mut *tx)
        .await
        .map_err(AppError::from)?;

        for (product_id, quantity, unit_price) in &priced_lines {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(product_id)
            .bind(quantity)
            .bind(unit_price)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;
        }

        tx.commit().await.map_err(AppError::from)?;

        tracing::info!(
            order_id = %order_id,
            user_id = %user_id,
            items = items.len(),
            total_amount,
            "Order placed"
        );

        Ok(PlacedOrder {
            order_id,
            total_amount,
        })
    }

    /// Advance an order along the forward-only status machine.
    ///
    /// The write re-checks the status it validated against, so two racing
    /// updates against the same order cannot commit a net transition the
    /// machine forbids; the loser's update affects zero rows.
    ///
    /// Cancellation does not restore decremented stock.
    pub async fn advance_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> Result<(), AppError> {
        let order = self
            .db
            .find_order_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;

        let current: OrderStatus = order
            .status
            .parse()
            .map_err(|e: String| AppError::InternalError(anyhow::anyhow!(e)))?;

        if !current.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot move order from {} to {}",
                current.as_str(),
                new_status.as_str()
            )));
        }

        let updated = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2 AND status = $3")
            .bind(new_status.as_str())
            .bind(order_id)
            .bind(current.as_str())
            .execute(self.db.pool())
            .await
            .map_err(AppError::from)?;

        if updated.rows_affected() == 0 {
            // Lost a race: the status moved on since the read above.
            return Err(AppError::InvalidTransition(format!(
                "Cannot move order from {} to {}",
                current.as_str(),
                new_status.as_str()
            )));
        }

        tracing::info!(
            order_id = %order_id,
            from = current.as_str(),
            to = new_status.as_str(),
            "Order status advanced"
        );

        Ok(())
    }
}
