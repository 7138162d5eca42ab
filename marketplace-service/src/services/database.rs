//! PostgreSQL query layer for the marketplace.
//!
//! One method per statement, parameterized binds throughout. Multi-statement
//! workflows (order placement, moderation cascades) own their transactions in
//! the service modules.

use service_core::error::AppError;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::models::{
    Category, KycDocument, Order, OrderItemDetail, OrderSummaryRow, PendingDocumentRow, Product,
    ProductWithCategory, SellerWithDocCounts, User,
};

/// PostgreSQL database wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// Aggregate counters for the admin dashboard.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_sellers: i64,
    pub pending_sellers: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub total_revenue: f64,
}

impl Database {
    /// Create a new database wrapper from a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }

    // ==================== User Operations ====================

    /// Find user by ID.
    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Find user by email (case-insensitive).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Insert a new user.
    pub async fn insert_user(&self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, gst_no, shop_name, address, phone, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.role)
        .bind(&user.gst_no)
        .bind(&user.shop_name)
        .bind(&user.address)
        .bind(&user.phone)
        .bind(&user.status)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    /// List sellers, optionally filtered by verification status, newest first.
    pub async fn list_sellers(&self, status: Option<&str>) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE role = 'seller' AND ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// List sellers awaiting verification, with their KYC document counts.
    pub async fn list_pending_sellers(&self) -> Result<Vec<SellerWithDocCounts>, AppError> {
        sqlx::query_as::<_, SellerWithDocCounts>(
            r#"
            SELECT u.id, u.name, u.email, u.gst_no, u.shop_name, u.address,
                   u.status, u.created_at,
                   (SELECT COUNT(*) FROM kyc_documents
                    WHERE user_id = u.id AND status = 'pending') AS pending_docs,
                   (SELECT COUNT(*) FROM kyc_documents
                    WHERE user_id = u.id AND status = 'approved') AS approved_docs
            FROM users u
            WHERE u.role = 'seller' AND u.status = 'pending'
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    // ==================== Category Operations ====================

    /// List all categories ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Find category by ID.
    pub async fn find_category_by_id(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Insert a new category.
    pub async fn insert_category(&self, category: &Category) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO categories (id, name, image_url, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.image_url)
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    /// Update a category. Returns the number of rows affected.
    pub async fn update_category(
        &self,
        id: Uuid,
        name: &str,
        image_url: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE categories SET name = $1, image_url = $2 WHERE id = $3")
            .bind(name)
            .bind(image_url)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }

    /// Delete a category. Returns the number of rows affected.
    pub async fn delete_category(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }

    // ==================== Product Operations ====================

    /// List products with their category name, optionally filtered.
    pub async fn list_products(
        &self,
        category_id: Option<Uuid>,
        seller_id: Option<Uuid>,
    ) -> Result<Vec<ProductWithCategory>, AppError> {
        sqlx::query_as::<_, ProductWithCategory>(
            r#"
            SELECT p.*, c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON p.category_id = c.id
            WHERE ($1::uuid IS NULL OR p.category_id = $1)
              AND ($2::uuid IS NULL OR p.seller_id = $2)
            "#,
        )
        .bind(category_id)
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Find product by ID.
    pub async fn find_product_by_id(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Insert a new product.
    pub async fn insert_product(&self, product: &Product) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO products
                (id, category_id, name, description, price, unit, image_url,
                 stock, discount, seller_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(product.id)
        .bind(product.category_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(&product.unit)
        .bind(&product.image_url)
        .bind(product.stock)
        .bind(product.discount)
        .bind(product.seller_id)
        .bind(product.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    /// Update all scalar fields of a product atomically.
    /// Returns the number of rows affected.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_product(
        &self,
        id: Uuid,
        category_id: Uuid,
        name: &str,
        description: &str,
        price: f64,
        unit: &str,
        image_url: &str,
        stock: i32,
        discount: f64,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET category_id = $1, name = $2, description = $3, price = $4,
                unit = $5, image_url = $6, stock = $7, discount = $8
            WHERE id = $9
            "#,
        )
        .bind(category_id)
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(unit)
        .bind(image_url)
        .bind(stock)
        .bind(discount)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }

    /// Delete a product. Returns the number of rows affected.
    pub async fn delete_product(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;
        Ok(result.rows_affected())
    }

    // ==================== KYC Document Operations ====================

    /// Insert a new KYC document. Re-uploads always create a new row.
    pub async fn insert_kyc_document(&self, doc: &KycDocument) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO kyc_documents
                (id, user_id, document_type, document_url, status, rejection_reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(doc.id)
        .bind(doc.user_id)
        .bind(&doc.document_type)
        .bind(&doc.document_url)
        .bind(&doc.status)
        .bind(&doc.rejection_reason)
        .bind(doc.created_at)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    /// List all documents submitted by a user.
    pub async fn list_kyc_documents_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<KycDocument>, AppError> {
        sqlx::query_as::<_, KycDocument>(
            "SELECT * FROM kyc_documents WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// List pending documents joined with their owner, for moderation.
    pub async fn list_pending_kyc_documents(&self) -> Result<Vec<PendingDocumentRow>, AppError> {
        sqlx::query_as::<_, PendingDocumentRow>(
            r#"
            SELECT kd.id, kd.user_id, kd.document_type, kd.document_url,
                   kd.status, kd.created_at, u.name, u.email, u.shop_name
            FROM kyc_documents kd
            JOIN users u ON kd.user_id = u.id
            WHERE kd.status = 'pending'
            ORDER BY kd.created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    // ==================== Order Operations ====================

    /// List orders joined with buyer info, optionally filtered, newest first.
    pub async fn list_orders(
        &self,
        user_id: Option<Uuid>,
        status: Option<&str>,
    ) -> Result<Vec<OrderSummaryRow>, AppError> {
        sqlx::query_as::<_, OrderSummaryRow>(
            r#"
            SELECT o.id, o.user_id, o.total_amount, o.status, o.created_at,
                   u.name AS user_name, u.shop_name
            FROM orders o
            JOIN users u ON o.user_id = u.id
            WHERE ($1::uuid IS NULL OR o.user_id = $1)
              AND ($2::text IS NULL OR o.status = $2)
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Find order by ID.
    pub async fn find_order_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// List the items of an order joined with product name and image.
    pub async fn list_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItemDetail>, AppError> {
        sqlx::query_as::<_, OrderItemDetail>(
            r#"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price,
                   p.name AS product_name, p.image_url
            FROM order_items oi
            JOIN products p ON oi.product_id = p.id
            WHERE oi.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    // ==================== Dashboard ====================

    /// Aggregate counters for the admin dashboard. Revenue excludes
    /// cancelled orders.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, AppError> {
        let (total_sellers, pending_sellers): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'pending')
            FROM users WHERE role = 'seller'
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        let (total_products,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        let (total_orders, pending_orders): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE status = 'pending')
            FROM orders
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        let (total_revenue,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_amount), 0) FROM orders WHERE status != 'cancelled'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(DashboardStats {
            total_sellers,
            pending_sellers,
            total_products,
            total_orders,
            pending_orders,
            total_revenue,
        })
    }
}
