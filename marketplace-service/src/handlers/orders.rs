//! Order handlers: listing, detail, placement, and the admin-only status
//! transition endpoint.

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::AdminUser;
use crate::models::{Order, OrderItemDetail, OrderStatus, OrderSummaryRow};
use crate::services::CartLine;
use crate::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub user_id: Option<Uuid>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub id: Uuid,
    pub total_amount: f64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// GET /orders?userId=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<OrderSummaryRow>>, AppError> {
    if let Some(status) = params.status.as_deref() {
        status
            .parse::<OrderStatus>()
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e)))?;
    }
    let orders = state
        .db
        .list_orders(params.user_id, params.status.as_deref())
        .await?;
    Ok(Json(orders))
}

/// GET /orders/:id - the order with its line items.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetailResponse>, AppError> {
    let order = state
        .db
        .find_order_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Order not found")))?;
    let items = state.db.list_order_items(id).await?;

    Ok(Json(OrderDetailResponse { order, items }))
}

/// Place an order. Stock is checked and decremented atomically per line.
///
/// POST /orders
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    state
        .db
        .find_user_by_id(req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    let lines: Vec<CartLine> = req
        .items
        .iter()
        .map(|item| CartLine {
            product_id: item.product_id,
            quantity: item.quantity,
        })
        .collect();

    let placed = state.orders.place_order(req.user_id, &lines).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            id: placed.order_id,
            total_amount: placed.total_amount,
            message: "Order created successfully".to_string(),
        }),
    ))
}

/// Advance an order's status along the forward-only machine.
///
/// PUT /orders/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    let new_status: OrderStatus = req
        .status
        .parse()
        .map_err(|e: String| AppError::BadRequest(anyhow::anyhow!(e)))?;

    state.orders.advance_status(id, new_status).await?;

    Ok(Json(ActionResponse {
        success: true,
        message: format!("Order status updated to {}", new_status.as_str()),
    }))
}
