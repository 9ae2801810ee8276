use crate::handlers::common::{map_service_error, success_response};
use crate::{
    errors::ApiError,
    services::checkout::{CheckoutLine, OrderSummary},
    AppState,
};
use axum::{
    extract::{Path, State},
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Creates the router for checkout endpoints
pub fn checkout_routes() -> Router<Arc<AppState>> {
    Router::new().route("/:user_id", post(checkout))
}

/// Compute the order summary for a user's cart
#[utoipa::path(
    post,
    path = "/checkout/{user_id}",
    params(
        ("user_id" = String, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Order summary computed", body = OrderSummaryResponse),
        (status = 404, description = "Cart is empty", body = crate::errors::ErrorResponse)
    ),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let summary = state
        .services
        .checkout
        .compute_order_summary(&user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(OrderSummaryResponse::from(summary)))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutLineResponse {
    /// Referenced product
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub product_id: Uuid,
    /// Product name at checkout time
    #[schema(example = "Laptop")]
    pub name: String,
    /// Catalog price at checkout time
    #[schema(example = "1200.00")]
    pub unit_price: Decimal,
    /// Units in the cart line
    #[schema(example = 1)]
    pub quantity: i32,
    /// unit_price times quantity
    #[schema(example = "1200.00")]
    pub subtotal: Decimal,
}

impl From<CheckoutLine> for CheckoutLineResponse {
    fn from(line: CheckoutLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name,
            unit_price: line.unit_price,
            quantity: line.quantity,
            subtotal: line.subtotal,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryResponse {
    /// Priced cart lines in insertion order
    pub lines: Vec<CheckoutLineResponse>,
    /// Sum of all line subtotals
    #[schema(example = "1250.00")]
    pub total: Decimal,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            lines: summary
                .lines
                .into_iter()
                .map(CheckoutLineResponse::from)
                .collect(),
            total: summary.total,
        }
    }
}
