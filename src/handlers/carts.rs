use crate::handlers::common::{
    created_response, map_service_error, success_response, validate_input, MessageResponse,
};
use crate::{errors::ApiError, AppState};
use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Creates the router for cart endpoints
pub fn carts_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(add_to_cart))
        .route("/:user_id", get(get_cart))
}

/// Add a product to a user's cart
#[utoipa::path(
    post,
    path = "/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 201, description = "Item added to cart", body = MessageResponse),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddToCartRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    state
        .services
        .carts
        .add_to_cart(&payload.user_id, payload.product_id, payload.quantity)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(MessageResponse::new("Item added to cart")))
}

/// List a user's cart items
#[utoipa::path(
    get,
    path = "/cart/{user_id}",
    params(
        ("user_id" = String, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Cart items listed", body = CartItemsResponse)
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = state
        .services
        .carts
        .list_cart_items(&user_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(CartItemsResponse {
        items: items.into_iter().map(CartItemResponse::from).collect(),
    }))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddToCartRequest {
    #[validate(length(min = 1))]
    #[schema(example = "u1")]
    pub user_id: String,
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    /// Line item id; ascending ids give the insertion order
    #[schema(example = 1)]
    pub id: i64,
    /// Owning user
    #[schema(example = "u1")]
    pub user_id: String,
    /// Referenced product
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub product_id: Uuid,
    /// Units of the product
    #[schema(example = 2)]
    pub quantity: i32,
    /// When the item was added
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<crate::entities::CartItemModel> for CartItemResponse {
    fn from(model: crate::entities::CartItemModel) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            product_id: model.product_id,
            quantity: model.quantity,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemsResponse {
    pub items: Vec<CartItemResponse>,
}
