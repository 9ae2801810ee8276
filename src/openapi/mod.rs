use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "0.1.0",
        description = r#"
# Storefront API

A small e-commerce backend: product catalog, user registration and login,
per-user shopping carts, and checkout totals.

## Checkout

`POST /checkout/{user_id}` prices the user's cart against the current catalog
and returns the lines in the order they were added plus a grand total. Cart
items whose product has disappeared from the catalog are dropped from the
summary rather than failing the request.

## Error Handling

Errors use a consistent JSON body with appropriate HTTP status codes:

```json
{
  "error": "Not Found",
  "message": "Cart is empty for user u1",
  "request_id": "req-abc123",
  "timestamp": "2025-01-01T00:00:00Z"
}
```
        "#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Accounts", description = "User registration and login"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Checkout", description = "Order summary computation")
    ),
    paths(
        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,

        // Accounts
        crate::handlers::accounts::register,
        crate::handlers::accounts::login,

        // Cart
        crate::handlers::carts::add_to_cart,
        crate::handlers::carts::get_cart,

        // Checkout
        crate::handlers::checkout::checkout,

        // Welcome, health and status intentionally omitted from OpenAPI paths
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,
            crate::handlers::common::MessageResponse,

            // Product types
            crate::handlers::products::CreateProductRequest,
            crate::handlers::products::ProductResponse,
            crate::handlers::products::ProductListResponse,

            // Account types
            crate::handlers::accounts::RegisterRequest,
            crate::handlers::accounts::LoginRequest,

            // Cart types
            crate::handlers::carts::AddToCartRequest,
            crate::handlers::carts::CartItemResponse,
            crate::handlers::carts::CartItemsResponse,

            // Checkout types
            crate::handlers::checkout::CheckoutLineResponse,
            crate::handlers::checkout::OrderSummaryResponse,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
