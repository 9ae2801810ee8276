// Storefront services
pub mod accounts;
pub mod carts;
pub mod catalog;
pub mod checkout;

// Re-export services for convenience
pub use accounts::{AccountService, RegisterInput};
pub use carts::CartService;
pub use catalog::{CatalogService, CreateProductInput};
pub use checkout::{CheckoutLine, CheckoutService, OrderSummary};
