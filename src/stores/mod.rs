/*!
 * # Store Abstraction
 *
 * Catalog, cart, and user persistence behind injectable traits so the
 * services can run against the SQL backend or an in-memory one (used
 * in tests and selectable via `store_backend` in the configuration).
 */

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{CartItemModel, ProductModel, UserModel};
use crate::errors::ServiceError;

pub mod memory;
pub mod sql;

pub use memory::{InMemoryCartStore, InMemoryCatalogStore, InMemoryUserStore};
pub use sql::{SqlCartStore, SqlCatalogStore, SqlUserStore};

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::error::DbErr),
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => ServiceError::DatabaseError(e),
            StoreError::Backend(msg) => ServiceError::InternalError(msg),
        }
    }
}

/// Cart line item as supplied by callers; the store assigns the id
/// and the timestamp.
#[derive(Debug, Clone)]
pub struct NewCartItem {
    pub user_id: String,
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Product collection
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<ProductModel>, StoreError>;
    async fn find_all(&self) -> Result<Vec<ProductModel>, StoreError>;
    async fn insert(&self, product: ProductModel) -> Result<Uuid, StoreError>;
}

/// Per-user cart line items
///
/// `find_by_user` must return items in insertion order; the checkout
/// summary reproduces the cart line for line.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<CartItemModel>, StoreError>;
    async fn insert(&self, item: NewCartItem) -> Result<i64, StoreError>;
}

/// Registered user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, StoreError>;
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<UserModel>, StoreError>;
    async fn insert(&self, user: UserModel) -> Result<Uuid, StoreError>;
}
