use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{CartStore, CatalogStore, NewCartItem, StoreError, UserStore};
use crate::entities::{CartItemModel, ProductModel, UserModel};

/// In-memory catalog store
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: Arc<Mutex<Vec<ProductModel>>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn find(&self, id: Uuid) -> Result<Option<ProductModel>, StoreError> {
        let products = self.products.lock().unwrap();
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<ProductModel>, StoreError> {
        Ok(self.products.lock().unwrap().clone())
    }

    async fn insert(&self, product: ProductModel) -> Result<Uuid, StoreError> {
        let id = product.id;
        self.products.lock().unwrap().push(product);
        Ok(id)
    }
}

/// In-memory cart store
///
/// Items are kept in push order, which is the insertion order the
/// checkout summary relies on.
#[derive(Debug)]
pub struct InMemoryCartStore {
    items: Arc<Mutex<Vec<CartItemModel>>>,
    next_id: AtomicI64,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryCartStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<CartItemModel>, StoreError> {
        let items = self.items.lock().unwrap();
        Ok(items
            .iter()
            .filter(|item| item.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, item: NewCartItem) -> Result<i64, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().push(CartItemModel {
            id,
            user_id: item.user_id,
            product_id: item.product_id,
            quantity: item.quantity,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

/// In-memory user store
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<Vec<UserModel>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<UserModel>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    async fn insert(&self, user: UserModel) -> Result<Uuid, StoreError> {
        let id = user.id;
        self.users.lock().unwrap().push(user);
        Ok(id)
    }
}
