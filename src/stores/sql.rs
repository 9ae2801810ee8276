use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{CartStore, CatalogStore, NewCartItem, StoreError, UserStore};
use crate::entities::{
    cart_item, product, user, CartItem, CartItemModel, Product, ProductModel, User, UserModel,
};

/// SQL-backed catalog store
#[derive(Clone)]
pub struct SqlCatalogStore {
    db: Arc<DatabaseConnection>,
}

impl SqlCatalogStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogStore for SqlCatalogStore {
    async fn find(&self, id: Uuid) -> Result<Option<ProductModel>, StoreError> {
        Ok(Product::find_by_id(id).one(&*self.db).await?)
    }

    async fn find_all(&self) -> Result<Vec<ProductModel>, StoreError> {
        Ok(Product::find()
            .order_by_asc(product::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    async fn insert(&self, product: ProductModel) -> Result<Uuid, StoreError> {
        let stored = product::ActiveModel {
            id: Set(product.id),
            name: Set(product.name),
            description: Set(product.description),
            price: Set(product.price),
            image: Set(product.image),
            stock: Set(product.stock),
            created_at: Set(product.created_at),
        }
        .insert(&*self.db)
        .await?;
        Ok(stored.id)
    }
}

/// SQL-backed cart store
///
/// The auto-increment primary key is the insertion-order key, so
/// `find_by_user` orders by it.
#[derive(Clone)]
pub struct SqlCartStore {
    db: Arc<DatabaseConnection>,
}

impl SqlCartStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for SqlCartStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<CartItemModel>, StoreError> {
        Ok(CartItem::find()
            .filter(cart_item::Column::UserId.eq(user_id))
            .order_by_asc(cart_item::Column::Id)
            .all(&*self.db)
            .await?)
    }

    async fn insert(&self, item: NewCartItem) -> Result<i64, StoreError> {
        let stored = cart_item::ActiveModel {
            user_id: Set(item.user_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;
        Ok(stored.id)
    }
}

/// SQL-backed user store
#[derive(Clone)]
pub struct SqlUserStore {
    db: Arc<DatabaseConnection>,
}

impl SqlUserStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserModel>, StoreError> {
        Ok(User::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?)
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<UserModel>, StoreError> {
        Ok(User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(username))
                    .add(user::Column::Email.eq(email)),
            )
            .one(&*self.db)
            .await?)
    }

    async fn insert(&self, user: UserModel) -> Result<Uuid, StoreError> {
        let stored = user::ActiveModel {
            id: Set(user.id),
            username: Set(user.username),
            email: Set(user.email),
            password: Set(user.password),
            created_at: Set(user.created_at),
        }
        .insert(&*self.db)
        .await?;
        Ok(stored.id)
    }
}
