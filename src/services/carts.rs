use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::CartItemModel;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::stores::{CartStore, CatalogStore, NewCartItem};

/// Shopping cart service.
///
/// Carts are append-only: every add stores a fresh line item, and two
/// adds of the same product yield two lines. Updates and removals are
/// out of scope.
#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartStore>,
    catalog: Arc<dyn CatalogStore>,
    event_sender: Arc<EventSender>,
}

impl CartService {
    pub fn new(
        carts: Arc<dyn CartStore>,
        catalog: Arc<dyn CatalogStore>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        Self {
            carts,
            catalog,
            event_sender,
        }
    }

    /// Adds a product to a user's cart and returns the new line item id.
    ///
    /// The quantity must be at least 1 and the product must exist in the
    /// catalog at add time; checkout tolerates it disappearing afterwards.
    /// Publishes a `CartItemAdded` event upon success.
    #[instrument(skip(self))]
    pub async fn add_to_cart(
        &self,
        user_id: &str,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<i64, ServiceError> {
        if quantity < 1 {
            return Err(ServiceError::InvalidQuantity(quantity));
        }

        if self.catalog.find(product_id).await?.is_none() {
            return Err(ServiceError::ProductNotFound(product_id));
        }

        // Always a new line, even if the product is already in the cart.
        let item_id = self
            .carts
            .insert(NewCartItem {
                user_id: user_id.to_string(),
                product_id,
                quantity,
            })
            .await?;

        self.event_sender
            .send_or_log(Event::CartItemAdded {
                user_id: user_id.to_string(),
                product_id,
                quantity,
            })
            .await;

        info!("Added cart item {} for user {}", item_id, user_id);
        Ok(item_id)
    }

    /// Returns a user's cart line items in insertion order.
    #[instrument(skip(self))]
    pub async fn list_cart_items(&self, user_id: &str) -> Result<Vec<CartItemModel>, ServiceError> {
        Ok(self.carts.find_by_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProductModel;
    use crate::stores::{InMemoryCartStore, InMemoryCatalogStore};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    async fn service_with_product() -> (CartService, Uuid, mpsc::Receiver<Event>) {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let product_id = catalog
            .insert(ProductModel {
                id: Uuid::new_v4(),
                name: "Laptop".to_string(),
                description: "A laptop".to_string(),
                price: dec!(1200.00),
                image: "laptop.png".to_string(),
                stock: 10,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let (tx, rx) = mpsc::channel(16);
        let service = CartService::new(
            Arc::new(InMemoryCartStore::new()),
            catalog,
            Arc::new(EventSender::new(tx)),
        );
        (service, product_id, rx)
    }

    #[tokio::test]
    async fn add_rejects_non_positive_quantity() {
        let (service, product_id, _rx) = service_with_product().await;

        let err = service.add_to_cart("u1", product_id, 0).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidQuantity(0)));

        let err = service.add_to_cart("u1", product_id, -3).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidQuantity(-3)));

        // Quantity 1 is the smallest accepted value
        service.add_to_cart("u1", product_id, 1).await.unwrap();
    }

    #[tokio::test]
    async fn add_rejects_unknown_product() {
        let (service, _product_id, _rx) = service_with_product().await;

        let missing = Uuid::new_v4();
        let err = service.add_to_cart("u1", missing, 2).await.unwrap_err();
        assert!(matches!(err, ServiceError::ProductNotFound(id) if id == missing));

        let items = service.list_cart_items("u1").await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn adding_same_product_twice_keeps_two_lines() {
        let (service, product_id, _rx) = service_with_product().await;

        let first = service.add_to_cart("u1", product_id, 1).await.unwrap();
        let second = service.add_to_cart("u1", product_id, 2).await.unwrap();
        assert!(first < second);

        let items = service.list_cart_items("u1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[1].quantity, 2);
    }

    #[tokio::test]
    async fn add_publishes_cart_item_added() {
        let (service, product_id, mut rx) = service_with_product().await;

        service.add_to_cart("u9", product_id, 4).await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::CartItemAdded { user_id, product_id: pid, quantity: 4 })
                if user_id == "u9" && pid == product_id
        ));
    }

    #[tokio::test]
    async fn carts_are_isolated_per_user() {
        let (service, product_id, _rx) = service_with_product().await;

        service.add_to_cart("u1", product_id, 1).await.unwrap();
        service.add_to_cart("u2", product_id, 5).await.unwrap();

        let u1_items = service.list_cart_items("u1").await.unwrap();
        assert_eq!(u1_items.len(), 1);
        assert_eq!(u1_items[0].quantity, 1);

        let u2_items = service.list_cart_items("u2").await.unwrap();
        assert_eq!(u2_items.len(), 1);
        assert_eq!(u2_items[0].quantity, 5);
    }
}
