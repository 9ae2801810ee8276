use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::stores::{CartStore, CatalogStore};

/// One priced cart line in an order summary.
///
/// `unit_price` is the catalog price at the moment the summary was
/// computed, not the price at the moment the item was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

/// Priced summary of a user's cart: the lines in insertion order plus
/// the grand total. Derived on every call, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub lines: Vec<CheckoutLine>,
    pub total: Decimal,
}

/// Checkout aggregator.
///
/// Joins a user's cart line items against the current catalog and
/// produces an [`OrderSummary`]. Read-only: neither store is mutated,
/// and two calls against the same store contents return the same
/// summary.
#[derive(Clone)]
pub struct CheckoutService {
    carts: Arc<dyn CartStore>,
    catalog: Arc<dyn CatalogStore>,
    event_sender: Arc<EventSender>,
}

impl CheckoutService {
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

    /// Computes the order summary for a user's cart.
    ///
    /// Fails with [`ServiceError::EmptyCart`] when the user has no cart
    /// items at all. A cart item whose product is missing from the
    /// catalog is dropped from the summary without failing the call, so
    /// the total always equals the sum of the returned lines' subtotals.
    ///
    /// Subtotals are computed in `Decimal` (price times quantity, exact
    /// arithmetic); quantities are multiplied as stored, with no
    /// clamping or normalization here.
    #[instrument(skip(self))]
    pub async fn compute_order_summary(&self, user_id: &str) -> Result<OrderSummary, ServiceError> {
        let items = self.carts.find_by_user(user_id).await?;
        if items.is_empty() {
            return Err(ServiceError::EmptyCart(user_id.to_string()));
        }

        let mut lines = Vec::with_capacity(items.len());
        let mut total = Decimal::ZERO;

        for item in items {
            let product = match self.catalog.find(item.product_id).await? {
                Some(product) => product,
                None => {
                    // A line whose product has vanished is dropped; the rest
                    // of the cart still checks out.
                    warn!(
                        "Skipping cart item {}: product {} no longer in catalog",
                        item.id, item.product_id
                    );
                    continue;
                }
            };

            let subtotal = product.price * Decimal::from(item.quantity);
            total += subtotal;
            lines.push(CheckoutLine {
                product_id: product.id,
                name: product.name,
                unit_price: product.price,
                quantity: item.quantity,
                subtotal,
            });
        }

        self.event_sender
            .send_or_log(Event::CheckoutComputed {
                user_id: user_id.to_string(),
                line_count: lines.len(),
                total,
            })
            .await;

        info!(
            "Computed order summary for user {}: {} lines, total {}",
            user_id,
            lines.len(),
            total
        );
        Ok(OrderSummary { lines, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ProductModel;
    use crate::stores::{InMemoryCartStore, InMemoryCatalogStore, NewCartItem};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tokio::sync::mpsc;

    struct Fixture {
        service: CheckoutService,
        catalog: Arc<InMemoryCatalogStore>,
        carts: Arc<InMemoryCartStore>,
        rx: mpsc::Receiver<Event>,
    }

    fn fixture() -> Fixture {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let carts = Arc::new(InMemoryCartStore::new());
        let (tx, rx) = mpsc::channel(16);
        let service = CheckoutService::new(
            carts.clone(),
            catalog.clone(),
            Arc::new(EventSender::new(tx)),
        );
        Fixture {
            service,
            catalog,
            carts,
            rx,
        }
    }

    async fn seed_product(fx: &Fixture, name: &str, price: Decimal) -> Uuid {
        fx.catalog
            .insert(ProductModel {
                id: Uuid::new_v4(),
                name: name.to_string(),
                description: format!("{} description", name),
                price,
                image: format!("{}.png", name.to_lowercase()),
                stock: 10,
                created_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    async fn seed_cart_item(fx: &Fixture, user_id: &str, product_id: Uuid, quantity: i32) {
        fx.carts
            .insert(NewCartItem {
                user_id: user_id.to_string(),
                product_id,
                quantity,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn summary_prices_every_line_and_totals_them() {
        let fx = fixture();
        let laptop = seed_product(&fx, "Laptop", dec!(1200)).await;
        let mouse = seed_product(&fx, "Mouse", dec!(25)).await;

        seed_cart_item(&fx, "u1", laptop, 1).await;
        seed_cart_item(&fx, "u1", mouse, 2).await;

        let summary = fx.service.compute_order_summary("u1").await.unwrap();

        assert_eq!(summary.lines.len(), 2);
        assert_eq!(
            summary.lines[0],
            CheckoutLine {
                product_id: laptop,
                name: "Laptop".to_string(),
                unit_price: dec!(1200),
                quantity: 1,
                subtotal: dec!(1200),
            }
        );
        assert_eq!(
            summary.lines[1],
            CheckoutLine {
                product_id: mouse,
                name: "Mouse".to_string(),
                unit_price: dec!(25),
                quantity: 2,
                subtotal: dec!(50),
            }
        );
        assert_eq!(summary.total, dec!(1250));
    }

    #[tokio::test]
    async fn summary_preserves_cart_insertion_order() {
        let fx = fixture();
        let laptop = seed_product(&fx, "Laptop", dec!(1200)).await;
        let mouse = seed_product(&fx, "Mouse", dec!(25)).await;

        seed_cart_item(&fx, "u1", mouse, 1).await;
        seed_cart_item(&fx, "u1", laptop, 1).await;

        let summary = fx.service.compute_order_summary("u1").await.unwrap();
        assert_eq!(summary.lines[0].product_id, mouse);
        assert_eq!(summary.lines[1].product_id, laptop);
    }

    #[tokio::test]
    async fn missing_product_line_is_dropped_without_error() {
        let fx = fixture();
        let laptop = seed_product(&fx, "Laptop", dec!(1200)).await;

        seed_cart_item(&fx, "u1", laptop, 1).await;
        seed_cart_item(&fx, "u1", Uuid::new_v4(), 5).await;

        let summary = fx.service.compute_order_summary("u1").await.unwrap();

        assert_eq!(summary.lines.len(), 1);
        assert_eq!(summary.lines[0].product_id, laptop);
        assert_eq!(summary.total, dec!(1200));
    }

    #[tokio::test]
    async fn cart_of_only_missing_products_yields_zero_lines() {
        let fx = fixture();

        seed_cart_item(&fx, "u1", Uuid::new_v4(), 1).await;
        seed_cart_item(&fx, "u1", Uuid::new_v4(), 2).await;

        // Cart items exist, so this is not the empty-cart case
        let summary = fx.service.compute_order_summary("u1").await.unwrap();
        assert!(summary.lines.is_empty());
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn empty_cart_is_an_error() {
        let fx = fixture();

        let err = fx.service.compute_order_summary("u2").await.unwrap_err();
        assert!(matches!(err, ServiceError::EmptyCart(user) if user == "u2"));
    }

    #[tokio::test]
    async fn total_tracks_fractional_prices_exactly() {
        let fx = fixture();
        let widget = seed_product(&fx, "Widget", dec!(0.10)).await;

        // 3 * 0.10 must be exactly 0.30, not a float approximation
        seed_cart_item(&fx, "u1", widget, 3).await;

        let summary = fx.service.compute_order_summary("u1").await.unwrap();
        assert_eq!(summary.total, dec!(0.30));
    }

    #[tokio::test]
    async fn summary_publishes_checkout_computed() {
        let mut fx = fixture();
        let laptop = seed_product(&fx, "Laptop", dec!(1200)).await;
        seed_cart_item(&fx, "u1", laptop, 2).await;

        fx.service.compute_order_summary("u1").await.unwrap();

        assert!(matches!(
            fx.rx.recv().await,
            Some(Event::CheckoutComputed { user_id, line_count: 1, total })
                if user_id == "u1" && total == dec!(2400)
        ));
    }

    #[tokio::test]
    async fn recomputing_is_deterministic_and_read_only() {
        let fx = fixture();
        let laptop = seed_product(&fx, "Laptop", dec!(1200)).await;
        seed_cart_item(&fx, "u1", laptop, 1).await;

        let first = fx.service.compute_order_summary("u1").await.unwrap();
        let second = fx.service.compute_order_summary("u1").await.unwrap();
        assert_eq!(first, second);

        // The cart itself is untouched by checkout
        let items = fx.carts.find_by_user("u1").await.unwrap();
        assert_eq!(items.len(), 1);
    }
}
