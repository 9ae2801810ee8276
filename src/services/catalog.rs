use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::ProductModel;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::stores::CatalogStore;

/// Product catalog service.
///
/// Products are insert-only in this service: no update or delete.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
    event_sender: Arc<EventSender>,
}

/// Input for creating a product
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub stock: i32,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            catalog,
            event_sender,
        }
    }

    /// Creates a new product with a generated id.
    ///
    /// Publishes a `ProductCreated` event upon success.
    #[instrument(skip(self))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<ProductModel, ServiceError> {
        let product = ProductModel {
            id: Uuid::new_v4(),
            name: input.name,
            description: input.description,
            price: input.price,
            image: input.image,
            stock: input.stock,
            created_at: Utc::now(),
        };

        let product_id = self.catalog.insert(product.clone()).await?;

        self.event_sender
            .send_or_log(Event::ProductCreated(product_id))
            .await;

        info!("Created product: {}", product_id);
        Ok(product)
    }

    /// Fetches a single product by id.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<ProductModel, ServiceError> {
        self.catalog
            .find(id)
            .await?
            .ok_or(ServiceError::ProductNotFound(id))
    }

    /// Returns the full catalog.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(self.catalog.find_all().await?)
    }
}
