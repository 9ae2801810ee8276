pub mod accounts;
pub mod carts;
pub mod checkout;
pub mod common;
pub mod products;

use std::sync::Arc;

use crate::events::EventSender;
use crate::services::{AccountService, CartService, CatalogService, CheckoutService};
use crate::stores::{CartStore, CatalogStore, UserStore};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<CatalogService>,
    pub carts: Arc<CartService>,
    pub checkout: Arc<CheckoutService>,
    pub accounts: Arc<AccountService>,
}

impl AppServices {
    /// Wires every service to the shared stores and event channel.
    pub fn new(
        catalog_store: Arc<dyn CatalogStore>,
        cart_store: Arc<dyn CartStore>,
        user_store: Arc<dyn UserStore>,
        event_sender: Arc<EventSender>,
    ) -> Self {
        let catalog = Arc::new(CatalogService::new(
            catalog_store.clone(),
            event_sender.clone(),
        ));
        let carts = Arc::new(CartService::new(
            cart_store.clone(),
            catalog_store.clone(),
            event_sender.clone(),
        ));
        let checkout = Arc::new(CheckoutService::new(
            cart_store,
            catalog_store,
            event_sender.clone(),
        ));
        let accounts = Arc::new(AccountService::new(user_store, event_sender));

        Self {
            catalog,
            carts,
            checkout,
            accounts,
        }
    }
}
