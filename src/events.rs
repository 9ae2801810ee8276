/*!
 * # Events
 *
 * Lightweight event bus over a tokio mpsc channel. Services publish
 * domain events; a background loop consumes and logs them.
 */

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ProductCreated(Uuid),
    UserRegistered(Uuid),
    CartItemAdded {
        user_id: String,
        product_id: Uuid,
        quantity: i32,
    },
    CheckoutComputed {
        user_id: String,
        line_count: usize,
        total: Decimal,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the receiver is gone.
    /// Event delivery is best effort and never blocks the request path.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event dropped: {}", e);
        }
    }
}

/// Consumes events from the channel until all senders are dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::ProductCreated(product_id) => {
                info!("Product created: {}", product_id);
            }
            Event::UserRegistered(user_id) => {
                info!("User registered: {}", user_id);
            }
            Event::CartItemAdded {
                user_id,
                product_id,
                quantity,
            } => {
                info!(
                    "Cart item added: user={}, product={}, quantity={}",
                    user_id, product_id, quantity
                );
            }
            Event::CheckoutComputed {
                user_id,
                line_count,
                total,
            } => {
                info!(
                    "Checkout computed: user={}, lines={}, total={}",
                    user_id, line_count, total
                );
            }
        }
    }

    warn!("Event processing loop has ended");
}
