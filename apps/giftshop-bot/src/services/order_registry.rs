use crate::error::ValidationError;
use crate::models::order::Order;
use giftshop_shared::catalog::Category;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// In-memory map from user id to that user's single active order.
#[derive(Clone, Default)]
pub struct OrderRegistry {
    orders: Arc<RwLock<HashMap<u64, Order>>>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new order for `user_id`, replacing any previous one.
    pub async fn create(
        &self,
        user_id: u64,
        category: Category,
        amount: i64,
    ) -> Result<Order, ValidationError> {
        let amount = match u32::try_from(amount) {
            Ok(a) if a > 0 => a,
            _ => {
                warn!("Rejected order for user {} with amount {} USD", user_id, amount);
                return Err(ValidationError::InvalidAmount(amount.to_string()));
            }
        };

        let order = Order::new(user_id, category, amount);
        let mut orders = self.orders.write().await;
        if let Some(previous) = orders.insert(user_id, order.clone()) {
            info!(
                "Replacing order {} of user {}",
                previous.short_reference(),
                user_id
            );
        }
        info!(
            "Created order {}: user {}, category {}, amount {} USD",
            order.short_reference(),
            user_id,
            category,
            amount
        );
        Ok(order)
    }

    pub async fn get(&self, user_id: u64) -> Option<Order> {
        let order = self.orders.read().await.get(&user_id).cloned();
        if order.is_none() {
            warn!("No order found for user {}", user_id);
        }
        order
    }

    /// Removes and returns the order under a single write lock.
    pub async fn take(&self, user_id: u64) -> Option<Order> {
        let order = self.orders.write().await.remove(&user_id);
        match &order {
            Some(order) => {
                info!("Removed order {} of user {}", order.short_reference(), user_id);
            }
            None => warn!("Tried to remove a missing order of user {}", user_id),
        }
        order
    }

    /// Returns whether an order was removed.
    #[allow(dead_code)]
    pub async fn clear(&self, user_id: u64) -> bool {
        self.take(user_id).await.is_some()
    }
}
