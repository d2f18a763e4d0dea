use chrono::{DateTime, Utc};
use giftshop_shared::catalog::Category;
use uuid::Uuid;

/// The single pending purchase of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub user_id: u64,
    pub category: Category,
    /// USD face value.
    pub amount: u32,
    /// Shown to the user and the operator to match payment proof.
    pub reference: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(user_id: u64, category: Category, amount: u32) -> Self {
        Self {
            user_id,
            category,
            amount,
            reference: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    pub fn short_reference(&self) -> String {
        self.reference.simple().to_string()[..8].to_uppercase()
    }
}
