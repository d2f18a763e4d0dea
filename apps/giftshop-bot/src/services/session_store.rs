use crate::models::session::ConversationState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Per-user conversation state. Idle users have no entry.
#[derive(Clone, Default)]
pub struct SessionStore {
    states: Arc<RwLock<HashMap<u64, ConversationState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: u64) -> ConversationState {
        self.states
            .read()
            .await
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    pub async fn set(&self, user_id: u64, state: ConversationState) {
        let mut states = self.states.write().await;
        if state.is_idle() {
            states.remove(&user_id);
        } else {
            states.insert(user_id, state);
        }
        debug!("User {} conversation state: {:?}", user_id, state);
    }

    pub async fn reset(&self, user_id: u64) {
        self.set(user_id, ConversationState::Idle).await;
    }

    /// Clears the state only if it is `expected`, under one write lock.
    /// Two racing proof submissions cannot both see the waiting state.
    pub async fn take_if(&self, user_id: u64, expected: ConversationState) -> bool {
        let mut states = self.states.write().await;
        let current = states.get(&user_id).copied().unwrap_or_default();
        if current != expected {
            return false;
        }
        states.remove(&user_id);
        debug!("User {} left state {:?}", user_id, expected);
        true
    }
}
