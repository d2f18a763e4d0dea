/// Which kind of payment proof, if any, the bot is waiting for from a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingTransactionHash,
    AwaitingCardReceipt,
}

impl ConversationState {
    pub fn is_idle(self) -> bool {
        self == ConversationState::Idle
    }
}
