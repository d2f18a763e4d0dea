use super::order::Order;

/// File attached to an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Photo,
    Document,
}

impl Attachment {
    pub fn label(self) -> &'static str {
        match self {
            Attachment::Photo => "photo",
            Attachment::Document => "document",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentProof {
    TransactionHash(String),
    Receipt(Attachment),
}

/// Proof accepted from a user, waiting for an operator to check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub user_id: u64,
    pub proof: PaymentProof,
    pub order: Option<Order>,
}

/// Format check only; the hash is never looked up on chain.
pub fn is_valid_transaction_hash(hash: &str) -> bool {
    hash.len() == 64 && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
