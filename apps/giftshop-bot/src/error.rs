use giftshop_shared::catalog::Category;
use giftshop_shared::payment::PaymentMethod;
use thiserror::Error;

/// Input the bot refuses. Stored state is never changed when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown callback data `{0}`")]
    UnknownAction(String),
    #[error("unknown category `{0}`")]
    UnknownCategory(String),
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("amount {0} is not on the price ladder")]
    AmountNotOffered(i64),
    #[error("payment method `{0}` is not supported")]
    UnsupportedMethod(PaymentMethod),
    #[error("no active order")]
    NoActiveOrder,
    #[error("malformed transaction hash")]
    MalformedHash,
    #[error("not awaiting a transaction hash")]
    NotAwaitingHash,
    #[error("not awaiting a receipt")]
    NotAwaitingReceipt,
    #[error("receipt has no photo or document")]
    MissingAttachment,
    #[error("no input expected")]
    UnexpectedInput,
    #[error("command is restricted to the operator chat")]
    NotOperator,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::UnknownAction(_) => {
                "❌ This button is no longer valid. Send /start to begin again."
            }
            ValidationError::UnknownCategory(_) => "❌ This category is not available.",
            ValidationError::InvalidAmount(_) | ValidationError::AmountNotOffered(_) => {
                "❌ This amount is not available. Please choose one from the list."
            }
            ValidationError::UnsupportedMethod(_) => {
                "⚠️ This payment method is not supported yet. Please choose another one."
            }
            ValidationError::NoActiveOrder => {
                "❌ You have no active order. Choose a gift card and amount first."
            }
            ValidationError::MalformedHash => {
                "❌ Invalid hash format. Make sure it is the 64-character transaction hash."
            }
            ValidationError::NotAwaitingHash => {
                "❌ I am not expecting a transaction hash. Please follow the instructions."
            }
            ValidationError::NotAwaitingReceipt => {
                "❌ I am not expecting a receipt. Please follow the instructions."
            }
            ValidationError::MissingAttachment => {
                "❌ Invalid receipt format. Please send a screenshot or a file."
            }
            ValidationError::UnexpectedInput => "ℹ️ Use the menu buttons or send /start to begin.",
            ValidationError::NotOperator => "❌ This command is not available here.",
        }
    }
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to load instruction for {category}: {source}")]
    Instruction {
        category: Category,
        #[source]
        source: std::io::Error,
    },
    #[error("telegram request failed: {0}")]
    Transport(#[from] teloxide::RequestError),
}

impl BotError {
    /// The only place errors become user-facing text.
    pub fn user_message(&self) -> &'static str {
        match self {
            BotError::Validation(e) => e.user_message(),
            BotError::Instruction { .. } => {
                "❌ Failed to load the instruction. Please contact support."
            }
            BotError::Transport(_) => "❌ An error occurred. Please try again.",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, BotError::Validation(_))
    }
}
