use crate::bot::routing::Action;
use crate::config::BotConfig;
use crate::error::{BotError, ValidationError};
use crate::models::order::Order;
use crate::models::payment::{is_valid_transaction_hash, Attachment, Confirmation, PaymentProof};
use crate::models::session::ConversationState;
use crate::services::instruction_service::InstructionService;
use crate::services::order_registry::OrderRegistry;
use crate::services::session_store::SessionStore;
use giftshop_shared::catalog::{is_offered_amount, Category};
use giftshop_shared::payment::PaymentMethod;
use std::sync::Arc;
use teloxide::types::{ChatId, InlineKeyboardMarkup};
use tracing::info;
use url::Url;

pub mod screens;

/// Where the conversation lands after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Menu,
    CategoryList,
    InstructionShown(Category),
    AmountList(Category),
    PaymentMethod(Order),
    AwaitingUsdtHash,
    AwaitingCardReceipt,
    Confirmed(Confirmation),
    Support,
}

/// How a reply reaches the chat.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    /// Photo with the text as caption.
    Photo(Url),
    Send,
    /// Replace the message the button belongs to; sends a new one if it has no text.
    Edit,
    /// Quote the user's message.
    Reply,
}

/// Transport-independent reply. Text is HTML.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
    pub delivery: Delivery,
}

impl Reply {
    pub fn new(text: impl Into<String>, delivery: Delivery) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            delivery,
        }
    }

    pub fn with_keyboard(mut self, keyboard: InlineKeyboardMarkup) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub step: Step,
    pub reply: Reply,
}

impl Transition {
    fn new(step: Step, reply: Reply) -> Self {
        Self { step, reply }
    }
}

/// Drives the purchase conversation: decides the next step for an event and
/// keeps the order registry and the conversation state in sync with it.
#[derive(Clone)]
pub struct FlowController {
    config: Arc<BotConfig>,
    orders: OrderRegistry,
    sessions: SessionStore,
    instructions: InstructionService,
}

impl FlowController {
    pub fn new(config: Arc<BotConfig>) -> Self {
        let instructions = InstructionService::new(config.instructions_dir.clone());
        Self {
            config,
            orders: OrderRegistry::new(),
            sessions: SessionStore::new(),
            instructions,
        }
    }

    #[cfg(test)]
    pub fn orders(&self) -> &OrderRegistry {
        &self.orders
    }

    #[cfg(test)]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// `/start`: forget any pending payment step. Orders are left alone.
    pub async fn start(&self, user_id: u64) -> Transition {
        self.sessions.reset(user_id).await;
        Transition::new(Step::Menu, screens::welcome(&self.config))
    }

    pub async fn handle_action(&self, user_id: u64, action: Action) -> Result<Transition, BotError> {
        let transition = match action {
            Action::Menu => Transition::new(Step::Menu, screens::welcome(&self.config)),
            Action::Buy | Action::Back => Transition::new(Step::CategoryList, screens::categories()),
            Action::Support => Transition::new(Step::Support, screens::support(&self.config)),
            Action::Category(category) => Transition::new(
                Step::InstructionShown(category),
                screens::instruction_menu(category),
            ),
            Action::ShowInstruction(category) => {
                let text = self
                    .instructions
                    .load(category)
                    .await
                    .map_err(|source| BotError::Instruction { category, source })?;
                Transition::new(
                    Step::InstructionShown(category),
                    screens::instruction(category, text.as_deref()),
                )
            }
            Action::Confirm(category) => {
                Transition::new(Step::AmountList(category), screens::amounts(category))
            }
            Action::Amount(category, amount) => {
                if amount > 0 && !is_offered_amount(amount) {
                    return Err(ValidationError::AmountNotOffered(amount).into());
                }
                let order = self.orders.create(user_id, category, amount).await?;
                let reply = screens::payment_methods(&order);
                Transition::new(Step::PaymentMethod(order), reply)
            }
            Action::Pay(method) => self.choose_payment_method(user_id, method).await?,
            Action::Paid(method) => self.payment_sent(user_id, method).await?,
        };
        Ok(transition)
    }

    async fn choose_payment_method(
        &self,
        user_id: u64,
        method: PaymentMethod,
    ) -> Result<Transition, BotError> {
        if !method.is_supported() {
            return Err(ValidationError::UnsupportedMethod(method).into());
        }
        let order = self
            .orders
            .get(user_id)
            .await
            .ok_or(ValidationError::NoActiveOrder)?;

        info!(
            "User {} chose {} for order {}",
            user_id,
            method,
            order.short_reference()
        );
        let transition = match method {
            PaymentMethod::Usdt => {
                self.sessions
                    .set(user_id, ConversationState::AwaitingTransactionHash)
                    .await;
                Transition::new(
                    Step::AwaitingUsdtHash,
                    screens::usdt_details(&self.config, &order),
                )
            }
            _ => {
                self.sessions
                    .set(user_id, ConversationState::AwaitingCardReceipt)
                    .await;
                Transition::new(
                    Step::AwaitingCardReceipt,
                    screens::card_details(&self.config, &order),
                )
            }
        };
        Ok(transition)
    }

    /// "I have paid": only valid while the matching proof is expected.
    async fn payment_sent(
        &self,
        user_id: u64,
        method: PaymentMethod,
    ) -> Result<Transition, BotError> {
        let state = self.sessions.get(user_id).await;
        match method {
            PaymentMethod::Usdt if state == ConversationState::AwaitingTransactionHash => Ok(
                Transition::new(Step::AwaitingUsdtHash, screens::hash_prompt()),
            ),
            PaymentMethod::Usdt => Err(ValidationError::NotAwaitingHash.into()),
            PaymentMethod::Card if state == ConversationState::AwaitingCardReceipt => Ok(
                Transition::new(Step::AwaitingCardReceipt, screens::receipt_prompt()),
            ),
            PaymentMethod::Card => Err(ValidationError::NotAwaitingReceipt.into()),
            other => Err(ValidationError::UnsupportedMethod(other).into()),
        }
    }

    pub async fn submit_text(&self, user_id: u64, text: &str) -> Result<Transition, BotError> {
        match self.sessions.get(user_id).await {
            ConversationState::AwaitingTransactionHash => {
                let hash = text.trim();
                info!("Received hash from user {}: {}", user_id, hash);
                if !is_valid_transaction_hash(hash) {
                    return Err(ValidationError::MalformedHash.into());
                }
                self.confirm(
                    user_id,
                    ConversationState::AwaitingTransactionHash,
                    PaymentProof::TransactionHash(hash.to_string()),
                )
                .await
            }
            ConversationState::AwaitingCardReceipt => {
                Err(ValidationError::MissingAttachment.into())
            }
            ConversationState::Idle => Err(ValidationError::UnexpectedInput.into()),
        }
    }

    /// Any non-text message; `attachment` is `None` for stickers, voice and the like.
    pub async fn submit_attachment(
        &self,
        user_id: u64,
        attachment: Option<Attachment>,
    ) -> Result<Transition, BotError> {
        let state = self.sessions.get(user_id).await;
        match (state, attachment) {
            (ConversationState::AwaitingCardReceipt, Some(attachment)) => {
                info!("User {} sent a receipt as a {}", user_id, attachment.label());
                self.confirm(
                    user_id,
                    ConversationState::AwaitingCardReceipt,
                    PaymentProof::Receipt(attachment),
                )
                .await
            }
            (ConversationState::AwaitingCardReceipt, None) => {
                Err(ValidationError::MissingAttachment.into())
            }
            (ConversationState::AwaitingTransactionHash, None) => {
                Err(ValidationError::MalformedHash.into())
            }
            (_, Some(_)) => Err(ValidationError::NotAwaitingReceipt.into()),
            (ConversationState::Idle, None) => Err(ValidationError::UnexpectedInput.into()),
        }
    }

    async fn confirm(
        &self,
        user_id: u64,
        expected: ConversationState,
        proof: PaymentProof,
    ) -> Result<Transition, BotError> {
        if !self.sessions.take_if(user_id, expected).await {
            // a concurrent submission got there first
            return Err(match expected {
                ConversationState::AwaitingCardReceipt => ValidationError::NotAwaitingReceipt,
                _ => ValidationError::NotAwaitingHash,
            }
            .into());
        }

        let confirmation = Confirmation {
            user_id,
            proof,
            order: self.orders.get(user_id).await,
        };
        info!("Payment proof of user {} accepted", user_id);
        let reply = screens::confirmed(&confirmation);
        Ok(Transition::new(Step::Confirmed(confirmation), reply))
    }

    /// Operator closes a checked order, removing it from the registry.
    pub async fn close_order(&self, from_chat: ChatId, user_id: u64) -> Result<Order, BotError> {
        if self.config.operator_chat_id != Some(from_chat) {
            return Err(ValidationError::NotOperator.into());
        }
        let order = self
            .orders
            .take(user_id)
            .await
            .ok_or(ValidationError::NoActiveOrder)?;
        info!(
            "Operator closed order {} of user {}",
            order.short_reference(),
            user_id
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::keyboards::callback_data;
    use uuid::Uuid;

    const USER: u64 = 42;

    fn controller() -> FlowController {
        FlowController::new(Arc::new(BotConfig::sample()))
    }

    fn hash() -> String {
        "0123456789abcdef".repeat(4)
    }

    async fn act(flow: &FlowController, data: &str) -> Result<Transition, BotError> {
        let action: Action = data.parse()?;
        flow.handle_action(USER, action).await
    }

    fn validation(result: Result<Transition, BotError>) -> ValidationError {
        match result {
            Err(BotError::Validation(e)) => e,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_full_usdt_purchase() {
        let flow = controller();

        let t = flow.start(USER).await;
        assert_eq!(t.step, Step::Menu);
        assert_eq!(t.reply.delivery, Delivery::Send);

        let t = act(&flow, "buy").await.unwrap();
        assert_eq!(t.step, Step::CategoryList);

        let t = act(&flow, "category:steam").await.unwrap();
        assert_eq!(t.step, Step::InstructionShown(Category::Steam));

        let t = act(&flow, "confirm:steam").await.unwrap();
        assert_eq!(t.step, Step::AmountList(Category::Steam));

        let t = act(&flow, "amount:steam:50").await.unwrap();
        let order = flow.orders().get(USER).await.unwrap();
        assert_eq!((order.category, order.amount), (Category::Steam, 50));
        assert_eq!(t.step, Step::PaymentMethod(order.clone()));
        assert!(t.reply.text.contains(&order.short_reference()));

        let t = act(&flow, "pay:usdt").await.unwrap();
        assert_eq!(t.step, Step::AwaitingUsdtHash);
        assert!(t.reply.text.contains("TTestWalletAddress123"));
        assert_eq!(
            flow.sessions().get(USER).await,
            ConversationState::AwaitingTransactionHash
        );

        let t = act(&flow, "paid:usdt").await.unwrap();
        assert_eq!(t.step, Step::AwaitingUsdtHash);

        let t = flow.submit_text(USER, &hash()).await.unwrap();
        assert_eq!(
            t.step,
            Step::Confirmed(Confirmation {
                user_id: USER,
                proof: PaymentProof::TransactionHash(hash()),
                order: Some(order),
            })
        );
        assert_eq!(t.reply.delivery, Delivery::Reply);
        assert!(t.reply.text.contains("accepted"));
        assert_eq!(flow.sessions().get(USER).await, ConversationState::Idle);
        // the order stays until an operator closes it
        assert!(flow.orders().get(USER).await.is_some());
    }

    #[tokio::test]
    async fn test_short_hash_is_rejected_and_can_be_resubmitted() {
        let flow = controller();
        act(&flow, "amount:steam:50").await.unwrap();
        act(&flow, "pay:usdt").await.unwrap();

        let short = &hash()[..63];
        assert_eq!(
            validation(flow.submit_text(USER, short).await),
            ValidationError::MalformedHash
        );
        assert_eq!(
            flow.sessions().get(USER).await,
            ConversationState::AwaitingTransactionHash
        );

        let t = flow.submit_text(USER, &hash()).await.unwrap();
        assert!(matches!(t.step, Step::Confirmed(_)));
    }

    #[tokio::test]
    async fn test_hash_validation_leaves_state_unchanged() {
        let flow = controller();
        act(&flow, "amount:xbox:100").await.unwrap();
        act(&flow, "pay:usdt").await.unwrap();

        let bad = [
            hash().to_uppercase(),
            format!("0x{}", &hash()[2..]),
            format!("{}0", hash()),
            hash().replace('a', "g"),
            String::new(),
        ];
        for candidate in &bad {
            assert_eq!(
                validation(flow.submit_text(USER, candidate).await),
                ValidationError::MalformedHash
            );
            assert_eq!(
                flow.sessions().get(USER).await,
                ConversationState::AwaitingTransactionHash
            );
        }

        // surrounding whitespace is trimmed like any pasted text
        let t = flow
            .submit_text(USER, &format!("  {}\n", hash()))
            .await
            .unwrap();
        assert!(matches!(t.step, Step::Confirmed(_)));
    }

    #[tokio::test]
    async fn test_card_receipt() {
        let flow = controller();
        act(&flow, "amount:amazon:25").await.unwrap();

        let t = act(&flow, "pay:card").await.unwrap();
        assert_eq!(t.step, Step::AwaitingCardReceipt);
        assert!(t.reply.text.contains("2200 0000"));

        // text is not a receipt
        assert_eq!(
            validation(flow.submit_text(USER, "I paid").await),
            ValidationError::MissingAttachment
        );
        assert_eq!(
            validation(flow.submit_attachment(USER, None).await),
            ValidationError::MissingAttachment
        );
        assert_eq!(
            flow.sessions().get(USER).await,
            ConversationState::AwaitingCardReceipt
        );

        let t = flow
            .submit_attachment(USER, Some(Attachment::Document))
            .await
            .unwrap();
        match t.step {
            Step::Confirmed(c) => {
                assert_eq!(c.proof, PaymentProof::Receipt(Attachment::Document));
                assert_eq!(c.order.map(|o| o.amount), Some(25));
            }
            other => panic!("unexpected step {:?}", other),
        }
        assert_eq!(flow.sessions().get(USER).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_receipt_outside_card_state_is_rejected() {
        let flow = controller();
        assert_eq!(
            validation(flow.submit_attachment(USER, Some(Attachment::Photo)).await),
            ValidationError::NotAwaitingReceipt
        );

        act(&flow, "amount:steam:50").await.unwrap();
        act(&flow, "pay:usdt").await.unwrap();
        assert_eq!(
            validation(flow.submit_attachment(USER, Some(Attachment::Photo)).await),
            ValidationError::NotAwaitingReceipt
        );
        assert_eq!(
            flow.sessions().get(USER).await,
            ConversationState::AwaitingTransactionHash
        );
    }

    #[tokio::test]
    async fn test_input_while_idle() {
        let flow = controller();
        assert_eq!(
            validation(flow.submit_text(USER, &hash()).await),
            ValidationError::UnexpectedInput
        );
        assert_eq!(
            validation(flow.submit_attachment(USER, None).await),
            ValidationError::UnexpectedInput
        );
        assert_eq!(
            validation(act(&flow, "paid:usdt").await),
            ValidationError::NotAwaitingHash
        );
        assert_eq!(
            validation(act(&flow, "paid:card").await),
            ValidationError::NotAwaitingReceipt
        );
        assert_eq!(flow.sessions().get(USER).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_start_resets_state_but_keeps_order() {
        let flow = controller();
        act(&flow, "amount:netflix:15").await.unwrap();
        act(&flow, "pay:usdt").await.unwrap();
        let before = flow.orders().get(USER).await;

        let t = flow.start(USER).await;
        assert_eq!(t.step, Step::Menu);
        assert_eq!(flow.sessions().get(USER).await, ConversationState::Idle);
        assert_eq!(flow.orders().get(USER).await, before);
    }

    #[tokio::test]
    async fn test_bad_amounts_store_nothing() {
        let flow = controller();
        for data in ["amount:steam:0", "amount:steam:-50", "amount:steam:abc"] {
            let err = validation(act(&flow, data).await);
            assert!(matches!(err, ValidationError::InvalidAmount(_)), "{}", data);
        }
        assert_eq!(
            validation(act(&flow, "amount:steam:51").await),
            ValidationError::AmountNotOffered(51)
        );
        assert!(flow.orders().get(USER).await.is_none());
    }

    #[tokio::test]
    async fn test_payment_requires_order_and_supported_method() {
        let flow = controller();
        assert_eq!(
            validation(act(&flow, "pay:usdt").await),
            ValidationError::NoActiveOrder
        );

        act(&flow, "amount:spotify:5").await.unwrap();
        for data in ["pay:sbp", "pay:sbp_qr"] {
            assert!(matches!(
                validation(act(&flow, data).await),
                ValidationError::UnsupportedMethod(_)
            ));
        }
        assert_eq!(flow.sessions().get(USER).await, ConversationState::Idle);
    }

    #[tokio::test]
    async fn test_switching_method_replaces_waiting_state() {
        let flow = controller();
        act(&flow, "amount:ea:200").await.unwrap();
        act(&flow, "pay:usdt").await.unwrap();
        act(&flow, "pay:card").await.unwrap();

        assert_eq!(
            flow.sessions().get(USER).await,
            ConversationState::AwaitingCardReceipt
        );
        assert_eq!(
            validation(flow.submit_text(USER, &hash()).await),
            ValidationError::MissingAttachment
        );
    }

    #[tokio::test]
    async fn test_menus() {
        let flow = controller();

        let t = act(&flow, "back").await.unwrap();
        assert_eq!(t.step, Step::CategoryList);
        assert_eq!(t.reply.delivery, Delivery::Edit);
        assert_eq!(callback_data(t.reply.keyboard.as_ref().unwrap()).len(), 10);

        let t = act(&flow, "support").await.unwrap();
        assert_eq!(t.step, Step::Support);
        assert!(t.reply.text.contains("@support_bot"));

        let t = act(&flow, "menu").await.unwrap();
        assert_eq!(t.step, Step::Menu);
    }

    #[tokio::test]
    async fn test_welcome_photo_when_configured() {
        let mut config = BotConfig::sample();
        config.welcome_image_url = Some(Url::parse("https://example.com/w.png").unwrap());
        let flow = FlowController::new(Arc::new(config));

        let t = flow.start(USER).await;
        assert!(matches!(t.reply.delivery, Delivery::Photo(_)));
        assert!(t.reply.text.contains("PlayStation Store"));
    }

    #[tokio::test]
    async fn test_show_instruction() {
        let dir = std::env::temp_dir().join(format!("giftshop-flow-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("xbox.txt"), "Redeem at <xbox.com/redeem>")
            .await
            .unwrap();

        let mut config = BotConfig::sample();
        config.instructions_dir = dir.clone();
        let flow = FlowController::new(Arc::new(config));

        let t = act(&flow, "show_instruction:xbox").await.unwrap();
        assert_eq!(t.step, Step::InstructionShown(Category::Xbox));
        assert!(t.reply.text.contains("&lt;xbox.com/redeem&gt;"));
        assert!(callback_data(t.reply.keyboard.as_ref().unwrap())
            .contains(&"confirm:xbox".to_string()));

        let t = act(&flow, "show_instruction:steam").await.unwrap();
        assert!(t.reply.text.contains("not available yet"));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_close_order() {
        let mut config = BotConfig::sample();
        config.operator_chat_id = Some(ChatId(-100));
        let flow = FlowController::new(Arc::new(config));
        act(&flow, "amount:binance:500").await.unwrap();

        assert_eq!(
            match flow.close_order(ChatId(USER as i64), USER).await {
                Err(BotError::Validation(e)) => e,
                other => panic!("unexpected {:?}", other),
            },
            ValidationError::NotOperator
        );
        assert!(flow.orders().get(USER).await.is_some());

        let order = flow.close_order(ChatId(-100), USER).await.unwrap();
        assert_eq!(order.amount, 500);
        assert!(flow.orders().get(USER).await.is_none());
        assert!(flow.close_order(ChatId(-100), USER).await.is_err());
    }

    #[tokio::test]
    async fn test_close_order_removes_the_latest_order() {
        let mut config = BotConfig::sample();
        config.operator_chat_id = Some(ChatId(-100));
        let flow = FlowController::new(Arc::new(config));
        act(&flow, "amount:steam:50").await.unwrap();
        act(&flow, "amount:xbox:100").await.unwrap();
        let latest = flow.orders().get(USER).await.unwrap();

        let closed = flow.close_order(ChatId(-100), USER).await.unwrap();
        assert_eq!(closed, latest);
        assert!(flow.orders().get(USER).await.is_none());
    }
}
