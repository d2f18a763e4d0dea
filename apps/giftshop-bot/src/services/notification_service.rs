use crate::models::order::Order;
use crate::models::payment::{Confirmation, PaymentProof};
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};
use teloxide::utils::html::escape;
use tracing::{info, warn};

/// Hands accepted payment proof over to the operator chat.
#[derive(Clone)]
pub struct NotificationService {
    bot: Bot,
    operator_chat: Option<ChatId>,
}

impl NotificationService {
    pub fn new(bot: Bot, operator_chat: Option<ChatId>) -> Self {
        Self { bot, operator_chat }
    }

    /// Failures are logged; the user's flow never depends on the operator chat.
    /// Returns whether the operator got the full notification.
    pub async fn notify_confirmation(
        &self,
        confirmation: &Confirmation,
        username: Option<&str>,
        source: (ChatId, MessageId),
    ) -> bool {
        let Some(operator) = self.operator_chat else {
            return false;
        };

        let text = self.format_confirmation(confirmation, username);
        if let Err(e) = self
            .bot
            .send_message(operator, text)
            .parse_mode(ParseMode::Html)
            .await
        {
            warn!(
                "Failed to notify operator about user {}: {}",
                confirmation.user_id, e
            );
            return false;
        }

        if let PaymentProof::Receipt(_) = confirmation.proof {
            let (chat, message) = source;
            if let Err(e) = self.bot.copy_message(operator, chat, message).await {
                warn!(
                    "Failed to copy receipt of user {} to operator: {}",
                    confirmation.user_id, e
                );
                return false;
            }
        }
        info!("Operator notified about payment of user {}", confirmation.user_id);
        true
    }

    /// Tells the user their order was closed by the operator.
    pub async fn notify_closed(&self, order: &Order) -> Result<(), teloxide::RequestError> {
        self.bot
            .send_message(
                ChatId(order.user_id as i64),
                format!(
                    "🎉 Payment for order <code>{}</code> ({}, {} USD) has been confirmed. Thank you!",
                    order.short_reference(),
                    order.category.title(),
                    order.amount
                ),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    fn format_confirmation(&self, confirmation: &Confirmation, username: Option<&str>) -> String {
        let who = match username {
            Some(name) => format!("@{} ({})", escape(name), confirmation.user_id),
            None => confirmation.user_id.to_string(),
        };
        let mut text = format!("💰 <b>Payment proof received</b>\n👤 User: {}\n", who);

        match &confirmation.order {
            Some(order) => text.push_str(&format!(
                "🧾 Order <code>{}</code>: {}, {} USD\n🕒 Created: {}\n",
                order.short_reference(),
                order.category.title(),
                order.amount,
                order.created_at.format("%Y-%m-%d %H:%M UTC")
            )),
            None => text.push_str("⚠️ No active order on record\n"),
        }

        match &confirmation.proof {
            PaymentProof::TransactionHash(hash) => {
                text.push_str(&format!("🔗 USDT hash: <code>{}</code>\n", escape(hash)))
            }
            PaymentProof::Receipt(attachment) => {
                text.push_str(&format!("📎 Card receipt ({}) follows\n", attachment.label()))
            }
        }
        text.push_str(&format!(
            "\nClose after checking: <code>/close {}</code>",
            confirmation.user_id
        ));
        text
    }
}
