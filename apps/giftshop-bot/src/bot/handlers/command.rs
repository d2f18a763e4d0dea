use super::{report, respond};
use crate::bot::routing::Command;
use crate::error::{BotError, ValidationError};
use crate::AppState;
use teloxide::prelude::*;
use tracing::{info, warn};

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    match cmd {
        Command::Start => {
            let Some(user) = msg.from.as_ref() else {
                return Ok(());
            };
            info!("User {} executed /start command", user.id);
            let transition = state.flow.start(user.id.0).await;
            respond(&bot, msg.chat.id, Some(&msg), Ok(transition)).await?;
        }

        Command::Close(user_id) => match state.flow.close_order(msg.chat.id, user_id).await {
            Ok(order) => {
                if let Err(e) = state.notifications.notify_closed(&order).await {
                    warn!("Failed to tell user {} about the closed order: {}", user_id, e);
                }
                bot.send_message(
                    msg.chat.id,
                    format!(
                        "✅ Order {} of user {} closed.",
                        order.short_reference(),
                        user_id
                    ),
                )
                .await?;
            }
            Err(BotError::Validation(ValidationError::NoActiveOrder)) => {
                bot.send_message(
                    msg.chat.id,
                    format!("ℹ️ User {} has no open order.", user_id),
                )
                .await?;
            }
            Err(e) => report(&bot, msg.chat.id, &e).await?,
        },
    }
    Ok(())
}
