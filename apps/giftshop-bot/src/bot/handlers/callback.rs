use super::respond;
use crate::bot::routing::Action;
use crate::error::BotError;
use crate::AppState;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::{info, warn};

pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    info!("Received callback from {}: {:?}", q.from.id, q.data);
    let user_id = q.from.id.0;

    // stop the button spinner first, whatever happens next
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        warn!("Failed to answer callback query: {}", e);
    }

    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };

    let result = match data.parse::<Action>() {
        Ok(action) => state.flow.handle_action(user_id, action).await,
        Err(e) => Err(BotError::from(e)),
    };
    respond(&bot, message.chat().id, message.regular_message(), result).await?;
    Ok(())
}
