use super::respond;
use crate::flow::Step;
use crate::models::payment::Attachment;
use crate::AppState;
use teloxide::prelude::*;
use tracing::info;

/// Everything that is not a command: transaction hashes, receipts, stray input.
pub async fn message_handler(
    bot: Bot,
    msg: Message,
    state: AppState,
) -> Result<(), teloxide::RequestError> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0;
    info!("Received message from {}: {:?}", user_id, msg.text());

    let result = match msg.text() {
        Some(text) => state.flow.submit_text(user_id, text).await,
        None => state.flow.submit_attachment(user_id, attachment_of(&msg)).await,
    };

    if let Some(Step::Confirmed(confirmation)) =
        respond(&bot, msg.chat.id, Some(&msg), result).await?
    {
        state
            .notifications
            .notify_confirmation(&confirmation, user.username.as_deref(), (msg.chat.id, msg.id))
            .await;
    }
    Ok(())
}

fn attachment_of(msg: &Message) -> Option<Attachment> {
    if msg.photo().is_some() {
        Some(Attachment::Photo)
    } else if msg.document().is_some() {
        Some(Attachment::Document)
    } else {
        None
    }
}
