use crate::error::BotError;
use crate::flow::{Delivery, Reply, Step, Transition};
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode, ReplyParameters};
use teloxide::{ApiError, RequestError};
use tracing::{error, warn};

pub mod callback;
pub mod command;
pub mod message;

/// Sends the outcome of a flow event. Errors turn into user text here and nowhere else.
///
/// `source` is the message a button belongs to, or the user's own message.
/// Returns the step the flow moved to, even if delivering its reply failed.
pub async fn respond(
    bot: &Bot,
    chat_id: ChatId,
    source: Option<&Message>,
    result: Result<Transition, BotError>,
) -> Result<Option<Step>, RequestError> {
    let transition = match result {
        Ok(t) => t,
        Err(e) => {
            report(bot, chat_id, &e).await?;
            return Ok(None);
        }
    };

    if let Err(e) = deliver(bot, chat_id, source, transition.reply).await {
        report(bot, chat_id, &BotError::from(e)).await?;
    }
    Ok(Some(transition.step))
}

pub async fn report(bot: &Bot, chat_id: ChatId, err: &BotError) -> Result<(), RequestError> {
    if err.is_validation() {
        warn!("Rejected input in chat {}: {}", chat_id, err);
    } else {
        error!("Handler failed in chat {}: {}", chat_id, err);
    }
    bot.send_message(chat_id, err.user_message()).await?;
    Ok(())
}

async fn deliver(
    bot: &Bot,
    chat_id: ChatId,
    source: Option<&Message>,
    reply: Reply,
) -> Result<(), RequestError> {
    let Reply {
        text,
        keyboard,
        delivery,
    } = reply;

    // the welcome photo has a caption, not text, and cannot be edited into a menu
    let editable = source.filter(|m| m.text().is_some());

    match (delivery, editable) {
        (Delivery::Photo(url), _) => {
            let mut req = bot
                .send_photo(chat_id, InputFile::url(url))
                .caption(text)
                .parse_mode(ParseMode::Html);
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
        (Delivery::Edit, Some(message)) => {
            let mut req = bot
                .edit_message_text(chat_id, message.id, text)
                .parse_mode(ParseMode::Html);
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            match req.await {
                Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => {}
                Err(e) => return Err(e),
            }
        }
        (delivery, _) => {
            let mut req = bot.send_message(chat_id, text).parse_mode(ParseMode::Html);
            if let (Delivery::Reply, Some(message)) = (delivery, source) {
                req = req.reply_parameters(ReplyParameters::new(message.id));
            }
            if let Some(kb) = keyboard {
                req = req.reply_markup(kb);
            }
            req.await?;
        }
    }
    Ok(())
}
