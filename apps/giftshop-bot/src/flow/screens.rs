use super::{Delivery, Reply};
use crate::bot::keyboards;
use crate::config::BotConfig;
use crate::models::order::Order;
use crate::models::payment::{Confirmation, PaymentProof};
use giftshop_shared::catalog::Category;
use giftshop_shared::payment::PaymentMethod;
use teloxide::utils::html::escape;

pub fn welcome(config: &BotConfig) -> Reply {
    let mut text = String::from(
        "👋 <b>Welcome to our gift-code shop!</b>\n\n💳 You can buy codes for:\n",
    );
    for category in Category::ALL {
        text.push_str(&format!("• {}\n", category.title()));
    }
    text.push_str("\n💡 Reliable, fast and convenient!\n\n👇 Choose an action below:");

    let delivery = match &config.welcome_image_url {
        Some(url) => Delivery::Photo(url.clone()),
        None => Delivery::Send,
    };
    Reply::new(text, delivery).with_keyboard(keyboards::main_menu())
}

pub fn categories() -> Reply {
    Reply::new("🎁 Choose a category:", Delivery::Edit).with_keyboard(keyboards::categories())
}

pub fn instruction_menu(category: Category) -> Reply {
    Reply::new(
        format!(
            "Category: <b>{}</b>.\n\nPlease read the activation instruction before continuing.",
            category.title()
        ),
        Delivery::Edit,
    )
    .with_keyboard(keyboards::instruction_menu(category))
}

pub fn instruction(category: Category, text: Option<&str>) -> Reply {
    let body = match text {
        Some(text) => format!(
            "📄 Activation instruction for <b>{}</b>\n\n{}",
            category.title(),
            escape(text.trim())
        ),
        None => "⚠️ The instruction for this category is not available yet.".to_string(),
    };
    Reply::new(body, Delivery::Send).with_keyboard(keyboards::after_instruction(category))
}

pub fn amounts(category: Category) -> Reply {
    Reply::new(
        format!(
            "Category: <b>{}</b>.\n\nChoose the purchase amount:",
            category.title()
        ),
        Delivery::Edit,
    )
    .with_keyboard(keyboards::amounts(category))
}

pub fn payment_methods(order: &Order) -> Reply {
    Reply::new(
        format!(
            "🧾 Order <code>{}</code>\n🎁 {}\n💵 Amount: {} USD\n\n👇 Choose a payment method:",
            order.short_reference(),
            order.category.title(),
            order.amount
        ),
        Delivery::Edit,
    )
    .with_keyboard(keyboards::payment_methods())
}

pub fn usdt_details(config: &BotConfig, order: &Order) -> Reply {
    Reply::new(
        format!(
            "💵 <b>USDT (TRC20) payment</b>\n\n\
            Wallet address: <code>{}</code>\n\
            Amount: {} USD\n\n\
            📌 Send the funds over the <b>TRC20</b> network only and account for the transfer fee.\n\n\
            After the transfer, send the transaction hash here.",
            escape(&config.usdt_wallet_address),
            order.amount
        ),
        Delivery::Edit,
    )
    .with_keyboard(keyboards::paid(PaymentMethod::Usdt))
}

pub fn card_details(config: &BotConfig, order: &Order) -> Reply {
    Reply::new(
        format!(
            "💳 <b>Card transfer</b>\n\n{}\nAmount: {} USD\n\n\
            📌 After the transfer, send a screenshot or a file of the receipt here.",
            escape(&config.card_details),
            order.amount
        ),
        Delivery::Edit,
    )
    .with_keyboard(keyboards::paid(PaymentMethod::Card))
}

pub fn hash_prompt() -> Reply {
    Reply::new(
        "📝 Please send the 64-character transaction hash as a message.",
        Delivery::Send,
    )
}

pub fn receipt_prompt() -> Reply {
    Reply::new(
        "📄 Please send the payment receipt (a screenshot or a file).",
        Delivery::Send,
    )
}

pub fn confirmed(confirmation: &Confirmation) -> Reply {
    let mut text = match confirmation.proof {
        PaymentProof::TransactionHash(_) => {
            "✅ Your hash has been accepted! Wait for the operator to confirm the transaction."
                .to_string()
        }
        PaymentProof::Receipt(_) => "✅ Your receipt has been accepted. Wait for the payment \
            confirmation, it can take up to 10 minutes."
            .to_string(),
    };
    if let Some(order) = &confirmation.order {
        text.push_str(&format!(
            "\n\n🧾 Order <code>{}</code>: {}, {} USD",
            order.short_reference(),
            order.category.title(),
            order.amount
        ));
    }
    Reply::new(text, Delivery::Reply)
}

pub fn support(config: &BotConfig) -> Reply {
    Reply::new(
        format!(
            "📧 If you have any questions, contact us:\n✉️ Email: {}\n📞 Telegram: {}",
            escape(&config.support_email),
            escape(&config.support_telegram)
        ),
        Delivery::Edit,
    )
    .with_keyboard(keyboards::support())
}
