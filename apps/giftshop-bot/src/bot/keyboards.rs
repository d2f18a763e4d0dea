use crate::bot::routing::Action;
use giftshop_shared::catalog::{Category, PRICE_LADDER};
use giftshop_shared::payment::PaymentMethod;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

fn button(text: impl Into<String>, action: Action) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.callback_data())
}

fn back_to_categories() -> Vec<InlineKeyboardButton> {
    vec![button("⬅️ Back", Action::Back)]
}

pub fn main_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("🎁 Buy a gift code", Action::Buy)],
        vec![button("🛠 Support", Action::Support)],
    ])
}

pub fn categories() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = Category::ALL
        .into_iter()
        .map(|c| vec![button(c.title(), Action::Category(c))])
        .collect();
    rows.push(vec![button("⬅️ Main menu", Action::Menu)]);
    InlineKeyboardMarkup::new(rows)
}

pub fn instruction_menu(category: Category) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button(
            "📖 Activation instruction",
            Action::ShowInstruction(category),
        )],
        vec![button("✅ I have read the instruction", Action::Confirm(category))],
        back_to_categories(),
    ])
}

pub fn after_instruction(category: Category) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("✅ I have read the instruction", Action::Confirm(category))],
        back_to_categories(),
    ])
}

pub fn amounts(category: Category) -> InlineKeyboardMarkup {
    let mut grid = Vec::new();

    let mut row = Vec::new();
    for (i, amount) in PRICE_LADDER.iter().enumerate() {
        row.push(button(
            format!("{} USD", amount),
            Action::Amount(category, i64::from(*amount)),
        ));
        if (i + 1) % 3 == 0 {
            grid.push(row);
            row = Vec::new();
        }
    }
    if !row.is_empty() {
        grid.push(row);
    }
    grid.push(back_to_categories());

    InlineKeyboardMarkup::new(grid)
}

pub fn payment_methods() -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = PaymentMethod::ALL
        .into_iter()
        .map(|m| vec![button(m.label(), Action::Pay(m))])
        .collect();
    rows.push(back_to_categories());
    InlineKeyboardMarkup::new(rows)
}

pub fn paid(method: PaymentMethod) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![button("✅ I have paid", Action::Paid(method))],
        back_to_categories(),
    ])
}

pub fn support() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![button("⬅️ Main menu", Action::Menu)]])
}

#[cfg(test)]
pub(crate) fn callback_data(markup: &InlineKeyboardMarkup) -> Vec<String> {
    use teloxide::types::InlineKeyboardButtonKind;

    markup
        .inline_keyboard
        .iter()
        .flatten()
        .filter_map(|b| match &b.kind {
            InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
            _ => None,
        })
        .collect()
}
