use crate::error::ValidationError;
use giftshop_shared::catalog::Category;
use giftshop_shared::payment::PaymentMethod;
use std::str::FromStr;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "open the shop menu")]
    Start,
    #[command(description = "operator only: close the order of a user")]
    Close(u64),
}

/// Inline button presses, parsed from their callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Menu,
    Support,
    Back,
    Category(Category),
    ShowInstruction(Category),
    Confirm(Category),
    Amount(Category, i64),
    Pay(PaymentMethod),
    Paid(PaymentMethod),
}

impl Action {
    pub fn callback_data(&self) -> String {
        match self {
            Action::Buy => "buy".to_string(),
            Action::Menu => "menu".to_string(),
            Action::Support => "support".to_string(),
            Action::Back => "back".to_string(),
            Action::Category(c) => format!("category:{}", c),
            Action::ShowInstruction(c) => format!("show_instruction:{}", c),
            Action::Confirm(c) => format!("confirm:{}", c),
            Action::Amount(c, amount) => format!("amount:{}:{}", c, amount),
            Action::Pay(m) => format!("pay:{}", m),
            Action::Paid(m) => format!("paid:{}", m),
        }
    }
}

fn category(raw: &str) -> Result<Category, ValidationError> {
    raw.parse()
        .map_err(|_| ValidationError::UnknownCategory(raw.to_string()))
}

impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let unknown = || ValidationError::UnknownAction(data.to_string());
        let method = |raw: &str| raw.parse::<PaymentMethod>().map_err(|_| unknown());

        match data {
            "buy" => Ok(Action::Buy),
            "menu" => Ok(Action::Menu),
            "support" => Ok(Action::Support),
            "back" => Ok(Action::Back),
            c if c.starts_with("category:") => {
                Ok(Action::Category(category(&c["category:".len()..])?))
            }
            s if s.starts_with("show_instruction:") => {
                Ok(Action::ShowInstruction(category(&s["show_instruction:".len()..])?))
            }
            c if c.starts_with("confirm:") => {
                Ok(Action::Confirm(category(&c["confirm:".len()..])?))
            }
            a if a.starts_with("amount:") => {
                let rest = &a["amount:".len()..];
                let (cat, value) = rest.split_once(':').ok_or_else(unknown)?;
                let amount = value
                    .parse::<i64>()
                    .map_err(|_| ValidationError::InvalidAmount(value.to_string()))?;
                Ok(Action::Amount(category(cat)?, amount))
            }
            p if p.starts_with("pay:") => Ok(Action::Pay(method(&p["pay:".len()..])?)),
            p if p.starts_with("paid:") => Ok(Action::Paid(method(&p["paid:".len()..])?)),
            _ => Err(unknown()),
        }
    }
}
