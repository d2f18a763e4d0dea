use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod catalog {
    use super::*;

    /// Gift-code product lines offered by the shop.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Category {
        Ea,
        Steam,
        Binance,
        Netflix,
        Xbox,
        Spotify,
        Playstation,
        Itunes,
        Amazon,
    }

    impl Category {
        /// Menu order.
        pub const ALL: [Category; 9] = [
            Category::Ea,
            Category::Steam,
            Category::Binance,
            Category::Netflix,
            Category::Xbox,
            Category::Spotify,
            Category::Playstation,
            Category::Itunes,
            Category::Amazon,
        ];

        pub fn slug(self) -> &'static str {
            match self {
                Category::Ea => "ea",
                Category::Steam => "steam",
                Category::Binance => "binance",
                Category::Netflix => "netflix",
                Category::Xbox => "xbox",
                Category::Spotify => "spotify",
                Category::Playstation => "playstation",
                Category::Itunes => "itunes",
                Category::Amazon => "amazon",
            }
        }

        pub fn title(self) -> &'static str {
            match self {
                Category::Ea => "EA Gift Card",
                Category::Steam => "Steam",
                Category::Binance => "Binance",
                Category::Netflix => "Netflix",
                Category::Xbox => "Xbox",
                Category::Spotify => "Spotify",
                Category::Playstation => "PlayStation Store",
                Category::Itunes => "iTunes",
                Category::Amazon => "Amazon",
            }
        }
    }

    impl fmt::Display for Category {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.slug())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("unknown category `{0}`")]
    pub struct UnknownCategory(pub String);

    impl FromStr for Category {
        type Err = UnknownCategory;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Category::ALL
                .into_iter()
                .find(|c| c.slug() == s)
                .ok_or_else(|| UnknownCategory(s.to_string()))
        }
    }

    /// Face values in USD a user can buy, ascending.
    pub const PRICE_LADDER: [u32; 10] = [5, 15, 25, 50, 100, 150, 200, 350, 500, 1000];

    pub fn is_offered_amount(amount: i64) -> bool {
        PRICE_LADDER.iter().any(|&a| i64::from(a) == amount)
    }
}

pub mod payment {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Usdt,
        Card,
        Sbp,
        SbpQr,
    }

    impl PaymentMethod {
        pub const ALL: [PaymentMethod; 4] = [
            PaymentMethod::Sbp,
            PaymentMethod::SbpQr,
            PaymentMethod::Card,
            PaymentMethod::Usdt,
        ];

        pub fn slug(self) -> &'static str {
            match self {
                PaymentMethod::Usdt => "usdt",
                PaymentMethod::Card => "card",
                PaymentMethod::Sbp => "sbp",
                PaymentMethod::SbpQr => "sbp_qr",
            }
        }

        pub fn label(self) -> &'static str {
            match self {
                PaymentMethod::Usdt => "💵 USDT (TRC20)",
                PaymentMethod::Card => "💳 Card transfer",
                PaymentMethod::Sbp => "💳 SBP",
                PaymentMethod::SbpQr => "📷 SBP QR",
            }
        }

        /// SBP variants are listed in the menu but cannot be paid with yet.
        pub fn is_supported(self) -> bool {
            matches!(self, PaymentMethod::Usdt | PaymentMethod::Card)
        }
    }

    impl fmt::Display for PaymentMethod {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.slug())
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("unknown payment method `{0}`")]
    pub struct UnknownPaymentMethod(pub String);

    impl FromStr for PaymentMethod {
        type Err = UnknownPaymentMethod;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            PaymentMethod::ALL
                .into_iter()
                .find(|m| m.slug() == s)
                .ok_or_else(|| UnknownPaymentMethod(s.to_string()))
        }
    }
}
