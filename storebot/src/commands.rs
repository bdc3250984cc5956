//! Local commands handled without the dialogue engine, and the replies they send.

pub const HELP_REPLY: &str =
    "Say \"open store\" or \"close store\" to switch the store, \"shop\" to start shopping, or \"history\" to see your last purchase.";
pub const STORE_OPENED_REPLY: &str = "The store is now open.";
pub const STORE_CLOSED_REPLY: &str = "The store is now closed.";
pub const SHOP_REPLY: &str = "Welcome to the store! What would you like to buy?";
pub const CLOSING_ACK: &str = "Thanks for shopping with us!";

/// `history` reply when no purchase was ever completed.
pub const NO_PURCHASE: &str = "nothing";

pub fn history_reply(purchased_item: Option<&str>) -> String {
    format!(
        "Your last purchase was: {}",
        purchased_item.unwrap_or(NO_PURCHASE)
    )
}

/// A command the router handles itself. Matching is exact and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    OpenStore,
    CloseStore,
    Shop,
    History,
}

impl LocalCommand {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "open store" => Some(Self::OpenStore),
            "close store" => Some(Self::CloseStore),
            "shop" => Some(Self::Shop),
            "history" => Some(Self::History),
            _ => None,
        }
    }
}
