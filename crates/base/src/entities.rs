pub mod order;

pub use order::{Order, OrderLine, OrderProperties, OrderTimestamp};

pub const TARGET_LOGGER_ENV: &str = "TARGET_LOGGER";
pub const DEFAULT_TARGET_LOGGER: &str = "order_feed";

pub const CURRENCY_SYMBOL: &str = "₹";
pub const PRICE_DECIMAL_PLACES: u32 = 2;

pub type RestaurantId = String;
pub type AuthToken = String;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Item<I, P> {
    pub id: I,
    pub props: P,
}
