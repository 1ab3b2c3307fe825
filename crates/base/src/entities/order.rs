use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::entities::Item;

pub type OrderId = String;
pub type TableNumber = u32;
pub type Quantity = u32;
pub type Price = Decimal;

/// Wall-clock creation time assigned by the backend. The only source of truth for recency.
pub type OrderTimestamp = DateTime<Utc>;

pub const DELETED_ITEM_NAME: &str = "Deleted Item";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub name: String,
    pub quantity: Quantity,
    pub unit_price: Price,
}

impl OrderLine {
    pub fn line_total(&self) -> Price {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderProperties {
    pub table_number: TableNumber,
    pub lines: Vec<OrderLine>,
    pub total: Price,
    pub created_at: OrderTimestamp,
}

impl OrderProperties {
    pub fn lines_total(&self) -> Price {
        self.lines.iter().map(OrderLine::line_total).sum()
    }
}

/// A placed table order. Identity is the server-assigned id; never mutated after fetch.
pub type Order = Item<OrderId, OrderProperties>;
