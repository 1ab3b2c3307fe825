use crate::entities::OrderTimestamp;
use anyhow::Result;

/// Durable "last acknowledged order" watermark. Survives process restarts.
pub trait CursorStore {
    fn get(&self) -> Result<Option<OrderTimestamp>>;
    fn set(&mut self, timestamp: OrderTimestamp) -> Result<()>;
}
