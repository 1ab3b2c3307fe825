use anyhow::Result;

use base::entities::OrderTimestamp;
use base::stores::cursor_store::CursorStore;

#[derive(Default, Debug, Clone)]
pub struct InMemoryCursorStore {
    last_acknowledged: Option<OrderTimestamp>,
}

impl InMemoryCursorStore {
    pub fn new(last_acknowledged: Option<OrderTimestamp>) -> Self {
        Self { last_acknowledged }
    }
}

impl CursorStore for InMemoryCursorStore {
    fn get(&self) -> Result<Option<OrderTimestamp>> {
        Ok(self.last_acknowledged)
    }

    fn set(&mut self, timestamp: OrderTimestamp) -> Result<()> {
        self.last_acknowledged = Some(timestamp);
        Ok(())
    }
}
