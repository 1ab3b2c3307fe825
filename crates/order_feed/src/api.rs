use base::entities::Order;

use crate::errors::FetchError;

pub trait OrderSource {
    /// Returns the current order listing in the source's own order.
    fn fetch_orders(&self) -> Result<Vec<Order>, FetchError>;
}
