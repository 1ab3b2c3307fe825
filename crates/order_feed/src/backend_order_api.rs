use rust_decimal::Decimal;
use serde::Deserialize;

use base::entities::order::{
    OrderId, Price, Quantity, TableNumber, DELETED_ITEM_NAME,
};
use base::entities::{AuthToken, Item, Order, OrderLine, OrderProperties, RestaurantId};
use base::helpers::from_iso_utc_str_to_utc_datetime;
use base::requests::api::SyncHttpRequest;
use base::requests::entities::{HttpRequestData, HttpRequestMethod};

use crate::api::OrderSource;
use crate::errors::FetchError;

pub type ApiUrl = String;

#[derive(Debug, Clone)]
pub struct BackendApiData {
    pub base_url: ApiUrl,
    pub auth_token: AuthToken,
    pub restaurant_id: RestaurantId,
}

#[derive(Deserialize, Debug)]
struct MenuItemJson {
    name: Option<String>,
    price: Option<Decimal>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct OrderItemJson {
    item_id: Option<MenuItemJson>,
    quantity: Quantity,
    price: Option<Decimal>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct OrderJson {
    #[serde(rename = "_id")]
    id: OrderId,
    table_number: TableNumber,
    #[serde(default)]
    items: Vec<OrderItemJson>,
    total: Option<Price>,
    created_at: String,
}

fn tune_order(order_json: OrderJson) -> Result<Order, FetchError> {
    let created_at = from_iso_utc_str_to_utc_datetime(&order_json.created_at)
        .map_err(|e| FetchError::Malformed(format!("order {}: {:#}", order_json.id, e)))?;

    let lines: Vec<OrderLine> = order_json
        .items
        .into_iter()
        .map(|item| {
            let (name, menu_price) = match item.item_id {
                Some(menu_item) => (menu_item.name, menu_item.price),
                None => (None, None),
            };

            OrderLine {
                name: name.unwrap_or_else(|| String::from(DELETED_ITEM_NAME)),
                quantity: item.quantity,
                unit_price: item.price.or(menu_price).unwrap_or(Decimal::ZERO),
            }
        })
        .collect();

    let mut props = OrderProperties {
        table_number: order_json.table_number,
        lines,
        total: Decimal::ZERO,
        created_at,
    };
    props.total = order_json.total.unwrap_or_else(|| props.lines_total());

    Ok(Item {
        id: order_json.id,
        props,
    })
}

/// Parses the backend listing and orders it newest-first.
pub fn parse_orders(body: &str) -> Result<Vec<Order>, FetchError> {
    let orders_json: Vec<OrderJson> =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    let mut orders = orders_json
        .into_iter()
        .map(tune_order)
        .collect::<Result<Vec<_>, _>>()?;

    orders.sort_by(|a, b| b.props.created_at.cmp(&a.props.created_at));

    Ok(orders)
}

/// Active orders of one restaurant, read from the admin REST API.
pub struct BackendOrderSource<R>
where
    R: SyncHttpRequest,
{
    api_data: BackendApiData,
    request_api: R,
}

impl<R> BackendOrderSource<R>
where
    R: SyncHttpRequest,
{
    pub fn new(api_data: BackendApiData, request_api: R) -> Self {
        Self {
            api_data,
            request_api,
        }
    }

    fn orders_url(&self) -> String {
        format!(
            "{}/api/admin/{}/orders",
            self.api_data.base_url.trim_end_matches('/'),
            self.api_data.restaurant_id
        )
    }
}

impl<R> OrderSource for BackendOrderSource<R>
where
    R: SyncHttpRequest,
{
    fn fetch_orders(&self) -> Result<Vec<Order>, FetchError> {
        let req = HttpRequestData::new(HttpRequestMethod::Get, &self.orders_url())
            .with_bearer_token(&self.api_data.auth_token);

        let body = self.request_api.call(req)?;

        parse_orders(&body)
    }
}
