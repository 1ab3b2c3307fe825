use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use base::entities::order::OrderId;
use base::entities::{Order, CURRENCY_SYMBOL};
use base::helpers::{escape_html, format_price, format_ticket_time};

/// A kitchen ticket ready to be handed to a print sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTicket {
    pub order_id: OrderId,
    pub html: String,
}

pub fn render_kitchen_ticket<Tz>(order: &Order, printed_at: &DateTime<Tz>) -> RenderedTicket
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let lines = order
        .props
        .lines
        .iter()
        .map(|line| format!("<li>{} × {}</li>", escape_html(&line.name), line.quantity))
        .collect::<Vec<_>>()
        .join("");

    let html = format!(
        concat!(
            "<html>\n",
            "  <body style=\"font-family: sans-serif; padding: 10px;\">\n",
            "    <h3>Kitchen Order</h3>\n",
            "    <p>{printed_at}</p>\n",
            "    <p><strong>Table:</strong> {table}</p>\n",
            "    <hr />\n",
            "    <ul>{lines}</ul>\n",
            "    <hr />\n",
            "    <p style=\"margin-bottom: 15px;\"><strong>Total:</strong> {currency}{total}</p>\n",
            "  </body>\n",
            "</html>\n",
        ),
        printed_at = format_ticket_time(printed_at),
        table = order.props.table_number,
        lines = lines,
        currency = CURRENCY_SYMBOL,
        total = format_price(order.props.total),
    );

    RenderedTicket {
        order_id: order.id.clone(),
        html,
    }
}
