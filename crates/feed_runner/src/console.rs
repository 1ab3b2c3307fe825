use anyhow::{bail, Result};
use chrono::TimeZone;

use base::entities::order::OrderId;
use base::entities::{Order, CURRENCY_SYMBOL};
use base::helpers::{format_price, format_ticket_time};
use order_feed::FeedSnapshot;

pub const HELP_TEXT: &str = "commands: a(ccept) | d(ismiss) | p(rint) <order id> | l(ist) | h(elp) | q(uit)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Accept,
    Dismiss,
    Print(OrderId),
    List,
    Help,
    Quit,
}

/// Parses one line typed by the operator. A blank line is not a command.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>> {
    let mut words = line.split_whitespace();

    let name = match words.next() {
        None => return Ok(None),
        Some(name) => name.to_lowercase(),
    };

    let command = match name.as_str() {
        "a" | "accept" => ConsoleCommand::Accept,
        "d" | "dismiss" => ConsoleCommand::Dismiss,
        "p" | "print" => match words.next() {
            Some(order_id) => ConsoleCommand::Print(order_id.to_string()),
            None => bail!("print needs an order id"),
        },
        "l" | "list" => ConsoleCommand::List,
        "h" | "help" | "?" => ConsoleCommand::Help,
        "q" | "quit" | "exit" => ConsoleCommand::Quit,
        other => bail!("unknown command \"{}\", {}", other, HELP_TEXT),
    };

    if words.next().is_some() {
        bail!("too many arguments for \"{}\"", name);
    }

    Ok(Some(command))
}

fn format_lines(order: &Order) -> String {
    order
        .props
        .lines
        .iter()
        .map(|line| format!("  • {} × {}\n", line.name, line.quantity))
        .collect()
}

pub fn format_popup(order: &Order, pending: usize) -> String {
    let mut popup = String::from("=== New Order ===\n");

    popup.push_str(&format!("Table #{}\n", order.props.table_number));
    popup.push_str(&format_lines(order));
    popup.push_str(&format!(
        "{}{}\n",
        CURRENCY_SYMBOL,
        format_price(order.props.total)
    ));

    if pending > 0 {
        popup.push_str(&format!("({} more waiting)\n", pending));
    }

    popup.push_str("[a] accept and print   [d] dismiss");
    popup
}

/// Renders the order cards with creation times shown in `tz`.
pub fn format_listing<Tz>(orders: &[Order], tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if orders.is_empty() {
        return String::from("No orders yet.");
    }

    let mut listing = String::from("Active Orders\n");

    for order in orders {
        listing.push_str(&format!(
            "[{}] Table #{}  {}  {}{}\n",
            order.id,
            order.props.table_number,
            format_ticket_time(&order.props.created_at.with_timezone(tz)),
            CURRENCY_SYMBOL,
            format_price(order.props.total)
        ));
        listing.push_str(&format_lines(order));
    }

    listing.trim_end().to_string()
}

/// What the console prints when the monitor publishes a new snapshot.
pub fn format_snapshot(snapshot: &FeedSnapshot) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(failure) = &snapshot.print_failure {
        parts.push(format!("print failed: {}", failure));
    }

    if let Some(order) = &snapshot.active_popup {
        parts.push(format_popup(order, snapshot.pending));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
