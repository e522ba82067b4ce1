use std::io::{self, Write};

use clap::Args;
use milkrun::orders::{Order, OrderHistory, OrderStatus};
use rusty_money::iso::INR;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use tracing::info;

#[derive(Debug, Args)]
pub(crate) struct OrdersArgs {
    /// Only list orders with this status (delivered, pending, cancelled)
    #[arg(long)]
    status: Option<OrderStatus>,
}

pub(crate) fn run(args: OrdersArgs) -> Result<(), String> {
    let history = OrderHistory::sample(INR).map_err(|error| error.to_string())?;
    let orders = history.filter(args.status);

    info!(status = ?args.status, matches = orders.len(), "listed orders");

    let mut out = io::stdout().lock();

    if orders.is_empty() {
        return writeln!(out, "no orders found").map_err(|error| error.to_string());
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Date", "Status", "Items", "Delivery", "Total"]);

    for order in orders {
        builder.push_record([
            order.id().to_string(),
            order.date().to_string(),
            order.status().to_string(),
            describe_lines(order),
            order.delivery_time().to_string(),
            order.total().to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(5..6), Alignment::right());

    writeln!(out, "\n{table}\n").map_err(|error| error.to_string())
}

fn describe_lines(order: &Order<'_>) -> String {
    order
        .lines()
        .iter()
        .map(|line| format!("{} × {}{}", line.name, line.quantity.normalize(), line.unit))
        .collect::<Vec<_>>()
        .join("\n")
}
