//! `stockroom order` command - create orders and reserve stock

use clap::{Args, Subcommand};
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{settings::Style, Table, Tabled};

use crate::cli::helpers::{open_store, short_ts, short_ts_opt};
use crate::core::ReserveRequest;

#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// Create an order for a class group
    New(NewArgs),

    /// Reserve an item onto an order
    Add(AddArgs),

    /// Show an order's line items
    Show(ShowArgs),

    /// List all orders (admin view)
    List,

    /// List orders a user belongs to
    Mine(MineArgs),
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Class group id
    pub group: i64,

    /// Requesting student emails (at least one)
    #[arg(required = true)]
    pub students: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Order id
    pub order: i64,

    /// Item name
    pub item: String,

    /// Number of units to reserve
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,

    /// Reserve one exact serialized unit by code
    #[arg(long)]
    pub code: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    pub order: i64,
}

#[derive(Args, Debug)]
pub struct MineArgs {
    /// User email
    pub email: String,
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Line")]
    id: i64,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Requested")]
    requested: String,
    #[tabled(rename = "Loaned")]
    loaned: String,
    #[tabled(rename = "Returned")]
    returned: String,
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Order")]
    id: i64,
    #[tabled(rename = "Group")]
    group: i64,
    #[tabled(rename = "Attention")]
    attention: String,
}

pub fn run(cmd: OrderCommands) -> Result<()> {
    let (_project, mut store) = open_store()?;
    match cmd {
        OrderCommands::New(args) => {
            let mut member_ids = Vec::with_capacity(args.students.len());
            for email in &args.students {
                member_ids.push(store.user_by_email(email).into_diagnostic()?.id);
            }
            let order = store
                .create_order(args.group, &member_ids)
                .into_diagnostic()?;
            println!(
                "{} Created order {} for group {} ({} requester(s))",
                style("✓").green().bold(),
                order.id,
                order.group_id,
                member_ids.len()
            );
        }
        OrderCommands::Add(args) => {
            let request = ReserveRequest {
                name: args.item.clone(),
                quantity: args.quantity,
                code: args.code.clone(),
            };
            let line = store.reserve(args.order, &request).into_diagnostic()?;
            let unit = store.unit(line.unit_id).into_diagnostic()?;
            println!(
                "{} Reserved {} x '{}' on order {} (line {})",
                style("✓").green().bold(),
                line.quantity,
                unit.label(),
                args.order,
                line.id
            );
        }
        OrderCommands::Show(args) => {
            let order = store.order(args.order).into_diagnostic()?;
            let members = store.order_members(order.id).into_diagnostic()?;
            let lines = store.order_lines(order.id).into_diagnostic()?;
            let attention = store.order_attention(order.id).into_diagnostic()?;

            println!(
                "Order {} (group {}, {})",
                style(order.id).bold(),
                order.group_id,
                attention
            );
            for member in &members {
                println!("  requester: {} <{}>", member.name, member.email);
            }
            if lines.is_empty() {
                println!("  no line items");
                return Ok(());
            }
            let mut rows = Vec::with_capacity(lines.len());
            for line in lines {
                let unit = store.unit(line.unit_id).into_diagnostic()?;
                rows.push(LineRow {
                    id: line.id,
                    item: unit.label(),
                    quantity: line.quantity,
                    status: line.status.to_string(),
                    requested: short_ts(line.requested_at),
                    loaned: short_ts_opt(line.loaned_at),
                    returned: short_ts_opt(line.returned_at),
                });
            }
            println!("{}", Table::new(rows).with(Style::psql()));
        }
        OrderCommands::List => {
            let orders = store.list_orders().into_diagnostic()?;
            if orders.is_empty() {
                println!("No orders");
                return Ok(());
            }
            let mut rows = Vec::with_capacity(orders.len());
            for order in orders {
                let attention = store.order_attention(order.id).into_diagnostic()?;
                rows.push(OrderRow {
                    id: order.id,
                    group: order.group_id,
                    attention: attention.to_string(),
                });
            }
            println!("{}", Table::new(rows).with(Style::psql()));
        }
        OrderCommands::Mine(args) => {
            let user = store.user_by_email(&args.email).into_diagnostic()?;
            let orders = store.orders_for_user(user.id).into_diagnostic()?;
            if orders.is_empty() {
                println!("No orders for {}", user.email);
                return Ok(());
            }
            let mut rows = Vec::with_capacity(orders.len());
            for order in orders {
                let attention = store.order_attention(order.id).into_diagnostic()?;
                rows.push(OrderRow {
                    id: order.id,
                    group: order.group_id,
                    attention: attention.to_string(),
                });
            }
            println!("{}", Table::new(rows).with(Style::psql()));
        }
    }
    Ok(())
}
