use std::io::Write;

use clap::{Args, Subcommand};

use storefront::{
    checkout::{CheckoutItem, CostSummary, PaymentBreakdown},
    money::parse_price,
    orders::OrderId,
    reports::{write_demand_table, write_orders_table},
};
use storefront_admin::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List every order, oldest first
    List,

    /// Print the text summary of an order
    Show {
        /// Order id
        id: String,
    },

    /// Print the cost summary of an order
    Receipt {
        /// Order id
        id: String,

        /// Shipping and handling charge, e.g. `5.00`
        #[arg(long, value_parser = parse_price)]
        shipping: Option<u64>,
    },

    /// Requested units per product and size
    Demand,
}

pub(crate) async fn run(
    app: &AppContext,
    command: OrdersCommand,
    out: &mut impl Write,
) -> Result<(), String> {
    let desk = app.order_desk();

    match command.command {
        OrdersSubcommand::List => {
            let orders = desk
                .list()
                .await
                .map_err(|error| format!("failed to list orders: {error}"))?;

            write_orders_table(out, &orders).map_err(|error| error.to_string())
        }
        OrdersSubcommand::Show { id } => {
            let summary = desk
                .summary(&OrderId::new(id))
                .await
                .map_err(|error| error.to_string())?;

            writeln!(out, "{summary}").map_err(|error| error.to_string())
        }
        OrdersSubcommand::Receipt { id, shipping } => {
            let order = desk
                .get(&OrderId::new(id))
                .await
                .map_err(|error| error.to_string())?;

            let products = desk
                .products_by_id()
                .await
                .map_err(|error| format!("failed to list products: {error}"))?;

            let items: Vec<CheckoutItem> = order
                .cart
                .iter()
                .map(|item| CheckoutItem::from_cart_item(item, &products))
                .collect();

            CostSummary::new(&items, PaymentBreakdown::for_items(&items, shipping))
                .write_to(out)
                .map_err(|error| error.to_string())
        }
        OrdersSubcommand::Demand => {
            let demand = desk
                .demand()
                .await
                .map_err(|error| format!("failed to aggregate demand: {error}"))?;

            let products = desk
                .products_by_id()
                .await
                .map_err(|error| format!("failed to list products: {error}"))?;

            write_demand_table(out, &demand, &products).map_err(|error| error.to_string())
        }
    }
}
