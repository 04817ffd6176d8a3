use std::io::Write;

use clap::{Args, Subcommand};
use jiff::Timestamp;

use storefront::reports::write_events_table;
use storefront_admin::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct EventsCommand {
    #[command(subcommand)]
    command: EventsSubcommand,
}

#[derive(Debug, Subcommand)]
enum EventsSubcommand {
    /// List every event
    List,

    /// List events that have not ended yet
    Active,
}

pub(crate) async fn run(
    app: &AppContext,
    command: EventsCommand,
    out: &mut impl Write,
) -> Result<(), String> {
    let now = Timestamp::now();

    let events = match command.command {
        EventsSubcommand::List => app.events.list_events().await,
        EventsSubcommand::Active => app.events.list_active_events(now).await,
    }
    .map_err(|error| format!("failed to list events: {error}"))?;

    let products = app
        .order_desk()
        .products_by_id()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    write_events_table(out, &events, &products, now).map_err(|error| error.to_string())
}
