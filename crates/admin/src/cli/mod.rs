use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};

use storefront_admin::{
    config::{LoggingConfig, SessionConfig},
    context::AppContext,
};

mod events;
mod orders;
mod products;
mod sessions;

#[derive(Debug, Parser)]
#[command(name = "storefront-admin", about = "Storefront admin console", long_about = None)]
pub(crate) struct Cli {
    /// Catalog snapshot to load (YAML)
    #[arg(long, env = "STOREFRONT_CATALOG")]
    catalog: PathBuf,

    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    session: SessionConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Products(products::ProductsCommand),
    Orders(orders::OrdersCommand),
    Events(events::EventsCommand),
    Sessions(sessions::SessionsCommand),
}

impl Cli {
    /// Parse arguments after loading `.env`, if present.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let app = AppContext::from_catalog_path(&self.catalog, self.session.ttl())
            .map_err(|error| format!("{error}: {}", self.catalog.display()))?;

        let mut out = io::stdout().lock();

        match self.command {
            Commands::Products(command) => products::run(&app, command, &mut out).await,
            Commands::Orders(command) => orders::run(&app, command, &mut out).await,
            Commands::Events(command) => events::run(&app, command, &mut out).await,
            Commands::Sessions(command) => sessions::run(&app, command, &mut out).await,
        }
    }
}
