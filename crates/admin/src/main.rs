//! Storefront admin console

use std::process;

use tracing::error;

use storefront_admin::logging::init_logging;

mod cli;

#[tokio::main]
pub async fn main() {
    let cli = cli::Cli::load().unwrap_or_else(|error| error.exit());

    if let Err(init_error) = init_logging(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("{init_error}");
        }

        process::exit(1);
    }

    if let Err(run_error) = cli.run().await {
        error!("{run_error}");

        #[expect(clippy::print_stderr, reason = "command errors are reported to the operator")]
        {
            eprintln!("{run_error}");
        }

        process::exit(1);
    }
}
