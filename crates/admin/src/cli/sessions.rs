use std::io::Write;

use clap::{Args, Subcommand};
use jiff::Timestamp;

use storefront_admin::{
    auth::{SESSION_COOKIE, resolve_identity, session_cookie},
    context::AppContext,
};

#[derive(Debug, Args)]
pub(crate) struct SessionsCommand {
    #[command(subcommand)]
    command: SessionsSubcommand,
}

#[derive(Debug, Subcommand)]
enum SessionsSubcommand {
    /// Issue a session for a user and print its cookie
    Issue { uid: String },
}

pub(crate) async fn run(
    app: &AppContext,
    command: SessionsCommand,
    out: &mut impl Write,
) -> Result<(), String> {
    match command.command {
        SessionsSubcommand::Issue { uid } => {
            let now = Timestamp::now();

            let issued = app
                .sessions
                .issue(&uid, now)
                .await
                .map_err(|error| format!("failed to issue session: {error}"))?;

            let ttl = issued.session.expires_at.duration_since(issued.session.created_at);
            let header = format!("{SESSION_COOKIE}={}", issued.token);
            let context = resolve_identity(&*app.sessions, Some(&header), now).await;

            let Some(resolved) = context.uid() else {
                return Err(format!("issued session for {uid} did not verify"));
            };

            writeln!(out, "token: {}", issued.token).map_err(|error| error.to_string())?;
            writeln!(out, "cookie: {}", session_cookie(&issued.token, ttl))
                .map_err(|error| error.to_string())?;
            writeln!(out, "uid: {resolved}").map_err(|error| error.to_string())?;
            writeln!(out, "expires: {}", issued.session.expires_at)
                .map_err(|error| error.to_string())
        }
    }
}
