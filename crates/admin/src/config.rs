//! Configuration shared by the admin console entry points.

use clap::Args;
use jiff::SignedDuration;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Session settings.
#[derive(Debug, Args)]
pub struct SessionConfig {
    /// Session lifetime in minutes
    #[arg(long, env = "SESSION_TTL_MINUTES", default_value_t = 720)]
    pub session_ttl_minutes: u32,
}

impl SessionConfig {
    #[must_use]
    pub fn ttl(&self) -> SignedDuration {
        SignedDuration::from_mins(i64::from(self.session_ttl_minutes))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestConfig {
        #[command(flatten)]
        logging: LoggingConfig,

        #[command(flatten)]
        session: SessionConfig,
    }

    #[test]
    fn flags_override_defaults() -> Result<(), clap::Error> {
        let config = TestConfig::try_parse_from([
            "storefront-admin",
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--session-ttl-minutes",
            "15",
        ])?;

        assert_eq!(config.logging.log_level, "debug");
        assert_eq!(config.logging.log_format, LogFormat::Json);
        assert_eq!(config.session.ttl(), SignedDuration::from_mins(15));

        Ok(())
    }
}
