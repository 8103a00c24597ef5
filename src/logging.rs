//! Diagnostic logging.
//!
//! Logs go to stderr so they never mix with findings on stdout. The
//! `PORTSWEEP_LOG` environment variable takes an `EnvFilter` directive
//! string and overrides the level chosen from `-v` / `-q`.

use anyhow::{Context, Result};
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding a filter directive.
pub const LOG_ENV: &str = "PORTSWEEP_LOG";

/// Level implied by the command-line flags.
pub fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {LOG_ENV} value '{directives}'"))?,
        Err(_) => EnvFilter::new(level_for(verbosity, quiet))
            .add_directive("trust_dns_proto=warn".parse()?)
            .add_directive("trust_dns_resolver=warn".parse()?),
    };

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    Registry::default()
        .with(filter)
        .with(console_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(0, false), "warn");
        assert_eq!(level_for(1, false), "info");
        assert_eq!(level_for(2, false), "debug");
        assert_eq!(level_for(7, false), "trace");
        assert_eq!(level_for(3, true), "error");
    }
}
