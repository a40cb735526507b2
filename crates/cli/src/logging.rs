//! Diagnostic logging setup for the command-line front-end.
//!
//! Library crates emit `tracing` events under the `flags::table` and
//! `flags::resolve` targets. The front-end installs a `fmt` subscriber on
//! standard error when `-v` is given or when [`LOG_ENV`] is set; the
//! environment variable takes precedence and accepts any `EnvFilter`
//! directive.

use std::env;
use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "FLAG_RESOLVE_LOG";

/// Returns the filter directive implied by `-v` repetitions.
pub const fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "warn,flags=debug",
        _ => "warn,flags=trace",
    }
}

/// Installs the global subscriber if logging was requested.
///
/// Later calls keep the first subscriber.
pub fn init(verbosity: u8) {
    let filter = match env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::new(directive),
        _ if verbosity > 0 => EnvFilter::new(verbosity_directive(verbosity)),
        _ => return,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .without_time()
        .try_init();
}
