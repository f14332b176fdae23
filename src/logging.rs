//! Tracing setup for the bot.
//!
//! Reads `RUST_LOG`; defaults to `homework_bot=debug` so unchanged-status
//! and empty-window cycles stay visible. Output goes to stderr with source
//! location, matching the log format of the original deployment.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("homework_bot=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}
