//! Diagnostic logging
//!
//! Logs go to stderr so they never mix with the outline on stdout.
//! `RUST_LOG` controls filtering (e.g. `RUST_LOG=capl_outline=debug`);
//! without it only warnings are shown, or debug output with `--verbose`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    if let Err(e) = tracing_subscriber::registry().with(console_layer).try_init() {
        eprintln!("Warning: Could not initialize logging: {}", e);
    }
}
