//! Logging setup using `tracing-subscriber`.
//!
//! Output goes to stderr so stdout stays reserved for rendered HTML.

use tracing_subscriber::EnvFilter;

/// Initialise console logging for CLI subcommands.
///
/// Human-readable by default, one JSON object per line when `json` is set.
/// Controlled by `RUST_LOG` (default: `info`).
pub fn init_cli(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
