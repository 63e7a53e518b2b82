//! Diagnostic output for the CLI.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a stderr subscriber when `verbose` is set. `RUST_LOG` overrides
/// the default `scanlabel=debug` filter.
pub fn init(verbose: bool) {
    if !verbose {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scanlabel=debug"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}
