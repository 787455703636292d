// ABOUTME: Tracing subscriber setup for hosts embedding vitrine.
// ABOUTME: RUST_LOG wins when set; otherwise debug when verbose, warn when not.

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// Does nothing if the host already installed one.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
