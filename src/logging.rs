//! Log output setup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Install a single-line, timestamped subscriber on stderr.
///
/// `verbose` raises the default filter to `debug`; an explicit `RUST_LOG` still wins.
/// Calling this twice is harmless: the second install is ignored.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
