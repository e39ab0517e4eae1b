//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a formatted global subscriber, once.
///
/// The default filter keeps this workspace chatty and everything else at
/// `warn`; set `RUST_LOG` to override it.  Safe to call when the embedding
/// application has already installed its own subscriber.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("greenroom_client=debug,greenroom_store=info,warn"));

    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
