//! Client configuration.
//!
//! Two channel capacities, overridable through the environment.  The
//! defaults suit a single embedded client; nothing needs to be set for the
//! engine to start.

use greenroom_shared::constants::{DEFAULT_EVENT_CAPACITY, DEFAULT_FEED_CAPACITY};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Capacity of the in-process change event bus.  A slow feed watcher
    /// that falls further behind than this refreshes from the store instead
    /// of replaying events.
    /// Env: `GREENROOM_EVENT_CAPACITY`
    /// Default: `64`
    pub event_capacity: usize,

    /// Capacity of each feed's snapshot delivery queue.
    /// Env: `GREENROOM_FEED_CAPACITY`
    /// Default: `16`
    pub feed_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            event_capacity: DEFAULT_EVENT_CAPACITY,
            feed_capacity: DEFAULT_FEED_CAPACITY,
        }
    }
}

impl ClientConfig {
    /// Read overrides from the environment, keeping defaults for anything
    /// unset or invalid.  Capacities must be at least 1.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GREENROOM_EVENT_CAPACITY") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.event_capacity = n,
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid GREENROOM_EVENT_CAPACITY, using default"
                    );
                }
            }
        }

        if let Ok(val) = std::env::var("GREENROOM_FEED_CAPACITY") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.feed_capacity = n,
                _ => {
                    tracing::warn!(
                        value = %val,
                        "Invalid GREENROOM_FEED_CAPACITY, using default"
                    );
                }
            }
        }

        config
    }
}
