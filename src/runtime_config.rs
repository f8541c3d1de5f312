//! Environment-based runtime configuration.
//!
//! Timer callbacks and deferred resolutions run on `may` coroutines; the
//! stack size for those coroutines is configurable through the
//! `MOCKD_STACK_SIZE` environment variable, accepted in decimal (`16384`)
//! or hexadecimal (`0x4000`) form. The default is 64 KB, which leaves
//! headroom for handlers that serialize JSON on the timer path.

use std::env;

/// Default coroutine stack size in bytes (64 KB).
pub const DEFAULT_STACK_SIZE: usize = 0x10000;

/// Runtime configuration loaded at startup.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for spawned coroutines in bytes.
    pub stack_size: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values fall back to [`DEFAULT_STACK_SIZE`].
    pub fn from_env() -> Self {
        let stack_size = match env::var("MOCKD_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_STACK_SIZE)
                } else {
                    val.parse().unwrap_or(DEFAULT_STACK_SIZE)
                }
            }
            Err(_) => DEFAULT_STACK_SIZE,
        };
        RuntimeConfig { stack_size }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}
