//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with a fallback level
///
/// `RUST_LOG` still wins when it is set; `level` is only used as the default
/// filter (for example `"info"` or `"game_world=debug"`).
pub fn init_with_level(level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}
