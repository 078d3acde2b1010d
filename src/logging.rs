//! `tracing-subscriber` setup for binaries and ad-hoc debugging.

/// Installs a global fmt subscriber capped at `max_level`.
///
/// Fails if a global subscriber is already set.
pub fn try_init(max_level: tracing::Level) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(true)
        .try_init()
}

/// [`try_init`] at `INFO`, ignoring an already installed subscriber.
pub fn init() {
    if try_init(tracing::Level::INFO).is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}
