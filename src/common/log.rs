//! Logging setup emitting JSON lines on stderr.
//!
//! Stdout stays reserved for the rendered panel so the two can be piped apart.

use tracing::level_filters::LevelFilter;

/// Install the global subscriber. Returns `false` when one was already in
/// place; that subscriber is kept and the refusal is logged through it.
pub fn init(level: LevelFilter) -> bool {
    let installed = tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_target(true)
        .with_current_span(false)
        .with_writer(std::io::stderr)
        .try_init();
    match installed {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, requested = %level, "log subscriber already installed");
            false
        }
    }
}
