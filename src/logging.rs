//! Tracing subscriber setup for acceptance runs.

use tracing::Level;
use tracing_subscriber::fmt;

/// Install a `fmt` subscriber, logging at `DEBUG` when `debug` is set and at
/// `INFO` otherwise.
///
/// Returns `false` when a global subscriber was already installed, which is
/// normal when several test binaries or scenarios initialise logging.
#[must_use]
pub fn init(debug: bool) -> bool {
    let max_level = if debug { Level::DEBUG } else { Level::INFO };
    fmt()
        .with_max_level(max_level)
        .with_test_writer()
        .try_init()
        .is_ok()
}
