use std::time::Duration;

/// Pause after a failed tick before the pipeline goes back to sleep, so a
/// flapping node does not produce a tight error loop.
pub(crate) const ERROR_BACKOFF: Duration = Duration::from_secs(1);
