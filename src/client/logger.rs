//! Logger Module
//!
//! Injectable log sink used by the client for hit/miss reporting.

use std::fmt;
use std::sync::Arc;

type LogFn = dyn Fn(fmt::Arguments<'_>) + Send + Sync;

// == Logger ==
/// Log sink owned by a single client.
///
/// The default sink forwards to `tracing` at debug level; nothing is
/// installed process-wide.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<LogFn>,
}

impl Logger {
    /// Creates a logger from an arbitrary sink.
    pub fn new<F>(sink: F) -> Self
    where
        F: Fn(fmt::Arguments<'_>) + Send + Sync + 'static,
    {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Logger forwarding to `tracing::debug!`.
    pub fn tracing() -> Self {
        Self::new(|args| tracing::debug!(target: "memd", "{}", args))
    }

    /// Logger discarding every message.
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Emits a message to the sink.
    pub fn log(&self, args: fmt::Arguments<'_>) {
        (self.sink)(args)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
