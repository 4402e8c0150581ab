//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints [`RuntimeEvent`]s in a human-readable format, to stdout
//! by default or to any [`Write`] sink.
//!
//! ## Output format
//! ```text
//! [subscriber-panicked] event=app::Ping subscriber=metrics
//!     reason=index out of bounds
//! [publish-rejected] event=app::Ping reason=stopped
//! [timers-discarded] count=2
//! [dispatcher-stopped]
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskbus::{Dispatcher, LogWriter, RuntimeEvent};
//!
//! let bus = Dispatcher::builder()
//!     .with_subscriber::<RuntimeEvent, _>(Arc::new(LogWriter::new()))
//!     .build()?;
//! bus.stop(); // prints "[dispatcher-stopped]"
//! # Ok::<(), taskbus::DispatchError>(())
//! ```

use std::io::{self, Write};

use parking_lot::Mutex;

use crate::events::{RuntimeEvent, RuntimeEventKind};
use crate::subscribers::Subscribe;

/// Line-oriented writer subscriber for [`RuntimeEvent`]s.
///
/// Enabled via the `logging` feature. Not intended for production use; route
/// diagnostics into `tracing` or metrics with a custom [`Subscribe`] instead.
///
/// Each event is rendered up front and written with a single `write_all`, so
/// multi-line entries from concurrent publishers never interleave. The sink
/// sits behind a blocking mutex since writes may block.
pub struct LogWriter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl LogWriter {
    /// Writes to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Writes to `writer`.
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    fn render(e: &RuntimeEvent) -> String {
        let event = e.event.unwrap_or("?");
        match e.kind {
            RuntimeEventKind::SubscriberPanicked => format!(
                "[subscriber-panicked] event={event} subscriber={}\n    reason={}",
                e.subscriber.unwrap_or("?"),
                e.reason.as_deref().unwrap_or("unknown"),
            ),
            RuntimeEventKind::PublishRejected => format!(
                "[publish-rejected] event={event} reason={}",
                e.reason.as_deref().unwrap_or("unknown"),
            ),
            RuntimeEventKind::TimersDiscarded => {
                format!("[timers-discarded] count={}", e.count.unwrap_or(0))
            }
            RuntimeEventKind::DispatcherStopped => "[dispatcher-stopped]".to_string(),
        }
    }
}

impl Default for LogWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscribe<RuntimeEvent> for LogWriter {
    fn on_event(&self, e: &RuntimeEvent) {
        let mut block = Self::render(e);
        block.push('\n');
        let mut out = self.out.lock();
        if out.write_all(block.as_bytes()).and_then(|()| out.flush()).is_err() {
            tracing::warn!(kind = ?e.kind, "log writer failed to write event");
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
