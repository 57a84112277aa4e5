//! Output fan-out: the [`Sink`] capability and the standard sinks.

mod display;
mod file;

pub use display::{DisplaySink, Summary};
pub use file::{FileSink, COUNT_SUFFIX, HEADERS_SUFFIX};

use std::sync::Arc;

use tracing::warn;

use crate::app::Result;

/// A registered consumer of the `(count, text)` poll summary.
///
/// Sinks receive every dispatch in registration order. A failing sink is
/// logged and skipped; it never blocks delivery to the sinks after it.
pub trait Sink: Send + Sync {
    /// Short identifier used when a delivery failure is logged.
    fn name(&self) -> &str;

    /// Consume one summary: the unread count and the formatted header text.
    fn deliver(&self, count: usize, text: &str) -> Result<()>;
}

/// Deliver `(count, text)` to every sink in registration order.
///
/// Per-sink failures are isolated: they are logged at warn level and the
/// remaining sinks are still served.
pub fn dispatch(count: usize, text: &str, sinks: &[Arc<dyn Sink>]) {
    for sink in sinks {
        if let Err(e) = sink.deliver(count, text) {
            warn!("Delivery to sink '{}' failed: {}", sink.name(), e);
        }
    }
}
