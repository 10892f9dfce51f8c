//! Process-wide bridge instance.
//!
//! A mock engine is configured once per process, so it needs one adapter to
//! bind against without every call site threading a reference through.
//! [`TattleBridge`] bundles the stock formatter with a default-wired adapter
//! and exposes a lazily-initialized global. Explicit construction with
//! injected collaborators remains the primary API; the global exists only as
//! a registration convenience.

use lazy_static::lazy_static;

use crate::adapter::FailureReportingAdapter;
use crate::format::DefaultEventFormatter;

lazy_static! {
    static ref GLOBAL: TattleBridge = TattleBridge::new();
}

/// One formatter plus one adapter, ready to be handed to a mock engine's
/// registration point.
pub struct TattleBridge {
    formatter: DefaultEventFormatter,
    adapter: FailureReportingAdapter,
}

impl TattleBridge {
    /// Builds a bridge with default collaborators: stock formatter, live
    /// backtrace capture, panicking sink.
    pub fn new() -> Self {
        Self {
            formatter: DefaultEventFormatter,
            adapter: FailureReportingAdapter::default(),
        }
    }

    /// The process-wide instance, constructed on first access.
    pub fn global() -> &'static TattleBridge {
        &GLOBAL
    }

    /// The event-handling collaborator a mock engine reports failures to.
    pub fn adapter(&self) -> &FailureReportingAdapter {
        &self.adapter
    }

    /// The formatting collaborator, for engines that render their own
    /// messages through the same formatter.
    pub fn formatter(&self) -> &DefaultEventFormatter {
        &self.formatter
    }
}

impl Default for TattleBridge {
    fn default() -> Self {
        Self::new()
    }
}
