//! The failure-reporting adapter.
//!
//! Translates each [`VerificationEvent`] raised by the mock engine into
//! exactly one [`FailureRecord`] submitted to the assertion sink. Sequence
//! and no-more-invocations events carry their own call site and are passed
//! straight through; an unexpected call has no recorded site, so the adapter
//! walks the captured stack to find the first frame outside reporting
//! infrastructure and reports from there, quoting the failing statement and
//! the filtered trace.

use crate::event::{SourceLocation, VerificationEvent};
use crate::format::{DefaultEventFormatter, EventFormatter};
use crate::sink::{AssertionSink, CheckKind, FailureRecord, ResultKind};
use crate::snippet;
use crate::stack::{FrameFilter, StackSource, MAX_FRAMES};

/// Routes verification failures into the assertion sink. Collaborators are
/// injected so the filtering and formatting logic stays testable without a
/// live mock engine or a panicking sink.
pub struct FailureReportingAdapter {
    formatter: Box<dyn EventFormatter>,
    stack: Box<dyn StackSource>,
    sink: Box<dyn AssertionSink>,
    filter: FrameFilter,
}

impl Default for FailureReportingAdapter {
    fn default() -> Self {
        Self::new(
            Box::new(DefaultEventFormatter),
            Box::new(crate::stack::BacktraceSource),
            Box::new(crate::sink::PanicSink),
        )
    }
}

impl FailureReportingAdapter {
    pub fn new(
        formatter: Box<dyn EventFormatter>,
        stack: Box<dyn StackSource>,
        sink: Box<dyn AssertionSink>,
    ) -> Self {
        // The adapter's own frames must never be reported as the failure.
        let filter = FrameFilter::new().exclude_suffix(file!());
        Self {
            formatter,
            stack,
            sink,
            filter,
        }
    }

    /// Replaces the frame filter, for embedders whose infrastructure lives
    /// in files the default exclusion set does not know about.
    pub fn with_filter(mut self, filter: FrameFilter) -> Self {
        self.filter = filter.exclude_suffix(file!());
        self
    }

    /// Handles one event to completion: formats it, resolves a location, and
    /// submits a single failure record. May not return when the sink
    /// propagates failure non-locally.
    pub fn handle(&self, event: &VerificationEvent) {
        match event {
            VerificationEvent::UnexpectedCall(_) => self.handle_unexpected(event),
            VerificationEvent::SequenceMismatch(evt) => {
                let expected =
                    DefaultEventFormatter::format_expected_pattern(&evt.expected_pattern);
                self.handle_located(event, CheckKind::Verify, &evt.location, Some(expected));
            }
            VerificationEvent::NoMoreInvocations(evt) => {
                self.handle_located(
                    event,
                    CheckKind::VerifyNoMoreInvocations,
                    &evt.location,
                    None,
                );
            }
        }
    }

    /// Verify-style events: no stack inspection, the event's own recorded
    /// call site is the reported location.
    fn handle_located(
        &self,
        event: &VerificationEvent,
        check: CheckKind,
        location: &SourceLocation,
        expected: Option<String>,
    ) {
        let message = format!(
            "{}: {}",
            format_line_number(location),
            self.formatter.format(event)
        );
        self.sink.submit(FailureRecord {
            check,
            location: location.clone(),
            calling_method: None,
            expected,
            message,
            result: ResultKind::ExpressionFailed,
        });
    }

    fn handle_unexpected(&self, event: &VerificationEvent) {
        let frames = self.stack.capture(MAX_FRAMES);
        let selection = self.filter.select(&frames);
        let base = self.formatter.format(event);

        let Some(failing) = selection.failing else {
            // Nothing outside our own infrastructure survived the filter;
            // report with no location context rather than none at all.
            self.sink.submit(FailureRecord {
                check: CheckKind::UnexpectedCall,
                location: SourceLocation::unknown(),
                calling_method: None,
                expected: None,
                message: base,
                result: ResultKind::ExplicitFailure,
            });
            return;
        };

        let mut message = base;
        message.push('\n');
        message.push_str("  Failed statement:\n");
        if let Some(statement) = snippet::source_line(&failing.file, failing.line) {
            message.push_str("  ");
            message.push_str(statement.trim_end());
            message.push('\n');
        }
        message.push_str("  Stacktrace:\n");
        for frame in &selection.surviving {
            message.push_str(&format!(
                "     {}:{} {}\n",
                frame.file, frame.line, frame.function
            ));
        }

        self.sink.submit(FailureRecord {
            check: CheckKind::UnexpectedCall,
            location: SourceLocation::new(failing.file.clone(), failing.line),
            calling_method: Some(failing.function.clone()),
            expected: None,
            message,
            result: ResultKind::ExplicitFailure,
        });
    }
}

/// Renders a call site in the platform's conventional style: `file(line)`
/// on Windows toolchains, `file:line` everywhere else.
fn format_line_number(location: &SourceLocation) -> String {
    if cfg!(windows) {
        format!("{}({})", location.file, location.line)
    } else {
        format!("{}:{}", location.file, location.line)
    }
}
