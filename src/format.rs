//! Event formatting.
//!
//! A formatter turns a [`VerificationEvent`] into the display text that ends
//! up in the failure report. Formatting is a pure function of the event:
//! formatting the same event twice yields identical text, and no formatter
//! state survives a call.

use crate::event::{
    NoMoreInvocationsEvent, SequenceMismatchEvent, UnexpectedCallEvent, UnexpectedKind,
    VerificationEvent,
};

/// Renders verification events as display text. Implementations must be
/// pure: the output depends only on the event.
pub trait EventFormatter: Send + Sync {
    fn format(&self, event: &VerificationEvent) -> String;
}

/// The stock formatter. Output style follows the mock engine's own report
/// wording so failures read the same wherever they surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultEventFormatter;

impl DefaultEventFormatter {
    /// Renders an expected call pattern as a single line, matchers joined
    /// with commas, e.g. `mock.a(),mock.b()`.
    pub fn format_expected_pattern(pattern: &[String]) -> String {
        pattern.join(",")
    }

    fn format_unexpected(&self, evt: &UnexpectedCallEvent) -> String {
        let reason = match evt.kind {
            UnexpectedKind::Unmocked => "an unmocked method was invoked",
            UnexpectedKind::Unmatched => "no recorded behavior matched this invocation",
        };
        format!(
            "Unexpected method invocation: {}\n  {}.",
            evt.invocation, reason
        )
    }

    fn format_sequence(&self, evt: &SequenceMismatchEvent) -> String {
        let mut out = format!(
            "Verification error: expected pattern {} was not matched.",
            Self::format_expected_pattern(&evt.expected_pattern)
        );
        if evt.actual_sequence.is_empty() {
            out.push_str("\n  Actual sequence: <empty>");
        } else {
            out.push_str("\n  Actual sequence:");
            for invocation in &evt.actual_sequence {
                out.push_str("\n    ");
                out.push_str(invocation);
            }
        }
        out
    }

    fn format_no_more(&self, evt: &NoMoreInvocationsEvent) -> String {
        let mut out = format!(
            "Verification error: expected no more invocations, but found {}.",
            evt.unverified.len()
        );
        for invocation in &evt.unverified {
            out.push_str("\n    ");
            out.push_str(invocation);
        }
        out
    }
}

impl EventFormatter for DefaultEventFormatter {
    fn format(&self, event: &VerificationEvent) -> String {
        match event {
            VerificationEvent::UnexpectedCall(evt) => self.format_unexpected(evt),
            VerificationEvent::SequenceMismatch(evt) => self.format_sequence(evt),
            VerificationEvent::NoMoreInvocations(evt) => self.format_no_more(evt),
        }
    }
}
