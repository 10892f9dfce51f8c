//! Verification event model.
//!
//! Events are transient value objects raised by the mock engine when a
//! recorded expectation is violated. Each event is handled exactly once by
//! the reporting adapter and then discarded; nothing here is persisted or
//! shared across events.

use std::fmt;

/// A recorded source position, as captured by the mock engine at the
/// verification call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Placeholder used when no call site could be determined.
    pub fn unknown() -> Self {
        Self {
            file: "Unknown file".to_string(),
            line: 0,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Why an invocation could not be matched against recorded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnexpectedKind {
    /// The method has no recorded behavior at all.
    Unmocked,
    /// The method is mocked, but no recorded behavior matched the arguments.
    Unmatched,
}

/// A call arrived that no expectation covers. Raised from inside the mocked
/// call itself, so the interesting source position lives in the captured
/// stack rather than on the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnexpectedCallEvent {
    pub kind: UnexpectedKind,
    /// Textual rendering of the offending invocation, e.g. `mock.fetch(7)`.
    pub invocation: String,
}

/// A `verify` over an invocation sequence did not match the recorded calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceMismatchEvent {
    /// The verification call site recorded by the mock engine.
    pub location: SourceLocation,
    /// Matcher descriptions making up the expected pattern, in order.
    pub expected_pattern: Vec<String>,
    /// Renderings of the invocations that were actually observed.
    pub actual_sequence: Vec<String>,
}

/// A `verify_no_more_invocations` found invocations left unverified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMoreInvocationsEvent {
    pub location: SourceLocation,
    /// Renderings of the invocations that were never covered by a verify.
    pub unverified: Vec<String>,
}

/// The closed set of verification failures a mock engine can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationEvent {
    UnexpectedCall(UnexpectedCallEvent),
    SequenceMismatch(SequenceMismatchEvent),
    NoMoreInvocations(NoMoreInvocationsEvent),
}

impl VerificationEvent {
    /// The source position recorded on the event, when the variant carries
    /// one. Unexpected calls do not: their position is recovered from the
    /// captured stack instead.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            VerificationEvent::UnexpectedCall(_) => None,
            VerificationEvent::SequenceMismatch(evt) => Some(&evt.location),
            VerificationEvent::NoMoreInvocations(evt) => Some(&evt.location),
        }
    }
}
