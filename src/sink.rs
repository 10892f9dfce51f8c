//! Assertion sink seam.
//!
//! The adapter never decides what a failure *does*; it hands a finished
//! [`FailureRecord`] to an [`AssertionSink`] and the sink owns everything
//! after that. [`PanicSink`] is the binding to the host test framework: it
//! renders the record as a diagnostic and panics, which the Rust test runner
//! records as the test's failure. [`RecordingSink`] captures records for
//! harnesses that want to inspect them instead.

use std::fmt;
use std::sync::Mutex;

use crate::event::SourceLocation;
use crate::report::VerificationFailure;

/// Which verification check produced a failure. Labels keep the mock
/// engine's traditional check names so reports read the same to users of the
/// original adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    UnexpectedCall,
    Verify,
    VerifyNoMoreInvocations,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::UnexpectedCall => "UnexpectedMethodCall",
            CheckKind::Verify => "Verify",
            CheckKind::VerifyNoMoreInvocations => "VerifyNoMoreInvocations",
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            CheckKind::UnexpectedCall => "unexpected_call",
            CheckKind::Verify => "sequence",
            CheckKind::VerifyNoMoreInvocations => "no_more_invocations",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the failure should be classified by the host framework. Verify-style
/// checks fail an expression the user wrote; an unexpected call has no such
/// expression and is an explicit failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    ExpressionFailed,
    ExplicitFailure,
}

/// The terminal artifact of one handled event. Owned by the sink after
/// submission; the adapter never sees it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub check: CheckKind,
    pub location: SourceLocation,
    /// Function containing the failing frame, when one was identified.
    pub calling_method: Option<String>,
    /// Expected-pattern text for verify-style checks.
    pub expected: Option<String>,
    pub message: String,
    pub result: ResultKind,
}

/// Receives finished failure records. Submission may propagate failure
/// non-locally; callers must not assume it returns.
pub trait AssertionSink: Send + Sync {
    fn submit(&self, record: FailureRecord);
}

impl<T: AssertionSink + ?Sized> AssertionSink for std::sync::Arc<T> {
    fn submit(&self, record: FailureRecord) {
        (**self).submit(record)
    }
}

/// Default sink: renders the record as a miette report and panics with it,
/// which the host test runner records as the current test's failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicSink;

impl AssertionSink for PanicSink {
    fn submit(&self, record: FailureRecord) {
        let failure = VerificationFailure::from_record(record);
        let report = miette::Report::new(failure);
        panic!("{report:?}");
    }
}

/// Sink that stores every submitted record, for harnesses and tests that
/// inspect failures instead of aborting on them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<FailureRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything submitted so far, in submission order.
    pub fn records(&self) -> Vec<FailureRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Removes and returns all submitted records.
    pub fn drain(&self) -> Vec<FailureRecord> {
        std::mem::take(&mut *self.records.lock().unwrap())
    }
}

impl AssertionSink for RecordingSink {
    fn submit(&self, record: FailureRecord) {
        self.records.lock().unwrap().push(record);
    }
}
