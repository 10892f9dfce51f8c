//! Tattle: mock verification failures, reported where the host framework
//! can see them.
//!
//! A mock engine knows *that* an expectation was violated; the host test
//! framework owns *recording* the failure. Tattle sits between the two: it
//! formats each verification event, recovers a useful source position for
//! events that lack one (by filtering a captured backtrace down to the first
//! frame of user test code), quotes the failing statement when the source is
//! readable, and submits the finished report to an assertion sink.
//!
//! Collaborators are seams, not dependencies: the formatter
//! ([`EventFormatter`]), stack capture ([`stack::StackSource`]), and the
//! sink ([`AssertionSink`]) are all injectable, so the filtering and
//! formatting logic is testable with canned stacks and a recording sink. For
//! one-line registration against a mock engine, [`TattleBridge::global`]
//! provides a lazily-built process-wide instance with default wiring.

pub use crate::adapter::FailureReportingAdapter;
pub use crate::bridge::TattleBridge;
pub use crate::event::{
    NoMoreInvocationsEvent, SequenceMismatchEvent, SourceLocation, UnexpectedCallEvent,
    UnexpectedKind, VerificationEvent,
};
pub use crate::format::{DefaultEventFormatter, EventFormatter};
pub use crate::report::VerificationFailure;
pub use crate::sink::{AssertionSink, CheckKind, FailureRecord, RecordingSink, ResultKind};

pub mod adapter;
pub mod bridge;
pub mod event;
pub mod format;
pub mod report;
pub mod sink;
pub mod snippet;
pub mod stack;
