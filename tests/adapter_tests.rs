//! End-to-end adapter behavior: events in, failure records out.
//!
//! These tests drive [`FailureReportingAdapter`] with canned stacks and a
//! recording sink, so every observable property of the reporting contract is
//! checked without a live mock engine, a real backtrace, or a panicking
//! sink.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use predicates::prelude::*;
use tattle::stack::{ResolvedFrame, StackSource};
use tattle::{
    CheckKind, DefaultEventFormatter, EventFormatter, FailureReportingAdapter,
    NoMoreInvocationsEvent, RecordingSink, ResultKind, SequenceMismatchEvent, SourceLocation,
    UnexpectedCallEvent, UnexpectedKind, VerificationEvent,
};

/// Stack source returning a canned stack, truncated at the requested depth
/// like a real capture.
struct FixedStack(Vec<ResolvedFrame>);

impl StackSource for FixedStack {
    fn capture(&self, max_depth: usize) -> Vec<ResolvedFrame> {
        self.0.iter().take(max_depth).cloned().collect()
    }
}

fn frame(file: &str, line: u32, function: &str) -> ResolvedFrame {
    ResolvedFrame {
        file: file.to_string(),
        line,
        function: function.to_string(),
    }
}

fn adapter_over(frames: Vec<ResolvedFrame>) -> (FailureReportingAdapter, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::new());
    let adapter = FailureReportingAdapter::new(
        Box::new(DefaultEventFormatter),
        Box::new(FixedStack(frames)),
        Box::new(sink.clone()),
    );
    (adapter, sink)
}

fn unexpected_call() -> VerificationEvent {
    VerificationEvent::UnexpectedCall(UnexpectedCallEvent {
        kind: UnexpectedKind::Unmatched,
        invocation: "mock.render(7)".to_string(),
    })
}

// Frames that belong to reporting infrastructure under the default filter.
fn infra_frames() -> Vec<ResolvedFrame> {
    vec![
        frame(
            "/home/user/.cargo/registry/src/index/backtrace-0.3.69/src/capture.rs",
            88,
            "backtrace::capture::Backtrace::new",
        ),
        frame(
            "/rustc/abc123/library/std/src/panicking.rs",
            10,
            "std::panicking::try",
        ),
    ]
}

mod located_event_tests {
    use super::*;

    #[test]
    fn sequence_mismatch_reports_at_recorded_location() {
        let event = VerificationEvent::SequenceMismatch(SequenceMismatchEvent {
            location: SourceLocation::new("seq_test.cc", 10),
            expected_pattern: vec!["A".to_string(), "B".to_string()],
            actual_sequence: vec!["B".to_string()],
        });
        let (adapter, sink) = adapter_over(vec![]);
        adapter.handle(&event);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.check, CheckKind::Verify);
        assert_eq!(record.location, SourceLocation::new("seq_test.cc", 10));
        assert_eq!(record.expected.as_deref(), Some("A,B"));
        assert_eq!(record.result, ResultKind::ExpressionFailed);

        // The message embeds the formatter's rendering verbatim.
        let formatted = DefaultEventFormatter.format(&event);
        assert!(predicate::str::contains(formatted).eval(&record.message));
        assert!(predicate::str::contains("seq_test.cc").eval(&record.message));
        assert!(predicate::str::contains("A,B").eval(&record.message));
    }

    #[test]
    fn no_more_invocations_reports_at_recorded_location() {
        let event = VerificationEvent::NoMoreInvocations(NoMoreInvocationsEvent {
            location: SourceLocation::new("exhausted_test.rs", 77),
            unverified: vec!["mock.close()".to_string()],
        });
        let (adapter, sink) = adapter_over(vec![]);
        adapter.handle(&event);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.check, CheckKind::VerifyNoMoreInvocations);
        assert_eq!(record.location, SourceLocation::new("exhausted_test.rs", 77));
        assert_eq!(record.expected, None);
        assert!(predicate::str::contains("mock.close()").eval(&record.message));
    }

    #[test]
    fn located_events_never_touch_the_stack() {
        // A stack full of reportable user frames must not change where a
        // located event is reported from.
        let event = VerificationEvent::SequenceMismatch(SequenceMismatchEvent {
            location: SourceLocation::new("seq_test.cc", 10),
            expected_pattern: vec!["A".to_string()],
            actual_sequence: vec![],
        });
        let (adapter, sink) = adapter_over(vec![frame("other_test.rs", 5, "other_test::run")]);
        adapter.handle(&event);

        let record = &sink.records()[0];
        assert_eq!(record.location, SourceLocation::new("seq_test.cc", 10));
        assert!(!record.message.contains("other_test.rs"));
    }
}

mod unexpected_call_tests {
    use super::*;

    #[test]
    fn reports_first_non_excluded_frame() {
        let mut frames = infra_frames();
        frames.push(frame("widget_test.cc", 42, "widget_test::calls_mock"));
        frames.push(frame("widget_test.cc", 80, "widget_test::run_suite"));
        frames.push(frame("widget_test.cc", 95, "widget_test::main"));
        frames.push(frame("/launcher/src/boot.rs", 3, "launcher::boot"));
        let (adapter, sink) = adapter_over(frames);
        adapter.handle(&unexpected_call());

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.check, CheckKind::UnexpectedCall);
        assert_eq!(record.location, SourceLocation::new("widget_test.cc", 42));
        assert_eq!(record.calling_method.as_deref(), Some("widget_test::calls_mock"));
        assert_eq!(record.result, ResultKind::ExplicitFailure);

        assert!(predicate::str::contains("Failed statement").eval(&record.message));
        assert!(predicate::str::contains("Stacktrace").eval(&record.message));
        // Every surviving frame up to main is listed, innermost first.
        assert!(predicate::str::contains("widget_test.cc:42 widget_test::calls_mock")
            .eval(&record.message));
        assert!(predicate::str::contains("widget_test.cc:80 widget_test::run_suite")
            .eval(&record.message));
        // Infrastructure and frames beyond main are not.
        assert!(!record.message.contains("backtrace-0.3.69"));
        assert!(!record.message.contains("launcher"));
    }

    #[test]
    fn fully_excluded_stack_uses_placeholder_location() {
        let (adapter, sink) = adapter_over(infra_frames());
        adapter.handle(&unexpected_call());

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.location, SourceLocation::unknown());
        assert_eq!(record.location.file, "Unknown file");
        assert_eq!(record.location.line, 0);
        assert_eq!(record.calling_method, None);
        // No appended sections: the message is exactly the formatter output.
        assert_eq!(record.message, DefaultEventFormatter.format(&unexpected_call()));
    }

    #[test]
    fn empty_capture_behaves_like_fully_excluded() {
        let (adapter, sink) = adapter_over(vec![]);
        adapter.handle(&unexpected_call());
        assert_eq!(sink.records()[0].location, SourceLocation::unknown());
    }

    #[test]
    fn single_frame_stack_reports_that_frame() {
        let (adapter, sink) = adapter_over(vec![frame(
            "widget_test.cc",
            42,
            "widget_test::calls_mock",
        )]);
        adapter.handle(&unexpected_call());
        assert_eq!(
            sink.records()[0].location,
            SourceLocation::new("widget_test.cc", 42)
        );
    }

    #[test]
    fn frames_beyond_the_depth_bound_are_absent() {
        // 40 reportable frames, no entry point: the capture bound of 32
        // truncates the trace, and nothing deeper may appear in it.
        let frames: Vec<ResolvedFrame> = (0..40)
            .map(|i| frame(&format!("user_{i}.rs"), i + 1, &format!("user::f{i}")))
            .collect();
        let (adapter, sink) = adapter_over(frames);
        adapter.handle(&unexpected_call());

        let record = &sink.records()[0];
        assert_eq!(record.location, SourceLocation::new("user_0.rs", 1));
        assert!(record.message.contains("user_31.rs"));
        assert!(!record.message.contains("user_32.rs"));
        assert!(!record.message.contains("user_39.rs"));
    }

    #[test]
    fn custom_filter_excludes_embedder_infrastructure() {
        use tattle::stack::FrameFilter;

        let sink = Arc::new(RecordingSink::new());
        let frames = vec![
            frame("/harness/src/my_harness.rs", 8, "my_harness::invoke"),
            frame("widget_test.cc", 42, "widget_test::calls_mock"),
        ];
        let adapter = FailureReportingAdapter::new(
            Box::new(DefaultEventFormatter),
            Box::new(FixedStack(frames)),
            Box::new(sink.clone()),
        )
        .with_filter(FrameFilter::new().exclude_suffix("my_harness.rs"));
        adapter.handle(&unexpected_call());

        let record = &sink.records()[0];
        assert_eq!(record.location, SourceLocation::new("widget_test.cc", 42));
        assert!(!record.message.contains("my_harness.rs"));
    }

    #[test]
    fn unreadable_source_still_produces_both_sections() {
        let (adapter, sink) = adapter_over(vec![frame(
            "widget_test.cc",
            42,
            "widget_test::calls_mock",
        )]);
        adapter.handle(&unexpected_call());

        let record = &sink.records()[0];
        assert!(predicate::str::contains("Failed statement").eval(&record.message));
        assert!(predicate::str::contains("Stacktrace").eval(&record.message));
    }

    #[test]
    fn readable_source_quotes_the_failing_statement() {
        let path = fixture_source_file(42, "    mock.widget.render(frame);");
        let file = path.to_str().unwrap().to_string();
        let (adapter, sink) = adapter_over(vec![frame(&file, 42, "widget_test::calls_mock")]);
        adapter.handle(&unexpected_call());

        let record = &sink.records()[0];
        assert_eq!(record.location, SourceLocation::new(&file, 42));
        assert!(predicate::str::contains("mock.widget.render(frame);").eval(&record.message));
        assert!(predicate::str::contains("Failed statement").eval(&record.message));
        std::fs::remove_file(path).ok();
    }

    /// Writes a fixture source file whose line `line` is `statement`.
    fn fixture_source_file(line: u32, statement: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "tattle_adapter_fixture_{}_{line}.rs",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        for n in 1..=line + 3 {
            if n == line {
                writeln!(file, "{statement}").unwrap();
            } else {
                writeln!(file, "// filler line {n}").unwrap();
            }
        }
        path
    }
}

mod record_integrity_tests {
    use super::*;

    #[test]
    fn each_event_produces_exactly_one_record() {
        let events = vec![
            unexpected_call(),
            VerificationEvent::SequenceMismatch(SequenceMismatchEvent {
                location: SourceLocation::new("seq_test.cc", 10),
                expected_pattern: vec!["A".to_string()],
                actual_sequence: vec![],
            }),
            VerificationEvent::NoMoreInvocations(NoMoreInvocationsEvent {
                location: SourceLocation::new("seq_test.cc", 11),
                unverified: vec![],
            }),
        ];
        let (adapter, sink) = adapter_over(vec![frame("t.rs", 1, "t::main")]);
        for event in &events {
            adapter.handle(event);
        }
        assert_eq!(sink.records().len(), events.len());
    }

    #[test]
    fn handling_an_equivalent_event_twice_yields_identical_messages() {
        let event = VerificationEvent::SequenceMismatch(SequenceMismatchEvent {
            location: SourceLocation::new("seq_test.cc", 10),
            expected_pattern: vec!["A".to_string(), "B".to_string()],
            actual_sequence: vec!["B".to_string()],
        });
        let (adapter, sink) = adapter_over(vec![]);
        adapter.handle(&event);
        adapter.handle(&event.clone());
        let records = sink.records();
        assert_eq!(records[0].message, records[1].message);
    }
}
