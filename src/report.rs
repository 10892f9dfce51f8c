//! Rendered verification failures.
//!
//! [`VerificationFailure`] is the diagnostic form of a [`FailureRecord`]: an
//! error type the host framework (or an embedder) can render with full
//! source context. When the failing file is still readable, a small window
//! around the failing line is attached as miette source code so the report
//! shows the statement in place. Snippet lookup is best-effort and its
//! absence never blocks the report.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use thiserror::Error;

use crate::event::SourceLocation;
use crate::sink::{CheckKind, FailureRecord, ResultKind};
use crate::snippet;

// Lines of surrounding context to attach on each side of the failing line.
const SNIPPET_CONTEXT: u32 = 2;

/// A verification failure in renderable form. Retains the originating check,
/// location, and calling method so embedders can route or filter failures
/// without re-parsing the message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct VerificationFailure {
    check: CheckKind,
    location: SourceLocation,
    calling_method: Option<String>,
    expected: Option<String>,
    message: String,
    result: ResultKind,
    source_code: Option<NamedSource<String>>,
    span: Option<SourceSpan>,
}

impl VerificationFailure {
    /// Builds the renderable failure, attaching a source window when the
    /// failing file is readable at the recorded line.
    pub fn from_record(record: FailureRecord) -> Self {
        let (source_code, span) = snippet_window(&record.location);
        Self {
            check: record.check,
            location: record.location,
            calling_method: record.calling_method,
            expected: record.expected,
            message: record.message,
            result: record.result,
            source_code,
            span,
        }
    }

    pub fn check(&self) -> CheckKind {
        self.check
    }

    pub fn file(&self) -> &str {
        &self.location.file
    }

    pub fn line(&self) -> u32 {
        self.location.line
    }

    pub fn calling_method(&self) -> Option<&str> {
        self.calling_method.as_deref()
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    pub fn result(&self) -> ResultKind {
        self.result
    }
}

impl Diagnostic for VerificationFailure {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("tattle::{}", self.check.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.expected
            .as_ref()
            .map(|e| Box::new(format!("expected pattern: {e}")) as Box<dyn std::fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source_code.as_ref().map(|s| s as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = match &self.calling_method {
            Some(method) => format!("verification failed in {method}"),
            None => "verification failed here".to_string(),
        };
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(label),
            span,
        ))))
    }
}

/// Reads a window of lines around the failing location and computes the span
/// of the failing line within it. `None` when nothing is readable there.
fn snippet_window(location: &SourceLocation) -> (Option<NamedSource<String>>, Option<SourceSpan>) {
    let lines = snippet::surrounding_lines(&location.file, location.line, SNIPPET_CONTEXT);
    if lines.is_empty() {
        return (None, None);
    }
    let mut content = String::new();
    let mut offset = 0usize;
    let mut span = None;
    for line in &lines {
        if line.number == location.line {
            span = Some(SourceSpan::from(offset..offset + line.text.len().max(1)));
        }
        content.push_str(&line.text);
        content.push('\n');
        offset += line.text.len() + 1;
    }
    let source = NamedSource::new(location.file.clone(), content);
    (Some(source), span)
}
