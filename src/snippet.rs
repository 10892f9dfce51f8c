//! Best-effort source snippet lookup.
//!
//! Failure reports quote the failing statement when the originating source
//! file is readable. Nothing here can fail a report: an unreadable file, an
//! out-of-range line, or a binary-only build simply yields no snippet.

use std::fs;

/// One fetched source line, numbered as in the file (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetLine {
    pub number: u32,
    pub text: String,
}

/// Fetches the window of lines `[line - context, line + context]` from
/// `path`, clamped to the file. `line` is 1-based. Returns an empty vector
/// when the file cannot be read or the line is out of range.
pub fn surrounding_lines(path: &str, line: u32, context: u32) -> Vec<SnippetLine> {
    if line == 0 {
        return Vec::new();
    }
    let Ok(content) = fs::read_to_string(path) else {
        return Vec::new();
    };
    let first = line.saturating_sub(context).max(1);
    let last = line.saturating_add(context);
    let mut lines = Vec::new();
    for (idx, text) in content.lines().enumerate() {
        let number = idx as u32 + 1;
        if number < first {
            continue;
        }
        if number > last {
            break;
        }
        lines.push(SnippetLine {
            number,
            text: text.to_string(),
        });
    }
    // A window that never reached the requested line means the file is
    // shorter than `line`; treat that as no snippet at all.
    if !lines.iter().any(|l| l.number == line) {
        return Vec::new();
    }
    lines
}

/// Fetches exactly the requested line, when readable.
pub fn source_line(path: &str, line: u32) -> Option<String> {
    surrounding_lines(path, line, 0)
        .into_iter()
        .find(|l| l.number == line)
        .map(|l| l.text)
}
