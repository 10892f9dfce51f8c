//! Stack capture and frame filtering.
//!
//! When a mocked call fails unexpectedly, the interesting source position is
//! not on the event but somewhere in the caller's stack. This module captures
//! a bounded stack through an injectable [`StackSource`], then filters out
//! frames belonging to reporting infrastructure (this crate, the unwinding
//! library, the test framework's own runtime) so the report points at user
//! test code. The search is bounded above by the program entry point when one
//! is visible in the stack; when it is not, the whole stack is scanned.
//!
//! Every lookup here is best-effort. Frames that cannot be resolved to a
//! file and line produce no entry, and a stack with no surviving frames is a
//! valid outcome the caller must tolerate.

use once_cell::sync::Lazy;

/// Depth bound for stack capture. Frames beyond this are never resolved and
/// never appear in a trace listing.
pub const MAX_FRAMES: usize = 32;

/// One captured frame, fully resolved to a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFrame {
    pub file: String,
    pub line: u32,
    pub function: String,
}

/// Capture-and-resolve capability. Production code uses [`BacktraceSource`];
/// tests inject canned stacks so filtering stays deterministic.
pub trait StackSource: Send + Sync {
    /// Captures the current stack, innermost frame first, resolving at most
    /// `max_depth` frames. Frames without symbol information are omitted.
    fn capture(&self, max_depth: usize) -> Vec<ResolvedFrame>;
}

/// [`StackSource`] backed by the `backtrace` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BacktraceSource;

impl StackSource for BacktraceSource {
    fn capture(&self, max_depth: usize) -> Vec<ResolvedFrame> {
        let mut frames = Vec::new();
        let mut depth = 0usize;
        backtrace::trace(|frame| {
            if depth >= max_depth {
                return false;
            }
            depth += 1;
            backtrace::resolve_frame(frame, |symbol| {
                let name = match symbol.name() {
                    Some(name) => name.to_string(),
                    None => return,
                };
                let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                    return;
                };
                frames.push(ResolvedFrame {
                    file: file.display().to_string(),
                    line,
                    function: strip_symbol_hash(&name),
                });
            });
            true
        });
        frames
    }
}

/// Drops the trailing `::h<16 hex>` disambiguator rustc appends to legacy
/// mangled symbols, so entry-point matching sees `myapp::main` rather than
/// `myapp::main::h92c4f2a1d87be03a`.
fn strip_symbol_hash(name: &str) -> String {
    if let Some(idx) = name.rfind("::h") {
        let tail = &name[idx + 3..];
        if tail.len() == 16 && tail.bytes().all(|b| b.is_ascii_hexdigit()) {
            return name[..idx].to_string();
        }
    }
    name.to_string()
}

/// True for the program entry point, which bounds the frame search. Rust
/// symbolication renders it bare (`main`) or crate-qualified (`myapp::main`).
pub fn is_entry_point(function: &str) -> bool {
    function == "main" || function.ends_with("::main")
}

// Path fragments identifying infrastructure whose frames must never be
// reported as the failing location: the unwinding library itself, and the
// host test framework's runtime (std sources symbolicate under /rustc/).
static DEFAULT_FRAGMENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "/backtrace-",
        "backtrace/src/",
        "/rustc/",
        "library/test/",
        "library/std/",
        "library/core/",
    ]
});

/// Decides which frames belong to reporting infrastructure. Exclusion is by
/// source path: exact-suffix matches for crate-local files (the adapter adds
/// its own `file!()`), substring fragments for library code whose absolute
/// paths vary by toolchain and registry layout.
#[derive(Debug, Clone)]
pub struct FrameFilter {
    suffixes: Vec<String>,
    fragments: Vec<String>,
}

impl Default for FrameFilter {
    fn default() -> Self {
        Self {
            suffixes: vec![file!().to_string()],
            fragments: DEFAULT_FRAGMENTS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl FrameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes frames whose source path ends with `suffix`.
    pub fn exclude_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffixes.push(suffix.into());
        self
    }

    /// Excludes frames whose source path contains `fragment`.
    pub fn exclude_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragments.push(fragment.into());
        self
    }

    pub fn is_excluded(&self, frame: &ResolvedFrame) -> bool {
        self.suffixes.iter().any(|s| frame.file.ends_with(s))
            || self.fragments.iter().any(|f| frame.file.contains(f))
    }

    /// Applies the filter to a captured stack: finds the entry-point bound,
    /// then scans forward from the innermost frame collecting every
    /// non-excluded frame below the bound. The first survivor is the failing
    /// frame; `surviving` holds all of them in stack order.
    pub fn select<'a>(&self, frames: &'a [ResolvedFrame]) -> FrameSelection<'a> {
        let bound = entry_point_bound(frames).unwrap_or(frames.len());
        let mut failing = None;
        let mut surviving = Vec::new();
        for frame in &frames[..bound] {
            if self.is_excluded(frame) {
                continue;
            }
            if failing.is_none() {
                failing = Some(frame);
            }
            surviving.push(frame);
        }
        FrameSelection { failing, surviving }
    }
}

/// Result of filtering one captured stack.
#[derive(Debug)]
pub struct FrameSelection<'a> {
    /// First non-excluded frame below the entry-point bound, when any.
    pub failing: Option<&'a ResolvedFrame>,
    /// Every non-excluded frame below the bound, innermost first.
    pub surviving: Vec<&'a ResolvedFrame>,
}

/// Index of the entry-point frame, searched from the outermost frame inward.
/// The innermost frame is never considered: a failure raised directly inside
/// `main` still needs `main` itself as a reportable frame.
fn entry_point_bound(frames: &[ResolvedFrame]) -> Option<usize> {
    (1..frames.len())
        .rev()
        .find(|&i| is_entry_point(&frames[i].function))
}
