//! # Pbxpatch Brace Section Scanner
//!
//! File: cli/src/pbx/scanner.rs
//!
//! ## Overview
//!
//! Walks a `LineBuffer` character by character, tracking nested delimiter
//! scopes (`{` ... `}` for pbxproj files) and producing a tree of `Scope`
//! nodes. The pbxproj object table is a single outer brace scope containing
//! every named section as nested scopes keyed by their `isa = <Type>` line,
//! so brace tracking alone recovers section boundaries without a grammar
//! parser.
//!
//! ## Architecture
//!
//! Scanning is a pure function: `scan` takes the buffer and the two
//! delimiter characters explicitly and builds a fresh tree on every call.
//! There is no shared scanner instance and no state that survives between
//! calls, so two scans of the same unmodified buffer always yield
//! structurally identical trees.
//!
//! Each `Scope` records an ordered list of `Span`s rather than a single
//! range: when a nested scope closes, its parent picks up a *new* span
//! starting at the closing delimiter, so the parent's own text (the fringe
//! between its children) is covered exactly once across its spans. A span
//! whose end is still unset when the scan finishes belongs to an unmatched
//! open delimiter; searches skip such unsealed spans, which degrades to
//! "section not found" downstream instead of corrupting anything.
//!
//! Malformed input is never fatal:
//! - A closing delimiter with no open scope is counted and logged, and the
//!   scan continues.
//! - Unmatched opens leave their scopes on the tree with unsealed spans.
//!
use crate::pbx::buffer::LineBuffer;
use tracing::warn;

/// One contiguous (startLine, startCol) .. (endLine, endCol) region of a
/// scope. The end is `None` until the span is sealed by a delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: Option<usize>,
    pub end_col: Option<usize>,
}

impl Span {
    fn open(line: usize, col: usize) -> Self {
        Self {
            start_line: line,
            start_col: col,
            end_line: None,
            end_col: None,
        }
    }

    fn seal(&mut self, line: usize, col: usize) {
        self.end_line = Some(line);
        self.end_col = Some(col);
    }

    /// True once both ends of the span are known.
    pub fn is_sealed(&self) -> bool {
        self.end_line.is_some()
    }
}

/// One brace-delimited region of the file, possibly nested.
///
/// The tree owns its children; parent links exist only implicitly during the
/// scan (as the scan stack), which keeps ownership single-directional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub spans: Vec<Span>,
    pub children: Vec<Scope>,
}

impl Scope {
    fn starting_at(line: usize, col: usize) -> Self {
        Self {
            spans: vec![Span::open(line, col)],
            children: Vec::new(),
        }
    }

    fn seal_current_span(&mut self, line: usize, col: usize) {
        if let Some(span) = self.spans.last_mut() {
            span.seal(line, col);
        }
    }

    /// Smallest start line across sealed spans, if any span is sealed.
    pub fn first_line(&self) -> Option<usize> {
        self.spans
            .iter()
            .filter(|s| s.is_sealed())
            .map(|s| s.start_line)
            .min()
    }

    /// Largest end line across sealed spans, if any span is sealed.
    pub fn last_line(&self) -> Option<usize> {
        self.spans
            .iter()
            .filter_map(|s| s.end_line)
            .max()
    }
}

/// Result of one scan: the root scope (if the buffer contained any open
/// delimiter at all) plus a count of structural anomalies.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub root: Option<Scope>,
    /// Closing delimiters encountered with no open scope. Logged, non-fatal.
    pub unmatched_closes: usize,
}

/// Scans every character of every line, building the scope tree.
///
/// On `open`: if no scope is active a new root starts; otherwise the current
/// scope's active span is sealed at the delimiter and a child scope is
/// pushed. On `close`: with no scope active at all the anomaly is counted
/// and scanning continues; otherwise the current span is sealed and, unless
/// the current scope is the root, the finished scope is attached to its
/// parent and the parent opens a new span at the delimiter.
pub fn scan(buffer: &LineBuffer, open: char, close: char) -> ScanOutcome {
    // Stack of scopes under construction; index 0 is the root. Completed
    // scopes pop off and attach to the new top.
    let mut stack: Vec<Scope> = Vec::new();
    let mut unmatched_closes = 0usize;

    for (line_idx, line) in buffer.lines().iter().enumerate() {
        for (col_idx, ch) in line.char_indices() {
            if ch == open {
                if let Some(current) = stack.last_mut() {
                    current.seal_current_span(line_idx, col_idx);
                    stack.push(Scope::starting_at(line_idx, col_idx));
                } else {
                    stack.push(Scope::starting_at(line_idx, col_idx));
                }
            } else if ch == close {
                match stack.len() {
                    0 => {
                        unmatched_closes += 1;
                        warn!(
                            line = line_idx,
                            col = col_idx,
                            "closing delimiter without any open scope; input is malformed, continuing"
                        );
                    }
                    1 => {
                        // The root closes in place and stays current, so a
                        // later sibling open re-enters it as a new child.
                        stack[0].seal_current_span(line_idx, col_idx);
                    }
                    _ => {
                        if let Some(mut finished) = stack.pop() {
                            finished.seal_current_span(line_idx, col_idx);
                            if let Some(parent) = stack.last_mut() {
                                parent.children.push(finished);
                                // The parent resumes with a fresh span from
                                // the closing delimiter onward; the next
                                // delimiter seals it.
                                parent.spans.push(Span::open(line_idx, col_idx));
                            }
                        }
                    }
                }
            }
        }
    }

    // Unmatched opens: unwind whatever is left, attaching children without
    // sealing their dangling spans.
    while stack.len() > 1 {
        if let Some(dangling) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(dangling);
            }
        }
    }
    if unmatched_closes > 0 {
        warn!(unmatched_closes, "scan finished with structural anomalies");
    }

    ScanOutcome {
        root: stack.pop(),
        unmatched_closes,
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn scan_text(text: &str) -> ScanOutcome {
        scan(&LineBuffer::from_content(text), '{', '}')
    }

    #[test]
    fn test_empty_buffer_has_no_root() {
        let outcome = scan_text("no delimiters here\nat all");
        assert!(outcome.root.is_none());
        assert_eq!(outcome.unmatched_closes, 0);
    }

    #[test]
    fn test_single_scope_positions() {
        let outcome = scan_text("{ body }");
        let root = outcome.root.expect("root scope");
        assert!(root.children.is_empty());
        assert_eq!(root.spans.len(), 1);
        assert_eq!(root.spans[0].start_line, 0);
        assert_eq!(root.spans[0].start_col, 0);
        assert_eq!(root.spans[0].end_line, Some(0));
        assert_eq!(root.spans[0].end_col, Some(7));
    }

    #[test]
    fn test_nested_scopes_build_child_tree() {
        let outcome = scan_text("{\n  a = {\n    x;\n  };\n  b = {\n  };\n}");
        let root = outcome.root.expect("root scope");
        assert_eq!(root.children.len(), 2);
        // Children in encounter order.
        assert_eq!(root.children[0].spans[0].start_line, 1);
        assert_eq!(root.children[1].spans[0].start_line, 4);
        // The parent reopened a span after each child closed.
        assert!(root.spans.len() >= 3);
    }

    #[test]
    fn test_parent_resumes_span_after_child_closes() {
        let outcome = scan_text("{ pre { in } post }");
        let root = outcome.root.expect("root scope");
        assert_eq!(root.children.len(), 1);
        // First root span ends where the child opened.
        assert_eq!(root.spans[0].end_col, Some(6));
        // A later root span covers the "post" fringe and ends at the final brace.
        assert_eq!(root.last_line(), Some(0));
        assert_eq!(
            root.spans.last().and_then(|s| s.end_col),
            Some(18)
        );
    }

    /// Brace-balance invariant: unmatched closes are counted exactly and the
    /// scanner never panics.
    #[test]
    fn test_unmatched_closes_are_counted_not_fatal() {
        let outcome = scan_text("}}\n{ ok }");
        assert_eq!(outcome.unmatched_closes, 2);
        let root = outcome.root.expect("root scope still built");
        assert!(root.spans[0].is_sealed());
    }

    #[test]
    fn test_unmatched_open_leaves_unsealed_span() {
        let outcome = scan_text("{\n  child = {\n");
        let root = outcome.root.expect("root scope");
        assert_eq!(root.children.len(), 1);
        assert!(!root.children[0].spans[0].is_sealed());
        // The root's position is sealed at the child's opening brace and,
        // with the child never closing, no later root span opens.
        assert!(root.spans.last().expect("span").is_sealed());
        // No sealed span means no reported lines.
        assert_eq!(root.children[0].first_line(), None);
    }

    /// Idempotent scope discovery: scanning the same buffer twice yields
    /// structurally identical trees.
    #[test]
    fn test_scan_is_deterministic() {
        let text = "{\n  a = {\n    b = { };\n  };\n}";
        let buf = LineBuffer::from_content(text);
        let first = scan(&buf, '{', '}');
        let second = scan(&buf, '{', '}');
        assert_eq!(first.root, second.root);
        assert_eq!(first.unmatched_closes, second.unmatched_closes);
    }
}
