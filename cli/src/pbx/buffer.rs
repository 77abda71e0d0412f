//! # Pbxpatch Line Buffer
//!
//! File: cli/src/pbx/buffer.rs
//!
//! ## Overview
//!
//! An ordered, mutable sequence of text lines, the substrate every other
//! part of the pbx engine operates on. The project file is loaded into a
//! `LineBuffer` once, mutated in place by each injection pass, and serialized
//! back out exactly once at the end.
//!
//! ## Architecture
//!
//! A line's position is implied by its index in the underlying `Vec`; it is
//! not stored on the line itself. That means every insertion shifts all
//! subsequent indices: any caller that computed line numbers before a
//! mutation must treat them as stale afterwards. The injector honors this by
//! re-locating sections after every pass and by applying multiple insertions
//! within a pass from the highest index down (see `pbx::inject`).
//!
use std::ops::Range;

/// Ordered, mutable sequence of lines with positional insertion.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Builds a buffer from raw file content, splitting on line endings.
    ///
    /// Both `\n` and `\r\n` endings are accepted; the buffer stores lines
    /// without their terminators and re-serializes with `\n`.
    pub fn from_content(content: &str) -> Self {
        let lines = content.lines().map(str::to_string).collect();
        Self { lines }
    }

    /// Number of lines currently in the buffer.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the buffer holds no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the line at `index`, or `None` when out of range.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Read-only view of all lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Inserts a single line at `index`, shifting everything after it down.
    ///
    /// `index == len()` appends. Panics if `index > len()`, matching `Vec`
    /// insertion semantics. Callers derive indices from locator results
    /// against the current buffer, so an out-of-range index is a logic bug.
    pub fn insert(&mut self, index: usize, line: String) {
        self.lines.insert(index, line);
    }

    /// Splices a whole block of lines at `index` as one insertion.
    ///
    /// The block appears in the buffer in iteration order. Splicing once is
    /// what keeps offset bookkeeping simple: a block of `k` lines shifts
    /// every line at or after `index` by exactly `k`.
    pub fn insert_block<I>(&mut self, index: usize, block: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.lines.splice(index..index, block);
    }

    /// Scans the line range `[range.start, range.end)` for a substring.
    ///
    /// Out-of-range portions of `range` are ignored rather than panicking,
    /// since ranges come from locator results that may abut the buffer end.
    pub fn range_contains(&self, range: Range<usize>, needle: &str) -> bool {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        self.lines[start..end].iter().any(|l| l.contains(needle))
    }

    /// Serializes the buffer back to file content with a trailing newline.
    pub fn to_content(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(lines: &[&str]) -> LineBuffer {
        LineBuffer::from_content(&lines.join("\n"))
    }

    #[test]
    fn test_from_content_splits_lines() {
        let buf = LineBuffer::from_content("a\nb\r\nc\n");
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.line(0), Some("a"));
        assert_eq!(buf.line(1), Some("b"));
        assert_eq!(buf.line(2), Some("c"));
        assert_eq!(buf.line(3), None);
    }

    #[test]
    fn test_insert_shifts_subsequent_lines() {
        let mut buf = buffer(&["a", "b", "c"]);
        buf.insert(1, "x".to_string());
        assert_eq!(buf.lines(), &["a", "x", "b", "c"]);
    }

    /// Insertion offset correctness: k insertions at strictly decreasing
    /// indices leave every surviving line at
    /// `original_index + (insertions with target <= original_index)`.
    #[test]
    fn test_decreasing_insertions_preserve_earlier_indices() {
        let original: Vec<String> = (0..6).map(|i| format!("line{i}")).collect();
        let mut buf = buffer(&original.iter().map(String::as_str).collect::<Vec<_>>());

        let targets = [5usize, 3, 1];
        for &t in &targets {
            buf.insert(t, format!("ins@{t}"));
        }

        assert_eq!(buf.len(), original.len() + targets.len());
        for (orig_idx, line) in original.iter().enumerate() {
            let shift = targets.iter().filter(|&&t| t <= orig_idx).count();
            assert_eq!(buf.line(orig_idx + shift), Some(line.as_str()));
        }
    }

    #[test]
    fn test_insert_block_is_single_splice() {
        let mut buf = buffer(&["top", "bottom"]);
        buf.insert_block(1, vec!["m1".to_string(), "m2".to_string()]);
        assert_eq!(buf.lines(), &["top", "m1", "m2", "bottom"]);
    }

    #[test]
    fn test_range_contains_clamps_bounds() {
        let buf = buffer(&["alpha", "beta", "gamma"]);
        assert!(buf.range_contains(0..3, "beta"));
        assert!(!buf.range_contains(0..1, "beta"));
        // A range past the end is clamped, not a panic.
        assert!(buf.range_contains(2..99, "gamma"));
        assert!(!buf.range_contains(5..99, "gamma"));
    }

    #[test]
    fn test_round_trip_appends_trailing_newline() {
        let buf = buffer(&["a", "b"]);
        assert_eq!(buf.to_content(), "a\nb\n");
    }
}
