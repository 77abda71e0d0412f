//! # Pbxpatch Section Locator
//!
//! File: cli/src/pbx/locate.rs
//!
//! ## Overview
//!
//! Finds the line ranges of pbxproj constructs so the injector knows where
//! to splice new content. Two complementary strategies are provided:
//!
//! - **Comment-anchored** (`locate_delimited`, `locate_sections`): walks a
//!   bounded line range sequentially, pairing a begin-pattern line with the
//!   next end-pattern line. This is how the canonical
//!   `/* Begin X section */ ... /* End X section */` blocks are found,
//!   including *empty* sections, which contain no records to match on, and
//!   how every inner list construct (`files = (`, `children = (`,
//!   `buildSettings = {`, `FRAMEWORK_SEARCH_PATHS = (`, `OTHER_LDFLAGS = (`)
//!   is found inside an already-located outer range.
//! - **Scope-anchored** (`locate_scopes_containing`): runs a fresh brace
//!   scan and reports every scope whose text contains a marker substring
//!   such as `isa = PBXGroup`. Robust to cosmetic comment drift across
//!   Xcode/Unity versions, but blind to empty sections; the injector uses
//!   it for record-level sections (build phases, groups, build
//!   configurations).
//!
//! ## Range conventions
//!
//! All ranges are half-open `[start, end)`:
//! - Comment-anchored ranges cover the section *interior*: `start` is the
//!   first line after the begin anchor and `end` is the end-anchor line
//!   itself. Inserting at `start` lands at the top of the section; inserting
//!   at `end` lands immediately before the closing anchor. An empty section
//!   yields `start == end`.
//! - Scope-anchored ranges cover the *whole scope*: `start` is the line
//!   holding the opening brace and `end` is one past the line holding the
//!   closing brace.
//!
//! Ranges are only valid against the exact buffer they were computed from;
//! the injector re-locates after every mutation.
//!
use crate::pbx::buffer::LineBuffer;
use crate::pbx::scanner::{self, Scope};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;
use tracing::debug;

/// A located construct: half-open line range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionRange {
    pub start: usize,
    pub end: usize,
}

impl SectionRange {
    /// The range as a `std::ops::Range` for buffer scans.
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

// Fixed anchors for the inner list constructs. These appear one per line in
// every pbxproj Unity or Xcode emits; indentation varies, so only leading
// whitespace is left flexible.
pub static FILES_LIST_BEGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*files = \(\s*$").expect("invalid files-list anchor"));
pub static CHILDREN_LIST_BEGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*children = \(\s*$").expect("invalid children-list anchor"));
pub static LIST_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\);\s*$").expect("invalid list-end anchor"));
pub static BUILD_SETTINGS_BEGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*buildSettings = \{\s*$").expect("invalid buildSettings anchor"));
pub static BLOCK_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\};\s*$").expect("invalid block-end anchor"));
pub static FRAMEWORK_SEARCH_PATHS_BEGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*FRAMEWORK_SEARCH_PATHS = \(\s*$").expect("invalid search-paths anchor")
});
pub static OTHER_LDFLAGS_BEGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*OTHER_LDFLAGS = \(\s*$").expect("invalid ldflags anchor"));

/// Builds the begin/end anchor pair for a named top-level section, e.g.
/// `/* Begin PBXBuildFile section */` / `/* End PBXBuildFile section */`.
///
/// Matching is case-insensitive and whitespace-tolerant since the exact
/// comment formatting has drifted across Xcode versions.
pub fn section_anchors(section_name: &str) -> (Regex, Regex) {
    let name = regex::escape(section_name);
    let begin = Regex::new(&format!(
        r"(?i)^\s*/\*\s*Begin\s+{name}\s+section\s*\*/\s*$"
    ))
    .expect("invalid begin-section anchor");
    let end = Regex::new(&format!(
        r"(?i)^\s*/\*\s*End\s+{name}\s+section\s*\*/\s*$"
    ))
    .expect("invalid end-section anchor");
    (begin, end)
}

/// Comment-anchored locator: pairs begin/end anchor lines sequentially
/// within `search`, returning the interior range of every disjoint pair.
///
/// Tracking is strictly sequential:
/// - a begin match (re)arms the pending begin, so a begin followed by
///   another begin tracks the later one;
/// - an end match with no pending begin is discarded (a stray `end` from a
///   preceding unmatched construct must not be misattributed);
/// - a completed pair resets tracking, so only sibling-level constructs are
///   found; a construct nested inside a started-but-unclosed one is not
///   separately reported.
pub fn locate_delimited(
    buffer: &LineBuffer,
    search: Range<usize>,
    begin: &Regex,
    end: &Regex,
) -> Vec<SectionRange> {
    let mut found = Vec::new();
    let mut pending_begin: Option<usize> = None;

    let stop = search.end.min(buffer.len());
    let mut line_idx = search.start.min(stop);
    while line_idx < stop {
        // The buffer is only read here, never mutated, so direct indexing
        // through `line()` stays in bounds.
        let line = buffer.line(line_idx).unwrap_or_default();
        if begin.is_match(line) {
            pending_begin = Some(line_idx);
        } else if end.is_match(line) {
            if let Some(begin_line) = pending_begin.take() {
                found.push(SectionRange {
                    start: begin_line + 1,
                    end: line_idx,
                });
            }
            // No pending begin: stray end, discarded.
        }
        line_idx += 1;
    }

    debug!(matches = found.len(), "comment-anchored locate finished");
    found
}

/// Locates every instance of a named top-level section by its canonical
/// begin/end comments, over the whole buffer.
pub fn locate_sections(buffer: &LineBuffer, section_name: &str) -> Vec<SectionRange> {
    let (begin, end) = section_anchors(section_name);
    locate_delimited(buffer, 0..buffer.len(), &begin, &end)
}

/// Scope-anchored locator: runs a fresh brace scan and reports, for every
/// scope whose text contains `marker`, the smallest-start/largest-end line
/// range spanning all of that scope's sealed spans.
///
/// Scopes are visited depth-first, self before children, so an outer scope
/// containing the marker is reported before (and as well as) any inner one.
pub fn locate_scopes_containing(buffer: &LineBuffer, marker: &str) -> Vec<SectionRange> {
    let outcome = scanner::scan(buffer, '{', '}');
    let mut found = Vec::new();
    if let Some(root) = outcome.root {
        collect_scopes_containing(buffer, &root, marker, &mut found);
    }
    debug!(marker, matches = found.len(), "scope-anchored locate finished");
    found
}

fn collect_scopes_containing(
    buffer: &LineBuffer,
    scope: &Scope,
    marker: &str,
    found: &mut Vec<SectionRange>,
) {
    if let Some(range) = scope_extent_if_containing(buffer, scope, marker) {
        found.push(range);
    }
    for child in &scope.children {
        collect_scopes_containing(buffer, child, marker, found);
    }
}

/// Checks this scope's own sealed spans (not its children's) for the marker
/// and returns the scope's overall line extent when found.
///
/// Unsealed spans (leftovers of unmatched opens) are skipped entirely, so
/// a structurally broken branch degrades to "not found" instead of producing
/// a bogus range.
fn scope_extent_if_containing(
    buffer: &LineBuffer,
    scope: &Scope,
    marker: &str,
) -> Option<SectionRange> {
    let mut contains = false;
    for span in scope.spans.iter().filter(|s| s.is_sealed()) {
        let (end_line, end_col) = match (span.end_line, span.end_col) {
            (Some(l), Some(c)) => (l, c),
            _ => continue,
        };
        for line_idx in span.start_line..=end_line {
            let line = match buffer.line(line_idx) {
                Some(l) => l,
                None => continue,
            };
            // Columns are byte offsets produced by char_indices, so slicing
            // with them is always on a character boundary.
            let text = if line_idx == span.start_line && line_idx == end_line {
                line.get(span.start_col..end_col)
            } else if line_idx == span.start_line {
                line.get(span.start_col..)
            } else if line_idx == end_line {
                line.get(..end_col)
            } else {
                Some(line)
            };
            if text.is_some_and(|t| t.contains(marker)) {
                contains = true;
            }
        }
    }

    if !contains {
        return None;
    }
    let start = scope.first_line()?;
    let end = scope.last_line()?;
    Some(SectionRange {
        start,
        end: end + 1,
    })
}
