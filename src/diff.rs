//! Line-level diff between the input and output blobs, using the `similar`
//! crate.
//!
//! Lines are atomic tokens: the diff is an LCS over whole lines, never
//! characters. The flattened result drives both the textual diff preview and
//! the per-line gutter classification in the frontend.

use similar::{Algorithm, ChangeTag, TextDiff};

/// Sentinel line substituted when the two inputs are line-for-line identical.
pub const IDENTICAL_MESSAGE: &str = "(input and output are identical)";

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Added,
    Removed,
    Equal,
}

/// One line of the flattened diff, in edit-script order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DiffLine {
    pub text: String,
    pub kind: DiffKind,
}

/// Result of diffing two blobs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DiffResult {
    /// Line texts joined with `\n`, trailing-trimmed.
    pub rendered: String,
    pub lines: Vec<DiffLine>,
}

impl DiffResult {
    fn from_lines(lines: Vec<DiffLine>) -> Self {
        let mut rendered = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed_len = rendered.trim_end().len();
        rendered.truncate(trimmed_len);
        Self { rendered, lines }
    }
}

/// Split a blob into line tokens, dropping the empty artifact a trailing
/// newline leaves behind. The empty string yields no lines.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Compute the line-level diff between `a` (old) and `b` (new).
///
/// Uses Myers, which settles ambiguous minimal alignments the way
/// conventional diff tools do: the leading run of common lines is kept
/// equal, so e.g. `diff("a\na\nb", "a\nb")` reports the *second* `a` as
/// removed.
///
/// Identical inputs (after line splitting) produce a single synthetic
/// `Equal` line carrying [`IDENTICAL_MESSAGE`] instead of echoing the
/// content. Two empty inputs produce an empty result. Pure and total;
/// never panics.
#[must_use]
pub fn diff(a: &str, b: &str) -> DiffResult {
    if a.is_empty() && b.is_empty() {
        return DiffResult {
            rendered: String::new(),
            lines: Vec::new(),
        };
    }

    let a_lines = split_lines(a);
    let b_lines = split_lines(b);

    if a_lines == b_lines {
        return DiffResult::from_lines(vec![DiffLine {
            text: IDENTICAL_MESSAGE.to_owned(),
            kind: DiffKind::Equal,
        }]);
    }

    let text_diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_slices(&a_lines, &b_lines);

    let lines = text_diff
        .iter_all_changes()
        .map(|change| DiffLine {
            text: change.value().to_string(),
            kind: match change.tag() {
                ChangeTag::Insert => DiffKind::Added,
                ChangeTag::Delete => DiffKind::Removed,
                ChangeTag::Equal => DiffKind::Equal,
            },
        })
        .collect();

    DiffResult::from_lines(lines)
}
