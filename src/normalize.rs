//! Text normalization applied before diffing and serialization.
//!
//! Raw editor blobs arrive with inconsistent indentation, trailing spaces,
//! and stray blank lines; every downstream consumer (the differ and the
//! struct serializer) sees only the normalized form.

/// Normalize a raw text blob.
///
/// Trims the whole blob, trims each line, drops lines that become empty,
/// rejoins with `\n`, and appends exactly one trailing newline. An input
/// with no surviving lines normalizes to the empty string, never `"\n"`.
///
/// Total over any input, and idempotent: `normalize(normalize(s))`
/// equals `normalize(s)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 1);
    for line in text.trim().split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}
