//! Struct-literal rendering for table-driven tests.
//!
//! Turns a (name, input, want) triple into the fixed-shape record that gets
//! pasted into a test table. The rendered text is a copy-paste contract:
//! field alignment, quoting, and the trailing comma are byte-exact.

use crate::normalize::normalize;

/// Escape a normalized blob into a single-line quoted-literal body.
///
/// Substitution order matters: backslash first, or the escapes introduced
/// by the later steps get double-escaped.
#[must_use]
pub fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}

/// Render the struct literal for one test case.
///
/// Both blobs are normalized before escaping. `name` is interpolated
/// verbatim: a name containing a quote or newline produces a malformed
/// literal. That mirrors the upstream tool and is deliberately not guarded
/// here; callers own name hygiene.
#[must_use]
pub fn serialize(name: &str, input: &str, output: &str) -> String {
    format!(
        "{{\n    name:  \"{name}\",\n    input: \"{}\",\n    want:  \"{}\",\n}},",
        escape(&normalize(input)),
        escape(&normalize(output)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Inverse of [`escape`], for round-trip checks only.
    fn unescape(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        }
        out
    }

    #[test]
    fn test_escape_order() {
        // A literal backslash-n must not collapse into a newline escape.
        assert_eq!(escape("\\n"), "\\\\n");
        assert_eq!(escape("a\"b"), "a\\\"b");
        assert_eq!(escape("a\nb\tc\rd"), "a\\nb\\tc\\rd");
    }

    #[test]
    fn test_template_exact() {
        let got = serialize("t1", "hi\n", "bye\"\n");
        let want = "{\n    name:  \"t1\",\n    input: \"hi\\n\",\n    want:  \"bye\\\"\\n\",\n},";
        assert_eq!(got, want);
    }

    #[test]
    fn test_template_alignment() {
        let got = serialize("n", "a", "b");
        assert!(got.contains("name:  \"n\""));
        assert!(got.contains("input: \"a\\n\""));
        assert!(got.contains("want:  \"b\\n\""));
        assert!(got.ends_with("},"));
    }

    #[test]
    fn test_blobs_normalized_before_escaping() {
        let got = serialize("t", "  a  \n\n b ", "");
        assert!(got.contains("input: \"a\\nb\\n\""));
        assert!(got.contains("want:  \"\""));
    }

    #[test]
    fn test_round_trip_recovers_normalized_blobs() {
        let cases = [
            ("plain", "hello\nworld", "bye"),
            ("quotes", "say \"hi\"", "tab\there"),
            ("slashes", "c:\\path\\n", "\\\\server"),
            ("cr", "a\r\nb", ""),
        ];
        for (name, input, output) in cases {
            let rendered = serialize(name, input, output);
            let mut fields = rendered.lines().skip(2).map(|line| {
                let start = line.find('"').expect("opening quote") + 1;
                let end = line.rfind('"').expect("closing quote");
                unescape(&line[start..end])
            });
            let input_field = fields.next().expect("input line");
            let want_field = fields.next().expect("want line");
            assert_eq!(input_field, normalize(input), "case {name}");
            assert_eq!(want_field, normalize(output), "case {name}");
        }
    }

    #[test]
    fn test_name_interpolated_verbatim() {
        // Known gap carried over: names are not escaped.
        let got = serialize("has \"quote\"", "x", "y");
        assert!(got.contains("name:  \"has \"quote\"\""));
    }
}
