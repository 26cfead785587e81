//! Diff reporters explain mismatches between a stored snapshot and the
//! current subject. The engine only depends on the [`DiffReporter`]
//! contract, so strategies are freely replaceable.

use difference::{Changeset, Difference};

/// Sentinel returned by every reporter when both inputs are equal.
pub const NO_DIFFERENCES: &str = "No differences found.";

/// Produces a human-readable report of the differences between the wanted
/// (stored) and gotten (current) text.
pub trait DiffReporter: Send + Sync {
    fn differences(&self, want: &str, got: &str) -> String;
}

fn frame(body: &str) -> String {
    format!("\nDifferences found:\n==================\n{body}\n")
}

/// Character-level diff with inline `(~~removed~~)` and `(++added++)`
/// markers around changed spans.
#[derive(Clone, Copy, Default)]
pub struct CharDiffReporter;

impl DiffReporter for CharDiffReporter {
    fn differences(&self, want: &str, got: &str) -> String {
        if want == got {
            return NO_DIFFERENCES.to_string();
        }
        let changeset = Changeset::new(want, got, "");
        let mut body = String::new();
        for diff in &changeset.diffs {
            match diff {
                Difference::Same(text) => body.push_str(text),
                Difference::Rem(text) => {
                    body.push_str("(~~");
                    body.push_str(text);
                    body.push_str("~~)");
                }
                Difference::Add(text) => {
                    body.push_str("(++");
                    body.push_str(text);
                    body.push_str("++)");
                }
            }
        }
        frame(&body)
    }
}

/// Line-level diff in the conventional `-`/`+` unified style.
#[derive(Clone, Copy, Default)]
pub struct LineDiffReporter;

impl DiffReporter for LineDiffReporter {
    fn differences(&self, want: &str, got: &str) -> String {
        if want == got {
            return NO_DIFFERENCES.to_string();
        }
        let changeset = Changeset::new(want, got, "\n");
        let mut body = String::new();
        for diff in &changeset.diffs {
            let (prefix, text) = match diff {
                Difference::Same(text) => (' ', text),
                Difference::Rem(text) => ('-', text),
                Difference::Add(text) => ('+', text),
            };
            for line in text.split('\n') {
                body.push(prefix);
                body.push_str(line);
                body.push('\n');
            }
        }
        frame(&body)
    }
}
