//! Scrubbers remove non-deterministic content from a normalized subject
//! before it is compared against the snapshot: timestamps, identifiers,
//! credit card numbers and the like. Scrubbers compose by sequential
//! application in the order they were configured.

use regex::Regex;

/// A text transformation applied to the normalized subject before
/// comparison. Implementations must be stateless and reusable.
pub trait Scrubber: Send + Sync {
    fn clean(&self, subject: &str) -> String;
}

/// Replaces every non-overlapping match of a pattern with a replacement.
/// Capture groups can be referenced in the replacement as `$1`, `$2`, ...
pub struct RegexScrubber {
    pattern: Regex,
    replacement: String,
}

impl RegexScrubber {
    /// # Panics
    ///
    /// Panics when `pattern` is not a valid regular expression, which is a
    /// defect in the calling test rather than a data-driven failure.
    pub fn new(pattern: &str, replacement: &str) -> Self {
        let pattern = Regex::new(pattern)
            .unwrap_or_else(|err| panic!("invalid scrubber pattern '{pattern}': {err}"));
        RegexScrubber {
            pattern,
            replacement: replacement.to_string(),
        }
    }

    /// Wraps both pattern and replacement in a format template holding
    /// exactly one `{}` placeholder, restricting matches to a labeled
    /// context. With the template `"Credit Card: {}"` only card numbers
    /// following that label are scrubbed.
    pub fn with_format(pattern: &str, replacement: &str, format: &str) -> Self {
        let scoped_pattern = format.replacen("{}", pattern, 1);
        let scoped_replacement = format.replacen("{}", replacement, 1);
        Self::new(&scoped_pattern, &scoped_replacement)
    }
}

impl Scrubber for RegexScrubber {
    fn clean(&self, subject: &str) -> String {
        self.pattern
            .replace_all(subject, self.replacement.as_str())
            .into_owned()
    }
}

/// Masks the first three groups of a dash-delimited credit card number,
/// preserving the last four digits.
pub fn credit_card() -> RegexScrubber {
    RegexScrubber::new(r"\d{4}-\d{4}-\d{4}-(\d{4})", "****-****-****-$1")
}

/// Replaces ULIDs (26-character Crockford base32 identifiers) with `<ULID>`.
pub fn ulid() -> RegexScrubber {
    ulid_with("<ULID>")
}

/// Like [`ulid`], with a caller-chosen replacement text.
pub fn ulid_with(replacement: &str) -> RegexScrubber {
    RegexScrubber::new(r"[0-9A-HJKMNP-TV-Z]{26}", replacement)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_subject_untouched_without_match() {
        let subject = "A string not suspicious of containing anything to remove";
        let scrubber = RegexScrubber::new(r"\d{2}-\d{2}-\d{2}", "24-01-15");
        assert_eq!(scrubber.clean(subject), subject);
    }

    #[test]
    fn replaces_every_match() {
        let subject = "The next days 24-01-30, 24-02-03 and 24-02-10 we will be closed.";
        let scrubber = RegexScrubber::new(r"\d{2}-\d{2}-\d{2}", "24-01-15");
        assert_eq!(
            scrubber.clean(subject),
            "The next days 24-01-15, 24-01-15 and 24-01-15 we will be closed."
        );
    }

    #[test]
    fn format_scopes_matching_to_context() {
        let scrubber = RegexScrubber::with_format(r"\d+", "<ID>", "Order: {}");
        let subject = "Order: 12345 shipped in 3 days";
        assert_eq!(scrubber.clean(subject), "Order: <ID> shipped in 3 days");
    }

    #[test]
    fn credit_card_keeps_last_four_digits() {
        let scrubber = credit_card();
        let subject = "Credit Card: 1234-5678-9012-3456";
        assert_eq!(
            scrubber.clean(subject),
            "Credit Card: ****-****-****-3456"
        );
    }

    #[test]
    fn ulid_uses_default_replacement() {
        let scrubber = ulid();
        let subject = "id: 01HNAS7GYKMA6AVYznT2QBCD9Y";
        // Lowercase chars are outside the ULID alphabet, so this one stays.
        assert_eq!(scrubber.clean(subject), subject);

        let subject = "id: 01HNAS7GYKMA6AVY2T2QBCD9Y0";
        assert_eq!(scrubber.clean(subject), "id: <ULID>");
    }

    #[test]
    fn ulid_replacement_can_be_overridden() {
        let scrubber = ulid_with("[[id]]");
        let subject = "id: 01HNAS7GYKMA6AVY2T2QBCD9Y0";
        assert_eq!(scrubber.clean(subject), "id: [[id]]");
    }

    #[test]
    fn scrubbers_compose_in_order() {
        let first = RegexScrubber::new(r"\d{2}:\d{2}:\d{2}", "<Time>");
        let second = RegexScrubber::new("<Time>", "(redacted)");
        let cleaned = second.clean(&first.clean("logged at 10:42:07"));
        assert_eq!(cleaned, "logged at (redacted)");
    }
}
