//! Input validation and guarded regex substitution.
//!
//! Everything here runs before, or on behalf of, a strategy. A failure aborts the
//! whole operation and reaches the caller.

use once_cell::sync::Lazy;
use regex::{Regex, Replacer};

/// Upper bound on the number of characters accepted by [`validate`].
pub const MAX_INPUT_CHARS: usize = 50_000_000;

/// Minimum run of `\xNN` escapes that marks a buffer as disguised binary.
pub const SUSPICIOUS_ESCAPE_RUN: usize = 10;

/// Pattern fragments that are refused by [`guarded_replace`].
const CATASTROPHIC_CONSTRUCTS: &[&str] = &["(.*?)"];

static ESCAPED_HEX_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:\\x[0-9a-fA-F]{{2}}){{{},}}",
        SUSPICIOUS_ESCAPE_RUN
    ))
    .expect("escaped hex pattern is valid")
});

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("File size exceeds security limits: {chars} characters (max {max})")]
    InputTooLarge { chars: usize, max: usize },

    #[error("Suspicious binary patterns detected")]
    SuspiciousContent,

    #[error("Potentially dangerous regex pattern: {pattern}")]
    UnsafePattern { pattern: String },
}

pub fn validate(text: &str) -> Result<(), GuardError> {
    // A char is at least one byte, so short buffers skip the count.
    if text.len() > MAX_INPUT_CHARS {
        let chars = text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(GuardError::InputTooLarge {
                chars,
                max: MAX_INPUT_CHARS,
            });
        }
    }

    if ESCAPED_HEX_RUN.is_match(text) {
        return Err(GuardError::SuspiciousContent);
    }
    Ok(())
}

/// Replaces every match of `pattern` in `text`, refusing patterns that carry a
/// lazy wildcard group.
pub fn guarded_replace<R: Replacer>(
    text: &str,
    pattern: &Regex,
    replacement: R,
) -> Result<String, GuardError> {
    let source = pattern.as_str();
    if CATASTROPHIC_CONSTRUCTS.iter().any(|c| source.contains(c)) {
        return Err(GuardError::UnsafePattern {
            pattern: source.to_string(),
        });
    }
    Ok(pattern.replace_all(text, replacement).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_ordinary_source() {
        assert_eq!(validate("fn main() { println!(\"\\x41\"); }"), Ok(()));
        assert_eq!(validate(""), Ok(()));
    }

    #[test]
    fn rejects_input_over_the_ceiling() {
        let text = "a".repeat(MAX_INPUT_CHARS + 1);
        assert_eq!(
            validate(&text),
            Err(GuardError::InputTooLarge {
                chars: MAX_INPUT_CHARS + 1,
                max: MAX_INPUT_CHARS
            })
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 2 bytes per char: over the ceiling in bytes, under it in chars.
        let text = "é".repeat(MAX_INPUT_CHARS / 2 + 1);
        assert_eq!(validate(&text), Ok(()));
    }

    #[test]
    fn rejects_long_escape_runs() {
        let payload = format!("let s = \"{}\";", "\\x7f".repeat(10));
        assert_eq!(validate(&payload), Err(GuardError::SuspiciousContent));

        let short = format!("let s = \"{}\";", "\\x7f".repeat(9));
        assert_eq!(validate(&short), Ok(()));
    }

    #[test]
    fn guarded_replace_substitutes() {
        let re = Regex::new(r"b+").unwrap();
        assert_eq!(guarded_replace("abbbc", &re, "").unwrap(), "ac");
    }

    #[test]
    fn guarded_replace_refuses_lazy_wildcard_group() {
        let re = Regex::new(r"/\*(.*?)\*/").unwrap();
        let err = guarded_replace("/* x */", &re, "").unwrap_err();
        assert_eq!(
            err,
            GuardError::UnsafePattern {
                pattern: r"/\*(.*?)\*/".to_string()
            }
        );
    }
}
