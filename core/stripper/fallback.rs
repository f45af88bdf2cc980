//! Best-effort removal for identifiers nobody registered: `//`, `/* */` and `#`
//! forms, none of them string-aware.

use super::common::StripError;
use crate::guard::guarded_replace;
use once_cell::sync::Lazy;
use regex::Regex;

static SLASH_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?Rm)//.*$").expect("slash line pattern is valid"));
static BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block pattern is valid"));
static HASH_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?Rm)#.*$").expect("hash line pattern is valid"));

pub(crate) fn remove_comments(code: &str) -> Result<String, StripError> {
    let result = guarded_replace(code, &SLASH_LINE, "")?;
    let result = guarded_replace(&result, &BLOCK, "")?;
    Ok(guarded_replace(&result, &HASH_LINE, "")?)
}

pub(crate) fn remove_single_line(code: &str) -> Result<String, StripError> {
    let result = guarded_replace(code, &SLASH_LINE, "")?;
    Ok(guarded_replace(&result, &HASH_LINE, "")?)
}

pub(crate) fn remove_multi_line(code: &str) -> Result<String, StripError> {
    Ok(guarded_replace(code, &BLOCK, "")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MIXED: &str = "a = 1 // slash\nb = 2 # hash\n/* block\n spans */c = 3\n";

    #[test]
    fn basic_strips_every_form() {
        assert_eq!(remove_comments(MIXED).unwrap(), "a = 1 \nb = 2 \nc = 3\n");
    }

    #[test]
    fn single_and_multi_split_the_forms() {
        assert_eq!(
            remove_single_line(MIXED).unwrap(),
            "a = 1 \nb = 2 \n/* block\n spans */c = 3\n"
        );
        assert_eq!(
            remove_multi_line(MIXED).unwrap(),
            "a = 1 // slash\nb = 2 # hash\nc = 3\n"
        );
    }

    #[test]
    fn crlf_line_endings_survive() {
        assert_eq!(remove_single_line("x // y\r\nz").unwrap(), "x \r\nz");
    }
}
