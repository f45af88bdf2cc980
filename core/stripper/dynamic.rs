//! Hash comments and docstrings.
//!
//! One leftmost-first pattern walks the source and classifies each token as a
//! `#` comment, a triple-quoted block or an ordinary string. Only the class
//! being removed is dropped; the rest is written back as-is, which is what keeps
//! a `#` inside `"..."` or a `"""` inside a comment from being misread.

use super::common::StripError;
use crate::guard::guarded_replace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const HASH_COMMENT: &str = r"#[^\r\n]*";
const TRIPLE_QUOTED: &str = r#""""(?:[^\\]|\\.)*?"""|'''(?:[^\\]|\\.)*?'''"#;
const QUOTED: &str = r#""(?:[^"\\\r\n]|\\.)*"|'(?:[^'\\\r\n]|\\.)*'"#;
const STRING_PREFIX: &str = r"(?i:rf|fr|rb|br|r|u|f|b)?";

static COMMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?s)(?P<comment>{HASH_COMMENT})|(?:{TRIPLE_QUOTED})|(?:{QUOTED})"
    ))
    .expect("comment pattern is valid")
});

static DOCSTRINGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "(?ms)(?P<doc>^[ \\t]*{STRING_PREFIX}(?:{TRIPLE_QUOTED})(?:[ \\t]*{STRING_PREFIX}(?:{TRIPLE_QUOTED}))*)|(?:{TRIPLE_QUOTED})|(?:{HASH_COMMENT})|(?:{QUOTED})"
    ))
    .expect("docstring pattern is valid")
});

fn drop_group<'a>(group: &'a str) -> impl FnMut(&Captures<'_>) -> String + 'a {
    move |caps: &Captures<'_>| {
        if caps.name(group).is_some() {
            String::new()
        } else {
            caps[0].to_string()
        }
    }
}

pub(crate) fn remove_comments(content: &str) -> Result<String, StripError> {
    if !content.contains('#') {
        return Ok(content.to_string());
    }
    Ok(guarded_replace(content, &COMMENTS, drop_group("comment"))?)
}

/// Removes triple-quoted strings standing as statements, including implicitly
/// concatenated ones on the same line. Assigned or passed triple-quoted strings
/// are left alone.
pub fn remove_docstrings(content: &str) -> Result<String, StripError> {
    if !content.contains("\"\"\"") && !content.contains("'''") {
        return Ok(content.to_string());
    }
    Ok(guarded_replace(content, &DOCSTRINGS, drop_group("doc"))?)
}

pub(crate) fn remove_all(content: &str) -> Result<String, StripError> {
    remove_docstrings(&remove_comments(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hash_comments_are_removed() {
        let code = "# header\nx = 1  # trailing\n";
        assert_eq!(remove_comments(code).unwrap(), "\nx = 1  \n");
    }

    #[test]
    fn hash_in_string_is_not_a_comment() {
        let code = "x = \"#not a comment\"";
        assert_eq!(remove_comments(code).unwrap(), code);

        let code = "y = 'it''s # fine'  # gone";
        assert_eq!(remove_comments(code).unwrap(), "y = 'it''s # fine'  ");
    }

    #[test]
    fn comments_keep_triple_quoted_blocks() {
        let code = "s = \"\"\"\n# inside\n\"\"\"\n";
        assert_eq!(remove_comments(code).unwrap(), code);
    }

    #[test]
    fn assigned_triple_quoted_string_is_not_a_docstring() {
        let code = "x = \"\"\"not a docstring\"\"\"";
        assert_eq!(remove_docstrings(code).unwrap(), code);
    }

    #[test]
    fn statement_docstring_is_removed() {
        let code = "def f():\n    \"\"\"Doc with \"quotes\".\"\"\"\n    return 1\n";
        assert_eq!(
            remove_docstrings(code).unwrap(),
            "def f():\n\n    return 1\n"
        );

        let code = "r'''raw\nmodule doc'''\nimport os\n";
        assert_eq!(remove_docstrings(code).unwrap(), "\nimport os\n");
    }

    #[test]
    fn closing_quotes_never_open_a_docstring() {
        let code = "x = \"\"\"\n\"\"\"\ndef f():\n    '''doc'''\n";
        assert_eq!(
            remove_docstrings(code).unwrap(),
            "x = \"\"\"\n\"\"\"\ndef f():\n\n"
        );
    }

    #[test]
    fn docstring_markers_inside_comments_are_ignored() {
        let code = "# \"\"\" not a block\nvalue = 2\n";
        assert_eq!(remove_docstrings(code).unwrap(), code);
    }

    #[test]
    fn remove_all_composes_both() {
        let code = "\"\"\"Module.\"\"\"\nimport os  # os\nx = \"#keep\"\n";
        assert_eq!(remove_all(code).unwrap(), "\nimport os  \nx = \"#keep\"\n");
    }

    #[test]
    fn concatenated_docstring_is_removed_in_one_pass() {
        let code = "def f():\n    \"\"\"a\"\"\" \"\"\"b\"\"\"\n    return 1\n";
        let once = remove_all(code).unwrap();
        assert_eq!(once, "def f():\n\n    return 1\n");
        assert_eq!(remove_all(&once).unwrap(), once);
    }

    #[test]
    fn remove_all_is_idempotent() {
        let code = "class A:\n    '''doc'''\n    # note\n    v = '''kept'''  # x\n";
        let once = remove_all(code).unwrap();
        assert_eq!(remove_all(&once).unwrap(), once);
    }
}
