//! CSS, SCSS, Sass and Less.
//!
//! Block comments end only at a `*` immediately followed by `/`. Preprocessor
//! `//` comments are a separate capability. Both patterns match quoted strings
//! first so their contents are written back untouched.

use super::common::StripError;
use crate::guard::guarded_replace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const QUOTED: &str = r#""(?:[^"\\\r\n]|\\.)*"|'(?:[^'\\\r\n]|\\.)*'"#;
const BLOCK_COMMENT: &str = r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/";

static BLOCK_COMMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?:{QUOTED})|(?P<comment>{BLOCK_COMMENT})"))
        .expect("block comment pattern is valid")
});

/// `url(...)` and block comments are skipped so `http://` inside them survives.
static LINE_COMMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:{QUOTED})|(?i:url\([^)]*\))|(?:{BLOCK_COMMENT})|(?P<comment>//[^\r\n]*)"
    ))
    .expect("line comment pattern is valid")
});

fn drop_comment(caps: &Captures<'_>) -> String {
    if caps.name("comment").is_some() {
        String::new()
    } else {
        caps[0].to_string()
    }
}

pub(crate) fn remove_comments(content: &str) -> Result<String, StripError> {
    if !content.contains("/*") {
        return Ok(content.to_string());
    }
    Ok(guarded_replace(content, &BLOCK_COMMENTS, drop_comment)?)
}

pub(crate) fn remove_single_line(content: &str) -> Result<String, StripError> {
    if !content.contains("//") {
        return Ok(content.to_string());
    }
    Ok(guarded_replace(content, &LINE_COMMENTS, drop_comment)?)
}

pub(crate) fn remove_all(content: &str) -> Result<String, StripError> {
    remove_comments(&remove_single_line(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comment_with_inner_asterisks_is_consumed_whole() {
        assert_eq!(remove_comments("/* a * b */ rest").unwrap(), " rest");
        assert_eq!(remove_comments("a{}/*** x ** y ***/b{}").unwrap(), "a{}b{}");
    }

    #[test]
    fn adjacent_comments_stay_separate() {
        let css = "/* one */ .a { color: red; } /* two */";
        assert_eq!(remove_comments(css).unwrap(), " .a { color: red; } ");
    }

    #[test]
    fn strings_keep_comment_markers() {
        let css = ".a::before { content: \"/* no */\"; }";
        assert_eq!(remove_comments(css).unwrap(), css);
    }

    #[test]
    fn single_line_spares_urls_and_blocks() {
        let scss = "$x: 1; // gone\n.a { background: url(http://e.com/a.png); }\n/* see http://e.com */\n";
        assert_eq!(
            remove_single_line(scss).unwrap(),
            "$x: 1; \n.a { background: url(http://e.com/a.png); }\n/* see http://e.com */\n"
        );
    }

    #[test]
    fn remove_all_runs_both() {
        let scss = "// top\n.a { /* mid */ b: c; } // end\n";
        assert_eq!(remove_all(scss).unwrap(), "\n.a {  b: c; } \n");
    }

    #[test]
    fn remove_all_is_idempotent() {
        let css = "/* a */ @import url('//cdn/x.css'); // b\n";
        let once = remove_all(css).unwrap();
        assert_eq!(once, " @import url('//cdn/x.css'); \n");
        assert_eq!(remove_all(&once).unwrap(), once);
    }

    #[test]
    fn unterminated_block_is_left_alone() {
        let css = ".a {} /* open";
        assert_eq!(remove_comments(css).unwrap(), css);
    }
}
