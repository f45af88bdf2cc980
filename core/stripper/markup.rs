//! `<!-- -->` comments in HTML and XML.
//!
//! The scanner only recognizes an opener outside tag attribute quotes. It leaves
//! in place:
//! - abruptly closed openers (`<!-->`, `<!--->`),
//! - comments that never close,
//! - a comment whose body opens another `<!--`: everything through the next
//!   `-->` stays, so the outer opener never pairs with a later closer,
//! - conditional comments (`<!--[if ...]> ... <![endif]-->`), which have their
//!   own operation.

use super::common::{
    CommentMatch, End, Start, StrategyFailure, StripError, find_comments_impl, remove_matches,
};
use crate::guard::guarded_replace;
use once_cell::sync::Lazy;
use regex::Regex;

static CONDITIONAL_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<!--\[if[^>]*\]>.*?<!\[endif\]-->").expect("conditional pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Text,
    SawLt,
    SawLtBang,
    SawLtBangDash,
    InTag,
    InTagDbl,
    InTagSgl,
    CommentOpen,
    CommentOpenDash,
    CommentBracket,
    CommentBracketI,
    Comment,
    CommentDash1,
    CommentDash2,
    CommentSawLt,
    CommentSawLtBang,
    CommentSawLtBangDash,
    /// Inside a region that is never removed; left at the next `-->`.
    Kept,
    KeptDash1,
    KeptDash2,
    End,
}
impl Start for ParseState {
    fn start() -> Self {
        ParseState::Text
    }
}
impl End for ParseState {
    fn end() -> Self {
        ParseState::End
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseAction {
    Nothing,
    MaybeCommentStart,
    CommentStart,
    CommentEnd,
    ResetPotential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentTrackState {
    NotInComment,
    MaybeComment(usize),
    InComment(usize),
}
impl Start for CommentTrackState {
    fn start() -> Self {
        CommentTrackState::NotInComment
    }
}

/// Shared exits of the comment body states.
fn in_comment(c: char) -> (ParseState, ParseAction) {
    match c {
        '-' => (ParseState::CommentDash1, ParseAction::Nothing),
        '<' => (ParseState::CommentSawLt, ParseAction::Nothing),
        _ => (ParseState::Comment, ParseAction::Nothing),
    }
}

fn state_transition(from: ParseState, current_char: Option<char>) -> (ParseState, ParseAction) {
    let Some(c) = current_char else {
        return match from {
            ParseState::SawLt
            | ParseState::SawLtBang
            | ParseState::SawLtBangDash
            | ParseState::CommentOpen
            | ParseState::CommentOpenDash
            | ParseState::CommentBracket
            | ParseState::CommentBracketI
            | ParseState::Comment
            | ParseState::CommentDash1
            | ParseState::CommentDash2
            | ParseState::CommentSawLt
            | ParseState::CommentSawLtBang
            | ParseState::CommentSawLtBangDash => (ParseState::End, ParseAction::ResetPotential),
            _ => (ParseState::End, ParseAction::Nothing),
        };
    };

    match from {
        ParseState::Text => match c {
            '<' => (ParseState::SawLt, ParseAction::MaybeCommentStart),
            _ => (ParseState::Text, ParseAction::Nothing),
        },
        ParseState::SawLt => match c {
            '!' => (ParseState::SawLtBang, ParseAction::Nothing),
            '<' => (ParseState::SawLt, ParseAction::MaybeCommentStart),
            '/' | '?' => (ParseState::InTag, ParseAction::ResetPotential),
            c if c.is_alphabetic() => (ParseState::InTag, ParseAction::ResetPotential),
            _ => (ParseState::Text, ParseAction::ResetPotential),
        },
        ParseState::SawLtBang => match c {
            '-' => (ParseState::SawLtBangDash, ParseAction::Nothing),
            _ => (ParseState::InTag, ParseAction::ResetPotential),
        },
        ParseState::SawLtBangDash => match c {
            '-' => (ParseState::CommentOpen, ParseAction::CommentStart),
            _ => (ParseState::InTag, ParseAction::ResetPotential),
        },
        ParseState::InTag => match c {
            '"' => (ParseState::InTagDbl, ParseAction::Nothing),
            '\'' => (ParseState::InTagSgl, ParseAction::Nothing),
            '>' => (ParseState::Text, ParseAction::Nothing),
            _ => (ParseState::InTag, ParseAction::Nothing),
        },
        ParseState::InTagDbl => match c {
            '"' => (ParseState::InTag, ParseAction::Nothing),
            _ => (ParseState::InTagDbl, ParseAction::Nothing),
        },
        ParseState::InTagSgl => match c {
            '\'' => (ParseState::InTag, ParseAction::Nothing),
            _ => (ParseState::InTagSgl, ParseAction::Nothing),
        },
        ParseState::CommentOpen => match c {
            '>' => (ParseState::Text, ParseAction::ResetPotential),
            '-' => (ParseState::CommentOpenDash, ParseAction::Nothing),
            '[' => (ParseState::CommentBracket, ParseAction::Nothing),
            _ => in_comment(c),
        },
        ParseState::CommentOpenDash => match c {
            '>' => (ParseState::Text, ParseAction::ResetPotential),
            '-' => (ParseState::CommentDash2, ParseAction::Nothing),
            _ => in_comment(c),
        },
        ParseState::CommentBracket => match c {
            'i' | 'I' => (ParseState::CommentBracketI, ParseAction::Nothing),
            _ => in_comment(c),
        },
        ParseState::CommentBracketI => match c {
            'f' | 'F' => (ParseState::Kept, ParseAction::ResetPotential),
            _ => in_comment(c),
        },
        ParseState::Comment => in_comment(c),
        ParseState::CommentDash1 => match c {
            '-' => (ParseState::CommentDash2, ParseAction::Nothing),
            _ => in_comment(c),
        },
        ParseState::CommentDash2 => match c {
            '>' => (ParseState::Text, ParseAction::CommentEnd),
            '-' => (ParseState::CommentDash2, ParseAction::Nothing),
            _ => in_comment(c),
        },
        ParseState::CommentSawLt => match c {
            '!' => (ParseState::CommentSawLtBang, ParseAction::Nothing),
            _ => in_comment(c),
        },
        ParseState::CommentSawLtBang => match c {
            '-' => (ParseState::CommentSawLtBangDash, ParseAction::Nothing),
            _ => in_comment(c),
        },
        ParseState::CommentSawLtBangDash => match c {
            '-' => (ParseState::Kept, ParseAction::ResetPotential),
            _ => in_comment(c),
        },
        ParseState::Kept => match c {
            '-' => (ParseState::KeptDash1, ParseAction::Nothing),
            _ => (ParseState::Kept, ParseAction::Nothing),
        },
        ParseState::KeptDash1 => match c {
            '-' => (ParseState::KeptDash2, ParseAction::Nothing),
            _ => (ParseState::Kept, ParseAction::Nothing),
        },
        ParseState::KeptDash2 => match c {
            '>' => (ParseState::Text, ParseAction::Nothing),
            '-' => (ParseState::KeptDash2, ParseAction::Nothing),
            _ => (ParseState::Kept, ParseAction::Nothing),
        },
        ParseState::End => (ParseState::End, ParseAction::Nothing),
    }
}

fn do_action(
    action: ParseAction,
    mut comment_state: CommentTrackState,
    position: usize,
    mut matches: Vec<CommentMatch>,
) -> Result<(CommentTrackState, Vec<CommentMatch>), StrategyFailure> {
    match action {
        ParseAction::Nothing => {}
        ParseAction::MaybeCommentStart => {
            comment_state = CommentTrackState::MaybeComment(position);
        }
        ParseAction::CommentStart => {
            if let CommentTrackState::MaybeComment(from) = comment_state {
                comment_state = CommentTrackState::InComment(from);
            } else {
                return Err(StrategyFailure::InvalidState(
                    "comment opener without a pending '<'",
                ));
            }
        }
        ParseAction::CommentEnd => {
            if let CommentTrackState::InComment(from) = comment_state {
                matches.push(CommentMatch::block(from, position + 1));
            }
            comment_state = CommentTrackState::NotInComment;
        }
        ParseAction::ResetPotential => {
            comment_state = CommentTrackState::NotInComment;
        }
    }
    Ok((comment_state, matches))
}

pub fn find_comments(input: &str) -> Result<Vec<CommentMatch>, StrategyFailure> {
    find_comments_impl(input, state_transition, do_action)
}

pub(crate) fn remove_comments(content: &str) -> Result<String, StripError> {
    if !content.contains("<!--") {
        return Ok(content.to_string());
    }
    let matches = find_comments(content)?;
    Ok(remove_matches(content.to_string(), matches)?)
}

pub fn remove_conditional_comments(content: &str) -> Result<String, StripError> {
    Ok(guarded_replace(content, &CONDITIONAL_COMMENT, "")?)
}

pub(crate) fn remove_all(content: &str) -> Result<String, StripError> {
    remove_conditional_comments(&remove_comments(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_comments_are_removed() {
        let html = "<p>a</p><!-- note -->\n<!--\n multi\n-->b";
        assert_eq!(remove_comments(html).unwrap(), "<p>a</p>\nb");
    }

    #[test]
    fn dashes_inside_and_before_close() {
        let html = "x<!-- a - b -- c --->y<!---->z";
        assert_eq!(remove_comments(html).unwrap(), "xyz");
    }

    #[test]
    fn quoted_attributes_hide_openers() {
        let html = "<a title=\"<!-- not -->\">t</a><!-- yes -->";
        assert_eq!(
            remove_comments(html).unwrap(),
            "<a title=\"<!-- not -->\">t</a>"
        );
    }

    #[test]
    fn apostrophes_in_text_do_not_hide_comments() {
        let html = "<p>don't</p><!-- x --><p>can't</p>";
        assert_eq!(remove_comments(html).unwrap(), "<p>don't</p><p>can't</p>");
    }

    #[test]
    fn unterminated_and_abrupt_comments_stay() {
        for html in ["a <!-- never closed", "a <!--> b", "a <!---> b"] {
            assert_eq!(remove_comments(html).unwrap(), html);
        }
    }

    #[test]
    fn nested_opener_keeps_the_whole_region() {
        let html = "<!-- outer <!-- inner --> tail -->";
        let once = remove_all(html).unwrap();
        assert_eq!(once, html);
        assert_eq!(remove_all(&once).unwrap(), once);

        let html = "<!-- a <!-- b --> c --> <!-- d -->x";
        let once = remove_all(html).unwrap();
        assert_eq!(once, "<!-- a <!-- b --> c --> x");
        assert_eq!(remove_all(&once).unwrap(), once);
    }

    #[test]
    fn conditional_comments_are_a_separate_operation() {
        let html = "<!-- plain -->\n<!--[if IE]><p>old</p><![endif]-->\n<p>ok</p>";
        let base = remove_comments(html).unwrap();
        assert_eq!(base, "\n<!--[if IE]><p>old</p><![endif]-->\n<p>ok</p>");
        assert_eq!(
            remove_conditional_comments(html).unwrap(),
            "<!-- plain -->\n\n<p>ok</p>"
        );
        assert_eq!(remove_all(html).unwrap(), "\n\n<p>ok</p>");
    }

    #[test]
    fn doctype_and_declarations_are_not_comments() {
        let html = "<!DOCTYPE html><![CDATA[x]]>";
        assert_eq!(remove_comments(html).unwrap(), html);
    }

    #[test]
    fn remove_all_is_idempotent() {
        let html = "<!--[if lt IE 9]><script></script><![endif]--><!-- a --><b>x</b>";
        let once = remove_all(html).unwrap();
        assert_eq!(once, "<b>x</b>");
        assert_eq!(remove_all(&once).unwrap(), once);
    }
}
