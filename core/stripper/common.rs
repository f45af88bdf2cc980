use crate::guard::GuardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentMatch {
    pub from: usize,
    pub to: usize,
    pub kind: CommentKind,
}

impl CommentMatch {
    pub fn line(from: usize, to: usize) -> Self {
        CommentMatch {
            from,
            to,
            kind: CommentKind::Line,
        }
    }

    pub fn block(from: usize, to: usize) -> Self {
        CommentMatch {
            from,
            to,
            kind: CommentKind::Block,
        }
    }
}

/// Internal failure of a strategy pass. Never crosses the strategy boundary:
/// see [`super::recover`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyFailure {
    #[error("grammar for {dialect} could not be loaded: {reason}")]
    NoGrammar {
        dialect: &'static str,
        reason: String,
    },

    #[error("parser returned no tree")]
    NoTree,

    #[error("syntax error at line {row}, column {column}")]
    Syntax { row: usize, column: usize },

    #[error("match {from}..{to} out of bounds for input of {len} bytes")]
    InvalidRange { from: usize, to: usize, len: usize },

    #[error("matches overlap at byte {at}")]
    Overlap { at: usize },

    #[error("scanner entered an invalid state: {0}")]
    InvalidState(&'static str),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StripError {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error(transparent)]
    Failure(#[from] StrategyFailure),
}

pub trait Start: Sized {
    fn start() -> Self;
}

pub trait End: Sized {
    fn end() -> Self;
}

/// Drives a character state machine over `input`. `state_transition` maps the
/// lexical state and the next char (`None` at end of input) to a new state and
/// an action; `do_action` turns actions into comment matches.
pub fn find_comments_impl<ParseState, ParseAction, CommentState, StateTransitionFn, DoActionFn>(
    input: &str,
    state_transition: StateTransitionFn,
    do_action: DoActionFn,
) -> Result<Vec<CommentMatch>, StrategyFailure>
where
    ParseState: Start + End + Copy + Eq,
    ParseAction: Copy + Eq,
    CommentState: Start + Copy + Eq,
    StateTransitionFn: Fn(ParseState, Option<char>) -> (ParseState, ParseAction),
    DoActionFn: Fn(
        ParseAction,
        CommentState,
        usize,
        Vec<CommentMatch>,
    ) -> Result<(CommentState, Vec<CommentMatch>), StrategyFailure>,
{
    let mut matches = Vec::new();
    let mut current_parse_state = ParseState::start();
    let mut current_comment_state = CommentState::start();
    let mut char_indices = input.char_indices();

    loop {
        let char_info = char_indices.next();
        let current_char = char_info.map(|(_, c)| c);
        let position = char_info.map_or(input.len(), |(idx, _)| idx);

        let (next_parse_state, action) = state_transition(current_parse_state, current_char);

        let (next_comment_state, next_matches) =
            do_action(action, current_comment_state, position, matches)?;

        current_parse_state = next_parse_state;
        current_comment_state = next_comment_state;
        matches = next_matches;

        if current_char.is_none() || current_parse_state == ParseState::end() {
            break;
        }
    }
    Ok(matches)
}

pub fn remove_matches(
    mut input: String,
    mut matches: Vec<CommentMatch>,
) -> Result<String, StrategyFailure> {
    if matches.is_empty() {
        return Ok(input);
    }
    check_matches_bounds(&input, &matches)?;

    matches.sort_by_key(|m| m.from);
    matches.dedup();
    check_sorted_matches_overlap(&matches)?;

    for m in matches.iter().rev() {
        input.drain(m.from..m.to);
    }
    Ok(input)
}

/// Like [`remove_matches`], but a comment alone on its line(s) takes the line
/// with it, and a trailing comment takes the blanks before it.
pub fn remove_matches_tidy(
    input: String,
    matches: Vec<CommentMatch>,
) -> Result<String, StrategyFailure> {
    check_matches_bounds(&input, &matches)?;
    let widened = matches
        .into_iter()
        .map(|m| widen_to_line(&input, m))
        .collect();
    remove_matches(input, widened)
}

fn widen_to_line(input: &str, m: CommentMatch) -> CommentMatch {
    let is_blank = |s: &str| s.chars().all(|c| c == ' ' || c == '\t' || c == '\r');

    let line_start = input[..m.from].rfind('\n').map_or(0, |i| i + 1);
    let line_end = input[m.to..].find('\n').map_or(input.len(), |i| m.to + i);
    let content_end = if line_end > m.to && input[..line_end].ends_with('\r') {
        line_end - 1
    } else {
        line_end
    };

    let before = &input[line_start..m.from];
    if !is_blank(&input[m.to..content_end]) {
        return m;
    }
    if is_blank(before) {
        let to = if line_end < input.len() {
            line_end + 1
        } else {
            line_end
        };
        return CommentMatch {
            from: line_start,
            to,
            kind: m.kind,
        };
    }
    let kept = before.trim_end_matches([' ', '\t']);
    CommentMatch {
        from: line_start + kept.len(),
        to: content_end,
        kind: m.kind,
    }
}

fn check_matches_bounds(input: &str, matches: &[CommentMatch]) -> Result<(), StrategyFailure> {
    let len = input.len();
    for m in matches {
        if m.from > len
            || m.to > len
            || m.from > m.to
            || !input.is_char_boundary(m.from)
            || !input.is_char_boundary(m.to)
        {
            return Err(StrategyFailure::InvalidRange {
                from: m.from,
                to: m.to,
                len,
            });
        }
    }
    Ok(())
}

fn check_sorted_matches_overlap(matches: &[CommentMatch]) -> Result<(), StrategyFailure> {
    let mut last_to = 0;
    for m in matches {
        if m.from < last_to {
            return Err(StrategyFailure::Overlap { at: m.from });
        }
        last_to = m.to;
    }
    Ok(())
}
