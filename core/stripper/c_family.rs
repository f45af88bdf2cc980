//! Lexical scanner for `//` and `/* */` comments in brace languages that have
//! no bundled grammar.
//!
//! Block comments nest, as in Swift, Kotlin and Scala. `"""` opens a raw
//! multi-line string that only `"""` closes.

use super::common::{CommentMatch, End, Start, StrategyFailure, find_comments_impl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseState {
    Start,
    Normal,
    FirstSlash,
    SingleLineComment,
    MultiLineComment { depth: u32 },
    MultiLineCommentSawStar { depth: u32 },
    MultiLineCommentSawSlash { depth: u32 },
    /// One `"` seen; may still become `""` or `"""`.
    StringDoubleQuoteOpened,
    /// `""` seen: an empty string, unless a third quote follows.
    StringDoubleQuotePair,
    StringDoubleQuotes,
    StringDoubleQuotesEscaped,
    StringTripleQuotes,
    StringTripleQuotesEscaped,
    StringTripleQuotesSawQuote,
    StringTripleQuotesSawTwoQuotes,
    /// Quotes after a closing `"""` still belong to the string.
    StringTripleQuotesClosing,
    StringSingleQuotes,
    StringSingleQuotesEscaped,
    End,
}
impl Start for ParseState {
    fn start() -> Self {
        ParseState::Start
    }
}
impl End for ParseState {
    fn end() -> Self {
        ParseState::End
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CParseAction {
    Nothing,
    CommentMightStart,
    ConfirmLineComment,
    ConfirmBlockComment,
    DismissPotential,
    CommentEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    NotIn,
    SawFirstSlash { slash_idx: usize },
    InLine { start_idx: usize },
    InBlock { start_idx: usize },
}
impl Start for State {
    fn start() -> Self {
        State::NotIn
    }
}

fn in_block(depth: u32, c: char) -> (ParseState, CParseAction) {
    match c {
        '*' => (
            ParseState::MultiLineCommentSawStar { depth },
            CParseAction::Nothing,
        ),
        '/' => (
            ParseState::MultiLineCommentSawSlash { depth },
            CParseAction::Nothing,
        ),
        _ => (ParseState::MultiLineComment { depth }, CParseAction::Nothing),
    }
}

fn in_triple_string(c: char) -> (ParseState, CParseAction) {
    match c {
        '"' => (
            ParseState::StringTripleQuotesSawQuote,
            CParseAction::Nothing,
        ),
        '\\' => (
            ParseState::StringTripleQuotesEscaped,
            CParseAction::Nothing,
        ),
        _ => (ParseState::StringTripleQuotes, CParseAction::Nothing),
    }
}

fn in_double_string(c: char) -> (ParseState, CParseAction) {
    match c {
        '"' => (ParseState::Normal, CParseAction::Nothing),
        '\\' => (
            ParseState::StringDoubleQuotesEscaped,
            CParseAction::Nothing,
        ),
        _ => (ParseState::StringDoubleQuotes, CParseAction::Nothing),
    }
}

pub(crate) fn c_state_transition(
    from: ParseState,
    current_char: Option<char>,
) -> (ParseState, CParseAction) {
    match current_char {
        Some(c) => match from {
            ParseState::Start | ParseState::Normal => match c {
                '/' => (ParseState::FirstSlash, CParseAction::CommentMightStart),
                '"' => (ParseState::StringDoubleQuoteOpened, CParseAction::Nothing),
                '\'' => (ParseState::StringSingleQuotes, CParseAction::Nothing),
                _ => (ParseState::Normal, CParseAction::Nothing),
            },
            ParseState::FirstSlash => match c {
                '/' => (
                    ParseState::SingleLineComment,
                    CParseAction::ConfirmLineComment,
                ),
                '*' => (
                    ParseState::MultiLineComment { depth: 1 },
                    CParseAction::ConfirmBlockComment,
                ),
                '"' => (
                    ParseState::StringDoubleQuoteOpened,
                    CParseAction::DismissPotential,
                ),
                '\'' => (
                    ParseState::StringSingleQuotes,
                    CParseAction::DismissPotential,
                ),
                _ => (ParseState::Normal, CParseAction::DismissPotential),
            },
            ParseState::SingleLineComment => match c {
                '\n' => (ParseState::Start, CParseAction::CommentEnd),
                _ => (ParseState::SingleLineComment, CParseAction::Nothing),
            },
            ParseState::MultiLineComment { depth } => in_block(depth, c),
            ParseState::MultiLineCommentSawStar { depth } => match c {
                '/' if depth == 1 => (ParseState::Normal, CParseAction::CommentEnd),
                '/' => (
                    ParseState::MultiLineComment { depth: depth - 1 },
                    CParseAction::Nothing,
                ),
                '*' => (
                    ParseState::MultiLineCommentSawStar { depth },
                    CParseAction::Nothing,
                ),
                _ => (ParseState::MultiLineComment { depth }, CParseAction::Nothing),
            },
            ParseState::MultiLineCommentSawSlash { depth } => match c {
                '*' => (
                    ParseState::MultiLineComment { depth: depth + 1 },
                    CParseAction::Nothing,
                ),
                _ => in_block(depth, c),
            },
            ParseState::StringDoubleQuoteOpened => match c {
                '"' => (ParseState::StringDoubleQuotePair, CParseAction::Nothing),
                _ => in_double_string(c),
            },
            ParseState::StringDoubleQuotePair => match c {
                '"' => (ParseState::StringTripleQuotes, CParseAction::Nothing),
                _ => c_state_transition(ParseState::Normal, Some(c)),
            },
            ParseState::StringDoubleQuotes => in_double_string(c),
            ParseState::StringDoubleQuotesEscaped => {
                (ParseState::StringDoubleQuotes, CParseAction::Nothing)
            }
            ParseState::StringTripleQuotes => in_triple_string(c),
            ParseState::StringTripleQuotesEscaped => {
                (ParseState::StringTripleQuotes, CParseAction::Nothing)
            }
            ParseState::StringTripleQuotesSawQuote => match c {
                '"' => (
                    ParseState::StringTripleQuotesSawTwoQuotes,
                    CParseAction::Nothing,
                ),
                _ => in_triple_string(c),
            },
            ParseState::StringTripleQuotesSawTwoQuotes => match c {
                '"' => (
                    ParseState::StringTripleQuotesClosing,
                    CParseAction::Nothing,
                ),
                _ => in_triple_string(c),
            },
            ParseState::StringTripleQuotesClosing => match c {
                '"' => (
                    ParseState::StringTripleQuotesClosing,
                    CParseAction::Nothing,
                ),
                _ => c_state_transition(ParseState::Normal, Some(c)),
            },
            // Char literals never span lines; a stray quote resets at the newline.
            ParseState::StringSingleQuotes => match c {
                '\'' | '\n' => (ParseState::Normal, CParseAction::Nothing),
                '\\' => (ParseState::StringSingleQuotesEscaped, CParseAction::Nothing),
                _ => (ParseState::StringSingleQuotes, CParseAction::Nothing),
            },
            ParseState::StringSingleQuotesEscaped => {
                (ParseState::StringSingleQuotes, CParseAction::Nothing)
            }
            ParseState::End => (ParseState::End, CParseAction::Nothing),
        },
        None => match from {
            ParseState::SingleLineComment => (ParseState::End, CParseAction::CommentEnd),
            ParseState::FirstSlash
            | ParseState::MultiLineComment { .. }
            | ParseState::MultiLineCommentSawStar { .. }
            | ParseState::MultiLineCommentSawSlash { .. } => {
                (ParseState::End, CParseAction::DismissPotential)
            }
            _ => (ParseState::End, CParseAction::Nothing),
        },
    }
}

pub(crate) fn c_do_action(
    action: CParseAction,
    mut comment_state: State,
    position: usize,
    mut matches: Vec<CommentMatch>,
) -> Result<(State, Vec<CommentMatch>), StrategyFailure> {
    match action {
        CParseAction::Nothing => {}
        CParseAction::CommentMightStart => {
            if let State::NotIn = comment_state {
                comment_state = State::SawFirstSlash {
                    slash_idx: position,
                };
            }
        }
        CParseAction::ConfirmLineComment => {
            comment_state = match comment_state {
                State::SawFirstSlash { slash_idx } => State::InLine {
                    start_idx: slash_idx,
                },
                _ => return Err(StrategyFailure::InvalidState("line comment without slash")),
            };
        }
        CParseAction::ConfirmBlockComment => {
            comment_state = match comment_state {
                State::SawFirstSlash { slash_idx } => State::InBlock {
                    start_idx: slash_idx,
                },
                _ => return Err(StrategyFailure::InvalidState("block comment without slash")),
            };
        }
        CParseAction::DismissPotential => {
            comment_state = State::NotIn;
        }
        CParseAction::CommentEnd => {
            match comment_state {
                // The newline stays with the code.
                State::InLine { start_idx } => {
                    matches.push(CommentMatch::line(start_idx, position));
                }
                State::InBlock { start_idx } => {
                    matches.push(CommentMatch::block(start_idx, position + 1));
                }
                _ => {}
            }
            comment_state = State::NotIn;
        }
    }
    Ok((comment_state, matches))
}

pub fn find_comments(input: &str) -> Result<Vec<CommentMatch>, StrategyFailure> {
    find_comments_impl(input, c_state_transition, c_do_action)
}
