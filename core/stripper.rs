pub mod brace;
pub mod c_family;
pub mod common;
pub mod dynamic;
pub mod fallback;
pub mod markup;
pub mod stylesheet;

pub use brace::BraceDialect;
pub use common::{CommentKind, CommentMatch, StrategyFailure, StripError};

use crate::diagnostics::Diagnostics;
use crate::guard::GuardError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Every comment form the family recognizes. Always present.
    Basic,
    SingleLine,
    MultiLine,
    Comprehensive,
}

impl Capability {
    pub const fn label(self) -> &'static str {
        match self {
            Capability::Basic => "basic",
            Capability::SingleLine => "single-line",
            Capability::MultiLine => "multi-line",
            Capability::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A comment-removal strategy. Strategies hold no state; the same value can
/// serve any number of concurrent calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Brace(BraceDialect),
    Dynamic,
    Markup,
    Stylesheet,
    Fallback,
}

impl Strategy {
    pub const fn family(self) -> &'static str {
        match self {
            Strategy::Brace(_) => "brace",
            Strategy::Dynamic => "dynamic",
            Strategy::Markup => "markup",
            Strategy::Stylesheet => "stylesheet",
            Strategy::Fallback => "fallback",
        }
    }

    pub const fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            Strategy::Brace(_) | Strategy::Fallback => &[Basic, SingleLine, MultiLine],
            Strategy::Dynamic | Strategy::Markup => &[Basic, Comprehensive],
            Strategy::Stylesheet => &[Basic, SingleLine, Comprehensive],
        }
    }

    pub fn supports(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Runs one capability. `None` means the strategy has no such capability.
    ///
    /// Internal failures are reported to `diagnostics` and answered with the
    /// input unchanged; only guard errors reach the caller.
    pub fn run(
        self,
        capability: Capability,
        text: &str,
        diagnostics: &dyn Diagnostics,
    ) -> Option<Result<String, GuardError>> {
        let outcome = match (self, capability) {
            (Strategy::Brace(dialect), Capability::Basic) => brace::remove_comments(dialect, text),
            (Strategy::Brace(dialect), Capability::SingleLine) => {
                brace::remove_single_line(dialect, text)
            }
            (Strategy::Brace(dialect), Capability::MultiLine) => {
                brace::remove_multi_line(dialect, text)
            }
            (Strategy::Dynamic, Capability::Basic) => dynamic::remove_comments(text),
            (Strategy::Dynamic, Capability::Comprehensive) => dynamic::remove_all(text),
            (Strategy::Markup, Capability::Basic) => markup::remove_comments(text),
            (Strategy::Markup, Capability::Comprehensive) => markup::remove_all(text),
            (Strategy::Stylesheet, Capability::Basic) => stylesheet::remove_comments(text),
            (Strategy::Stylesheet, Capability::SingleLine) => stylesheet::remove_single_line(text),
            (Strategy::Stylesheet, Capability::Comprehensive) => stylesheet::remove_all(text),
            (Strategy::Fallback, Capability::Basic) => fallback::remove_comments(text),
            (Strategy::Fallback, Capability::SingleLine) => fallback::remove_single_line(text),
            (Strategy::Fallback, Capability::MultiLine) => fallback::remove_multi_line(text),
            _ => return None,
        };
        Some(recover(self, capability, text, outcome, diagnostics))
    }

    pub fn remove_comments(
        self,
        text: &str,
        diagnostics: &dyn Diagnostics,
    ) -> Result<String, GuardError> {
        self.run(Capability::Basic, text, diagnostics)
            .unwrap_or_else(|| Ok(text.to_string()))
    }
}

/// Strategy boundary: a failed pass becomes the original text plus a report.
pub(crate) fn recover(
    strategy: Strategy,
    capability: Capability,
    original: &str,
    outcome: Result<String, StripError>,
    diagnostics: &dyn Diagnostics,
) -> Result<String, GuardError> {
    match outcome {
        Ok(text) => Ok(text),
        Err(StripError::Guard(e)) => Err(e),
        Err(StripError::Failure(failure)) => {
            let tag = match failure {
                StrategyFailure::Syntax { .. }
                | StrategyFailure::NoTree
                | StrategyFailure::NoGrammar { .. } => "parse_error",
                _ => "scan_error",
            };
            let detail = format!("{} ({}): {}", strategy.family(), capability, failure);
            tracing::debug!(family = strategy.family(), %capability, %failure, "returning input unchanged");
            diagnostics.report(&format!("{}.{}", strategy.family(), tag), &detail);
            Ok(original.to_string())
        }
    }
}
