//! Language id → strategy dispatch.

use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::guard::{self, GuardError};
use crate::stripper::{BraceDialect, Capability, Strategy};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Granularity {
    #[default]
    All,
    SingleLineOnly,
    MultiLineOnly,
}

const REGISTRATIONS: &[(&str, Strategy)] = &[
    // JavaScript family
    ("javascript", Strategy::Brace(BraceDialect::JavaScript)),
    ("javascriptreact", Strategy::Brace(BraceDialect::JavaScript)),
    ("typescript", Strategy::Brace(BraceDialect::TypeScript)),
    ("typescriptreact", Strategy::Brace(BraceDialect::Tsx)),
    // Other brace languages
    ("java", Strategy::Brace(BraceDialect::Java)),
    ("c", Strategy::Brace(BraceDialect::C)),
    ("cpp", Strategy::Brace(BraceDialect::Cpp)),
    ("csharp", Strategy::Brace(BraceDialect::CSharp)),
    ("go", Strategy::Brace(BraceDialect::Go)),
    ("rust", Strategy::Brace(BraceDialect::Rust)),
    ("php", Strategy::Brace(BraceDialect::Lexical)),
    ("swift", Strategy::Brace(BraceDialect::Lexical)),
    ("kotlin", Strategy::Brace(BraceDialect::Lexical)),
    ("scala", Strategy::Brace(BraceDialect::Lexical)),
    // Python
    ("python", Strategy::Dynamic),
    // Markup
    ("html", Strategy::Markup),
    ("xml", Strategy::Markup),
    ("xhtml", Strategy::Markup),
    // Stylesheets
    ("css", Strategy::Stylesheet),
    ("scss", Strategy::Stylesheet),
    ("sass", Strategy::Stylesheet),
    ("less", Strategy::Stylesheet),
];

/// Owns the strategy registry and the diagnostics sink. Build it once and share
/// it; every method takes `&self`.
pub struct CommentManager {
    registry: BTreeMap<&'static str, Strategy>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl std::fmt::Debug for CommentManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentManager")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Default for CommentManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentManager {
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(TracingDiagnostics))
    }

    pub fn with_diagnostics(diagnostics: Arc<dyn Diagnostics>) -> Self {
        CommentManager {
            registry: REGISTRATIONS.iter().copied().collect(),
            diagnostics,
        }
    }

    /// Validates `text`, picks the strategy for `language_id` (or the generic
    /// fallback) and applies the requested granularity.
    pub fn process(
        &self,
        text: &str,
        language_id: &str,
        granularity: Granularity,
    ) -> Result<String, GuardError> {
        guard::validate(text)?;

        let strategy = self.strategy_for(language_id);
        tracing::debug!(
            language_id,
            family = strategy.family(),
            ?granularity,
            bytes = text.len(),
            "removing comments"
        );
        let diagnostics = self.diagnostics.as_ref();

        match granularity {
            Granularity::All => {
                if let Some(result) = strategy.run(Capability::Comprehensive, text, diagnostics) {
                    return result;
                }
                // Single-line first: a block deletion can join a line comment's
                // tail onto the next line.
                let text = match strategy.run(Capability::SingleLine, text, diagnostics) {
                    Some(result) => result?,
                    None => text.to_string(),
                };
                strategy.remove_comments(&text, diagnostics)
            }
            Granularity::SingleLineOnly => strategy
                .run(Capability::SingleLine, text, diagnostics)
                .unwrap_or_else(|| Ok(text.to_string())),
            Granularity::MultiLineOnly => strategy
                .run(Capability::MultiLine, text, diagnostics)
                .unwrap_or_else(|| strategy.remove_comments(text, diagnostics)),
        }
    }

    /// The registered strategy, or [`Strategy::Fallback`].
    pub fn strategy_for(&self, language_id: &str) -> Strategy {
        self.registry
            .get(language_id)
            .copied()
            .unwrap_or(Strategy::Fallback)
    }

    pub fn is_supported(&self, language_id: &str) -> bool {
        self.registry.contains_key(language_id)
    }

    /// Registered ids in ascending order.
    pub fn list_supported(&self) -> Vec<&'static str> {
        self.registry.keys().copied().collect()
    }

    pub fn describe_capabilities(&self, language_id: &str) -> String {
        match self.registry.get(language_id) {
            Some(strategy) => {
                let features: Vec<&str> = strategy
                    .capabilities()
                    .iter()
                    .map(|c| c.label())
                    .collect();
                format!("Supported features: {}", features.join(", "))
            }
            None => "Using fallback parser with basic comment removal".to_string(),
        }
    }

    /// [`guard::validate`] as a yes/no answer.
    pub fn validate_document(&self, text: &str) -> bool {
        match guard::validate(text) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "document validation failed");
                false
            }
        }
    }
}
