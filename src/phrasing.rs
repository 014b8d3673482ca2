//! Optional rewording of catalog suggestions.
//!
//! Phrasing runs after numeric scoring. A failing phraser never fails the analysis:
//! the catalog text is used instead.

#[cfg(feature = "llm")]
pub mod chat;

use crate::scorer::feedback::Suggestion;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum PhraseError {
    #[error("Phrasing backend unavailable: {0}")]
    Unavailable(String),

    #[error("Phrasing request failed: {0}")]
    Request(String),

    #[error("Phrasing backend returned an empty reply")]
    Empty,
}

pub trait Phraser: Send + Sync {
    fn phrase(&self, suggestion: Suggestion) -> Result<String, PhraseError>;
}

/// Returns the fixed catalog wording. Always available, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogPhraser;

impl Phraser for CatalogPhraser {
    fn phrase(&self, suggestion: Suggestion) -> Result<String, PhraseError> {
        Ok(suggestion.text().to_string())
    }
}

/// Phrases every suggestion, falling back to the catalog per item.
/// Order is kept and repeated wordings are collapsed.
pub fn phrase_all(phraser: &dyn Phraser, suggestions: &[Suggestion]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(suggestions.len());
    for &s in suggestions {
        let text = match phraser.phrase(s) {
            Ok(t) if !t.trim().is_empty() => t.trim().to_string(),
            Ok(_) => {
                warn!("Phraser returned blank text for '{}', using catalog", s);
                s.text().to_string()
            }
            Err(e) => {
                warn!("{}; using catalog text for '{}'", e, s);
                s.text().to_string()
            }
        };
        if !out.contains(&text) {
            out.push(text);
        }
    }
    out
}
