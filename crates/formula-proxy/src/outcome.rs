//! Completion parsing.
//!
//! The model is asked for `{"formula": "...", "explanation": "..."}` but does
//! not always comply. A completion only counts as parsed when it is a JSON
//! object with both keys as strings and a non-empty formula; anything else is
//! returned as a fallback carrying the raw text, so callers always receive the
//! two expected keys.

use crate::types::FormulaResponse;
use serde::Deserialize;

/// Explanation used when the completion could not be parsed.
pub const FALLBACK_EXPLANATION: &str = "Formula generated successfully (fallback mode)";

/// Result of interpreting one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaOutcome {
    /// The model returned the requested JSON object.
    Parsed { formula: String, explanation: String },

    /// The model returned something else; `raw` is the trimmed text.
    Fallback { raw: String },
}

#[derive(Debug, Deserialize)]
struct ModelFormula {
    formula: String,
    explanation: String,
}

impl FormulaOutcome {
    pub fn from_completion(content: &str) -> Self {
        let trimmed = content.trim();

        match serde_json::from_str::<ModelFormula>(trimmed) {
            Ok(parsed) if !parsed.formula.trim().is_empty() => FormulaOutcome::Parsed {
                formula: parsed.formula,
                explanation: parsed.explanation,
            },
            _ => FormulaOutcome::Fallback {
                raw: trimmed.to_string(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FormulaOutcome::Fallback { .. })
    }

    pub fn into_response(self) -> FormulaResponse {
        match self {
            FormulaOutcome::Parsed {
                formula,
                explanation,
            } => FormulaResponse {
                formula,
                explanation,
            },
            FormulaOutcome::Fallback { raw } => FormulaResponse {
                formula: raw,
                explanation: FALLBACK_EXPLANATION.to_string(),
            },
        }
    }
}
