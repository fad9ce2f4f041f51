use lawbot_core::types::{LegalTerm, ToolInvocation};

pub const DATE_KEYWORDS: [&str; 6] = ["deadline", "limitation", "days", "date", "time", "period"];
pub const CASE_KEYWORDS: [&str; 5] = ["case", "judgment", "court", "ruling", "decision"];

pub const DATE_HINT: &str = "Query contains date-related terms";
pub const CASE_HINT: &str = "Query contains case-related terms";

/// Keyword rules deciding which tools a query touches.
///
/// Matching is plain substring search on the lowercased query, so `bail`
/// also fires for "bailiff" and `date` for "update".
#[derive(Debug, Clone, Default)]
pub struct ToolDetector {
    terms: Vec<LegalTerm>,
}

impl ToolDetector {
    /// `terms` keys are expected lowercase, as [`crate::LegalDictionary`] stores them.
    pub fn new(terms: Vec<LegalTerm>) -> Self { Self { terms } }

    /// Dictionary hits in dictionary order, then at most one date hint, then
    /// at most one case hint.
    pub fn detect(&self, query: &str) -> Vec<ToolInvocation> {
        let q = query.to_lowercase();
        let mut found: Vec<ToolInvocation> = self
            .terms
            .iter()
            .filter(|t| q.contains(t.term.as_str()))
            .map(|t| ToolInvocation::LegalTermHit { term: t.term.clone(), definition: t.definition.clone() })
            .collect();
        if DATE_KEYWORDS.iter().any(|k| q.contains(k)) {
            found.push(ToolInvocation::DateHint { description: DATE_HINT.to_string() });
        }
        if CASE_KEYWORDS.iter().any(|k| q.contains(k)) {
            found.push(ToolInvocation::CaseHint { description: CASE_HINT.to_string() });
        }
        found
    }
}
