use serde::Serialize;

use lawbot_core::types::LegalTerm;

pub const DICTIONARY_SOURCE: &str = "Legal Dictionary";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Partial,
    NotFound,
}

/// Result of a direct dictionary lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermLookup {
    /// The term as the caller wrote it.
    pub term: String,
    pub definition: String,
    pub found: bool,
    pub match_kind: MatchKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub partial_matches: Vec<LegalTerm>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub available_terms: Vec<String>,
    pub source: &'static str,
}

/// Ordered term table. Keys are stored trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalDictionary {
    entries: Vec<LegalTerm>,
}

impl LegalDictionary {
    pub fn new(entries: impl IntoIterator<Item = LegalTerm>) -> Self {
        let mut out: Vec<LegalTerm> = Vec::new();
        for e in entries {
            let key = e.term.trim().to_lowercase();
            if key.is_empty() || out.iter().any(|x| x.term == key) { continue; }
            out.push(LegalTerm::new(key, e.definition));
        }
        Self { entries: out }
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries(&self) -> &[LegalTerm] { &self.entries }

    pub fn terms(&self) -> Vec<String> { self.entries.iter().map(|e| e.term.clone()).collect() }

    pub fn get(&self, key: &str) -> Option<&LegalTerm> { self.entries.iter().find(|e| e.term == key) }

    /// Exact key first, then every key that contains or is contained in the
    /// query, else not-found with the list of known terms.
    pub fn lookup(&self, term: &str) -> TermLookup {
        let needle = term.trim().to_lowercase();

        if let Some(hit) = self.get(&needle) {
            return TermLookup {
                term: term.to_string(),
                definition: hit.definition.clone(),
                found: true,
                match_kind: MatchKind::Exact,
                partial_matches: vec![],
                available_terms: vec![],
                source: DICTIONARY_SOURCE,
            };
        }

        let partial: Vec<LegalTerm> = if needle.is_empty() {
            vec![]
        } else {
            self.entries
                .iter()
                .filter(|e| e.term.contains(&needle) || needle.contains(&e.term))
                .cloned()
                .collect()
        };
        if let Some(first) = partial.first() {
            return TermLookup {
                term: term.to_string(),
                definition: format!("Partial matches found: {}", first.definition),
                found: true,
                match_kind: MatchKind::Partial,
                partial_matches: partial,
                available_terms: vec![],
                source: DICTIONARY_SOURCE,
            };
        }

        TermLookup {
            term: term.to_string(),
            definition: format!("No definition found for '{}'", term),
            found: false,
            match_kind: MatchKind::NotFound,
            partial_matches: vec![],
            available_terms: self.terms(),
            source: DICTIONARY_SOURCE,
        }
    }
}
