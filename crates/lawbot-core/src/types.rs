//! Domain types shared by the retriever, tools, and composer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A chunk of legal source text stored for retrieval.
///
/// `index` is assigned at build time and addresses the same row in the vector
/// index, the chunk list, and the metadata list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub index: usize,
    pub text: String,
    pub source: String,
}

/// Per-passage provenance record persisted in `metadata.json`.
///
/// Only `source` is required; the rest is informational.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageMeta {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<usize>,
}

impl PassageMeta {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self { source: source.into(), doc_id: None, chunk_index: None }
    }
}

/// One nearest-neighbour hit. `distance` is squared L2, lower is closer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub passage_index: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::High => f.write_str("high"),
            Confidence::Low => f.write_str("low"),
        }
    }
}

/// Output of the retriever for one query.
///
/// `context_text` holds `"[rank] text"` blocks separated by a blank line, one
/// per accepted match. `matches` keeps the accepted hits in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextBundle {
    pub context_text: String,
    pub citations: BTreeSet<String>,
    pub confidence: Confidence,
    pub message: String,
    pub matches: Vec<ScoredMatch>,
}

impl ContextBundle {
    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            context_text: String::new(),
            citations: BTreeSet::new(),
            confidence: Confidence::Low,
            message: message.into(),
            matches: Vec::new(),
        }
    }

    pub fn unavailable() -> Self { Self::empty("RAG not available") }
}

/// A legal dictionary entry. Terms are matched lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalTerm {
    pub term: String,
    pub definition: String,
}

impl LegalTerm {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self { term: term.into(), definition: definition.into() }
    }
}

/// An auxiliary tool the detector decided applies to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool")]
pub enum ToolInvocation {
    #[serde(rename = "legal_dictionary")]
    LegalTermHit { term: String, definition: String },
    #[serde(rename = "date_calculator")]
    DateHint { description: String },
    #[serde(rename = "case_lookup")]
    CaseHint { description: String },
}

impl ToolInvocation {
    pub fn tool_name(&self) -> &'static str {
        match self {
            ToolInvocation::LegalTermHit { .. } => "legal_dictionary",
            ToolInvocation::DateHint { .. } => "date_calculator",
            ToolInvocation::CaseHint { .. } => "case_lookup",
        }
    }

    /// `term: definition` for dictionary hits, `tool: description` otherwise.
    pub fn summary(&self) -> String {
        match self {
            ToolInvocation::LegalTermHit { term, definition } => format!("{term}: {definition}"),
            ToolInvocation::DateHint { description } | ToolInvocation::CaseHint { description } => {
                format!("{}: {}", self.tool_name(), description)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub query: String,
    pub response: String,
}

/// What `chat` hands back to the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub citations: Vec<String>,
    pub tools_used: Vec<ToolInvocation>,
    pub confidence: Confidence,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_formats_each_variant() {
        let hit = ToolInvocation::LegalTermHit { term: "bail".into(), definition: "Release".into() };
        assert_eq!(hit.summary(), "bail: Release");
        let date = ToolInvocation::DateHint { description: "dates".into() };
        assert_eq!(date.summary(), "date_calculator: dates");
        let case = ToolInvocation::CaseHint { description: "cases".into() };
        assert_eq!(case.summary(), "case_lookup: cases");
    }

    #[test]
    fn tool_invocation_serializes_with_tool_tag() {
        let hit = ToolInvocation::LegalTermHit { term: "ipc".into(), definition: "Penal code".into() };
        let v = serde_json::to_value(&hit).expect("serialize");
        assert_eq!(v["tool"], "legal_dictionary");
        assert_eq!(v["term"], "ipc");
    }

    #[test]
    fn unavailable_bundle_is_low_and_empty() {
        let b = ContextBundle::unavailable();
        assert_eq!(b.confidence, Confidence::Low);
        assert!(b.citations.is_empty());
        assert!(b.context_text.is_empty());
        assert_eq!(b.message, "RAG not available");
    }
}
