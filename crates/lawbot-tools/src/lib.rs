//! Rule-based legal utilities: term dictionary, tool detection, deadline
//! arithmetic and case lookup.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::debug;

use lawbot_core::config::ToolsSettings;
use lawbot_core::types::ToolInvocation;

mod case;
mod deadline;
mod detector;
mod dictionary;
mod outcome;

pub use case::{CaseLookup, CaseStatus, CASE_NOTE};
pub use deadline::{calculate_deadline, Deadline, DATE_FORMAT};
pub use detector::{ToolDetector, CASE_HINT, CASE_KEYWORDS, DATE_HINT, DATE_KEYWORDS};
pub use dictionary::{LegalDictionary, MatchKind, TermLookup};
pub use outcome::ToolResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryInfo {
    pub enabled: bool,
    pub terms_count: usize,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleInfo {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolsInfo {
    pub legal_dictionary: DictionaryInfo,
    pub date_calculator: ToggleInfo,
    pub case_lookup: ToggleInfo,
}

/// All tools behind one handle, configured from [`ToolsSettings`].
///
/// Stateless after construction; safe to share across threads.
#[derive(Debug, Clone)]
pub struct LegalTools {
    dictionary: LegalDictionary,
    detector: ToolDetector,
    date_calculator: bool,
    case_lookup: bool,
}

impl LegalTools {
    pub fn new(settings: &ToolsSettings) -> Self {
        let dictionary = LegalDictionary::new(settings.dictionary.iter().cloned());
        let detector = ToolDetector::new(dictionary.entries().to_vec());
        Self { dictionary, detector, date_calculator: settings.date_calculator, case_lookup: settings.case_lookup }
    }

    pub fn dictionary(&self) -> &LegalDictionary { &self.dictionary }

    pub fn detect(&self, query: &str) -> Vec<ToolInvocation> {
        let tools = self.detector.detect(query);
        debug!(count = tools.len(), "detected tools");
        tools
    }

    pub fn lookup_term(&self, term: &str) -> TermLookup { self.dictionary.lookup(term) }

    pub fn calculate_deadline(&self, days: i64, start: Option<&str>) -> ToolResult<Deadline> {
        self.calculate_deadline_from(days, start, Local::now().date_naive())
    }

    /// As [`calculate_deadline`](Self::calculate_deadline) with an explicit "today".
    pub fn calculate_deadline_from(&self, days: i64, start: Option<&str>, today: NaiveDate) -> ToolResult<Deadline> {
        if !self.date_calculator { return ToolResult::err("Date calculator not enabled"); }
        calculate_deadline(days, start, today)
    }

    pub fn lookup_case(&self, case_reference: &str) -> ToolResult<CaseLookup> {
        if !self.case_lookup { return ToolResult::err("Case lookup not enabled"); }
        if case_reference.trim().is_empty() { return ToolResult::err("Case reference must not be empty"); }
        ToolResult {
            success: false,
            data: Some(CaseLookup::not_implemented(case_reference)),
            error: Some("Case lookup not implemented".to_string()),
        }
    }

    pub fn info(&self) -> ToolsInfo {
        ToolsInfo {
            legal_dictionary: DictionaryInfo {
                enabled: true,
                terms_count: self.dictionary.len(),
                terms: self.dictionary.terms(),
            },
            date_calculator: ToggleInfo { enabled: self.date_calculator, note: None },
            case_lookup: ToggleInfo { enabled: self.case_lookup, note: Some(CASE_NOTE) },
        }
    }
}

impl Default for LegalTools {
    fn default() -> Self { Self::new(&ToolsSettings::default()) }
}
