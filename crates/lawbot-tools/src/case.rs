use serde::Serialize;

pub const CASE_SOURCE: &str = "Case Lookup";
pub const CASE_NOTE: &str = "No case-law source is connected; integrate a court records API to resolve references";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    NotImplemented,
}

/// Case lookup answer. No records are ever invented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseLookup {
    pub case_reference: String,
    pub status: CaseStatus,
    pub note: &'static str,
    pub source: &'static str,
}

impl CaseLookup {
    pub fn not_implemented(case_reference: &str) -> Self {
        Self {
            case_reference: case_reference.trim().to_string(),
            status: CaseStatus::NotImplemented,
            note: CASE_NOTE,
            source: CASE_SOURCE,
        }
    }
}
