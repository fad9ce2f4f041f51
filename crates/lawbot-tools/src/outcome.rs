use serde::Serialize;

use lawbot_core::error::Result;

/// `{success, ..data, error}` payload returned by the direct tool endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ToolResult<T> {
    pub fn ok(data: T) -> Self { Self { success: true, data: Some(data), error: None } }

    pub fn err(error: impl Into<String>) -> Self { Self { success: false, data: None, error: Some(error.into()) } }
}

impl<T> From<Result<T>> for ToolResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}
