use lawbot_core::types::{ContextBundle, ToolInvocation};

pub const DISCLAIMER: &str =
    "\n\n⚠️ *This is for educational purposes only. Consult a qualified lawyer for legal advice.*";

pub const EMPTY_QUERY_RESPONSE: &str = "Please enter a question.";

pub const GENERATION_APOLOGY: &str = "I apologize, but I could not generate an answer to your question right now. \
Any sources and tools found for it are listed below.";

pub const NOT_READY_RESPONSE: &str = "LawBot is not ready to answer questions yet. Please try again once it has finished loading.";

/// Turns a raw answer (or the lack of one) into the final cited reply.
#[derive(Debug, Clone)]
pub struct AnswerComposer {
    preview_chars: usize,
}

impl Default for AnswerComposer {
    fn default() -> Self { Self { preview_chars: 500 } }
}

impl AnswerComposer {
    pub fn new(preview_chars: usize) -> Self { Self { preview_chars } }

    /// `raw_answer` of `None` selects the templated fallback.
    pub fn compose(&self, query: &str, bundle: &ContextBundle, tools: &[ToolInvocation], raw_answer: Option<&str>) -> String {
        let body = match raw_answer {
            Some(text) => text.to_string(),
            None => self.fallback_answer(query, bundle, tools),
        };
        decorate(&body, bundle.citations.iter().map(String::as_str), tools)
    }

    pub fn fallback_answer(&self, query: &str, bundle: &ContextBundle, tools: &[ToolInvocation]) -> String {
        let mut lines = vec![
            format!("I understand you're asking about: \"{query}\""),
            String::new(),
            "The answer model is not available, so this reply is assembled from the legal \
             reference material alone."
                .to_string(),
            "- Always consult qualified legal professionals for specific cases".to_string(),
            "- Legal information changes frequently".to_string(),
        ];
        if !bundle.context_text.is_empty() {
            lines.push(String::new());
            lines.push("**Retrieved Context:**".to_string());
            lines.push(preview(&bundle.context_text, self.preview_chars));
        }
        if !tools.is_empty() {
            lines.push(String::new());
            lines.push("**Detected Tools:**".to_string());
            lines.extend(tools.iter().map(|t| format!("- {}", t.summary())));
        }
        lines.join("\n")
    }
}

/// Appends the sources line, the tools line and the disclaimer to `body`.
pub fn decorate<'a>(body: &str, citations: impl IntoIterator<Item = &'a str>, tools: &[ToolInvocation]) -> String {
    let mut parts = vec![body.to_string()];
    let citations: Vec<&str> = citations.into_iter().collect();
    if !citations.is_empty() {
        parts.push(format!("\n**Sources:** {}", citations.join(", ")));
    }
    if !tools.is_empty() {
        parts.push(format!("\n**Tools Used:** {}", tools_line(tools)));
    }
    parts.push(DISCLAIMER.to_string());
    parts.join("\n")
}

pub fn tools_line(tools: &[ToolInvocation]) -> String {
    tools.iter().map(ToolInvocation::summary).collect::<Vec<_>>().join("; ")
}

/// First `max_chars` characters, with `...` only when something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
