use lawbot_core::types::ChatTurn;

pub const SYSTEM_PROMPT: &str = "You are LawBot, an expert legal assistant specializing in Indian law. \
Provide accurate, helpful responses about Indian legal matters. \
Always cite relevant laws and be clear about limitations.";

/// User prompt for the answer generator. Only the last `history_turns`
/// turns of `history` are included.
pub fn build_prompt(query: &str, context: &str, history: &[ChatTurn], history_turns: usize) -> String {
    let mut out = String::new();
    let recent = &history[history.len().saturating_sub(history_turns)..];
    if !recent.is_empty() {
        out.push_str("Previous conversation:\n");
        for turn in recent {
            out.push_str(&format!("User: {}\nLawBot: {}\n", turn.query, turn.response));
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "Question: {query}\n\nContext from legal documents:\n{context}\n\n\
         Please provide a comprehensive answer about Indian law based on the context above."
    ));
    out
}
