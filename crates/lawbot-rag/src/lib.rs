//! Retrieval-augmented answering for LawBot.
//!
//! [`LawBotService::chat`] runs retrieval, tool detection, generation (or the
//! templated fallback) and composition for one query.

mod composer;
mod generator;
mod prompt;
mod retriever;
mod service;

pub use composer::{decorate, preview, tools_line, AnswerComposer, DISCLAIMER, EMPTY_QUERY_RESPONSE, GENERATION_APOLOGY, NOT_READY_RESPONSE};
pub use generator::{completion_text, OpenAiCompatibleGenerator};
pub use prompt::{build_prompt, SYSTEM_PROMPT};
pub use retriever::Retriever;
pub use service::{LawBotService, Pipeline, SystemStatus};
