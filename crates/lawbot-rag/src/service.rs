use serde::Serialize;
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

use lawbot_core::config::{expand_path, Settings};
use lawbot_core::error::Error;
use lawbot_core::traits::AnswerGenerator;
use lawbot_core::types::{ChatResponse, ChatTurn, Confidence, ContextBundle};
use lawbot_embed::default_embedder;
use lawbot_tools::{CaseLookup, Deadline, LegalTools, TermLookup, ToolResult, ToolsInfo};
use lawbot_vector::VectorStore;

use crate::composer::{decorate, AnswerComposer, EMPTY_QUERY_RESPONSE, GENERATION_APOLOGY, NOT_READY_RESPONSE};
use crate::generator::OpenAiCompatibleGenerator;
use crate::prompt::build_prompt;
use crate::retriever::Retriever;

/// Loaded, immutable query-path components.
pub struct Pipeline {
    retriever: Retriever,
    generator: Option<Box<dyn AnswerGenerator>>,
}

impl Pipeline {
    pub fn new(retriever: Retriever, generator: Option<Box<dyn AnswerGenerator>>) -> Self {
        Self { retriever, generator }
    }

    /// Load the vectorstore, embedder and generator named by `settings`.
    ///
    /// A missing or unreadable store degrades retrieval. Parts that disagree
    /// on size or dimension are an error.
    pub fn load(settings: &Settings) -> anyhow::Result<Self> {
        let dir = expand_path(&settings.rag.vectorstore_dir);
        let retriever = match VectorStore::load(&dir) {
            Ok(store) => match default_embedder(&settings.embedding) {
                Ok(embedder) => Retriever::new(embedder, store, &settings.rag)?,
                Err(e) => {
                    warn!("embedder unavailable, retrieval disabled: {:#}", e);
                    Retriever::unavailable(&settings.rag)
                }
            },
            Err(Error::IndexUnavailable(msg)) => {
                warn!(dir = %dir.display(), "retrieval disabled: {}", msg);
                Retriever::unavailable(&settings.rag)
            }
            Err(e) => return Err(e.into()),
        };
        let generator = OpenAiCompatibleGenerator::from_settings(&settings.generator)?
            .map(|g| Box::new(g) as Box<dyn AnswerGenerator>);
        if generator.is_none() {
            info!("no generator endpoint configured; answers use the templated fallback");
        }
        Ok(Self::new(retriever, generator))
    }

    pub fn retriever(&self) -> &Retriever { &self.retriever }

    pub fn generator(&self) -> Option<&dyn AnswerGenerator> { self.generator.as_deref() }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub initialized: bool,
    pub health: &'static str,
    pub retrieval_available: bool,
    pub generator_available: bool,
    pub vector_count: usize,
    pub passage_count: usize,
    pub embedder_id: Option<String>,
    pub generator: Option<String>,
    pub vectorstore_dir: String,
    pub tools: ToolsInfo,
}

/// The question-answering service.
///
/// Starts unloaded; [`initialize`](Self::initialize) publishes the pipeline
/// once and it never changes afterwards. Share it through an `Arc`; `chat`
/// may be called from threads or from inside an async runtime.
pub struct LawBotService {
    settings: Settings,
    tools: LegalTools,
    composer: AnswerComposer,
    ready: OnceLock<Pipeline>,
}

impl LawBotService {
    pub fn new(settings: Settings) -> Self {
        let tools = LegalTools::new(&settings.tools);
        let composer = AnswerComposer::new(settings.rag.preview_chars);
        Self { settings, tools, composer, ready: OnceLock::new() }
    }

    /// A service that is ready immediately with the given components.
    pub fn with_pipeline(settings: Settings, pipeline: Pipeline) -> Self {
        let mut service = Self::new(settings);
        service.ready = OnceLock::from(pipeline);
        service
    }

    pub fn initialize(&self) -> anyhow::Result<()> {
        if self.is_ready() { return Ok(()); }
        info!("initializing LawBot service");
        let pipeline = Pipeline::load(&self.settings)?;
        let retrieval = pipeline.retriever.is_available();
        let generation = pipeline.generator.is_some();
        if self.ready.set(pipeline).is_err() {
            debug!("service was initialized concurrently; keeping the first pipeline");
        }
        if retrieval {
            info!(generation, "LawBot service ready");
        } else {
            warn!(generation, "LawBot service ready in limited mode");
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool { self.ready.get().is_some() }

    pub fn settings(&self) -> &Settings { &self.settings }

    pub fn tools(&self) -> &LegalTools { &self.tools }

    pub fn retrieve_context(&self, query: &str) -> ContextBundle {
        match self.ready.get() {
            Some(p) => p.retriever.retrieve_context(query),
            None => ContextBundle::unavailable(),
        }
    }

    /// Answer `query`. Never fails; problems surface in `error`.
    pub fn chat(&self, query: &str, history: Option<&[ChatTurn]>) -> ChatResponse {
        if query.trim().is_empty() {
            return ChatResponse {
                response: EMPTY_QUERY_RESPONSE.to_string(),
                citations: vec![],
                tools_used: vec![],
                confidence: Confidence::Low,
                error: None,
            };
        }
        let Some(pipeline) = self.ready.get() else {
            warn!("chat called before initialize");
            return ChatResponse {
                response: decorate(NOT_READY_RESPONSE, std::iter::empty(), &[]),
                citations: vec![],
                tools_used: vec![],
                confidence: Confidence::Low,
                error: Some("LawBot service is not initialized".to_string()),
            };
        };

        let bundle = pipeline.retriever.retrieve_context(query);
        debug!(message = %bundle.message, confidence = %bundle.confidence, "context retrieved");
        let tools = self.tools.detect(query);

        let mut failure = None;
        let raw = pipeline.generator.as_ref().map(|g| {
            let prompt = build_prompt(query, &bundle.context_text, history.unwrap_or_default(), self.settings.generator.history_turns);
            match g.generate(&prompt, self.settings.generator.max_tokens) {
                Ok(text) => text,
                Err(e) => {
                    error!(generator = g.name(), "generation failed: {:#}", e);
                    failure = Some(Error::GenerationFailure(format!("{e:#}")).to_string());
                    GENERATION_APOLOGY.to_string()
                }
            }
        });

        let response = self.composer.compose(query, &bundle, &tools, raw.as_deref());
        ChatResponse {
            response,
            citations: bundle.citations.into_iter().collect(),
            tools_used: tools,
            confidence: bundle.confidence,
            error: failure,
        }
    }

    pub fn lookup_term(&self, term: &str) -> TermLookup { self.tools.lookup_term(term) }

    pub fn calculate_deadline(&self, days: i64, start_date: Option<&str>) -> ToolResult<Deadline> {
        self.tools.calculate_deadline(days, start_date)
    }

    pub fn lookup_case(&self, case_reference: &str) -> ToolResult<CaseLookup> { self.tools.lookup_case(case_reference) }

    pub fn system_status(&self) -> SystemStatus {
        let pipeline = self.ready.get();
        let retriever = pipeline.map(Pipeline::retriever);
        let retrieval_available = retriever.is_some_and(Retriever::is_available);
        SystemStatus {
            initialized: pipeline.is_some(),
            health: if retrieval_available { "healthy" } else { "degraded" },
            retrieval_available,
            generator_available: pipeline.is_some_and(|p| p.generator.is_some()),
            vector_count: retriever.map_or(0, Retriever::vector_count),
            passage_count: retriever.map_or(0, Retriever::passage_count),
            embedder_id: retriever.and_then(Retriever::embedder_id).map(str::to_string),
            generator: pipeline.and_then(Pipeline::generator).map(|g| g.name().to_string()),
            vectorstore_dir: self.settings.rag.vectorstore_dir.clone(),
            tools: self.tools.info(),
        }
    }
}
