//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars, then extracts the typed [`Settings`]. Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against a known base
//! directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::LegalTerm;

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Layer `config.toml`, `config.<env>.toml`, then `APP_*` variables found
    /// under `base`. `__` in variable names separates nested keys.
    pub fn load_from(base: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name };
        config.validate_for_env()?;
        Ok(config)
    }

    /// Defaults overlaid with an inline TOML document. No files, no env.
    pub fn from_toml_str(toml: &str) -> Self {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml));
        Self { figment, env_name: "test".to_string() }
    }

    pub fn env_name(&self) -> &str { &self.env_name }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate_for_env(&self) -> anyhow::Result<()> {
        match self.env_name.as_str() {
            "prod" | "production" => {
                if self.get::<bool>("embedding.use_fake").unwrap_or(false) {
                    anyhow::bail!("embedding.use_fake must be false in production");
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rag: RagSettings,
    pub embedding: EmbeddingSettings,
    pub generator: GeneratorSettings,
    pub tools: ToolsSettings,
    pub corpus: CorpusSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.rag.top_k == 0 {
            return Err(Error::InvalidConfig("rag.top_k must be at least 1".into()));
        }
        if !(self.rag.similarity_threshold.is_finite() && self.rag.similarity_threshold > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "rag.similarity_threshold must be a positive number, got {}",
                self.rag.similarity_threshold
            )));
        }
        if self.corpus.chunk_size == 0 || self.corpus.chunk_overlap >= self.corpus.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "corpus.chunk_overlap ({}) must be smaller than corpus.chunk_size ({})",
                self.corpus.chunk_overlap, self.corpus.chunk_size
            )));
        }
        if self.embedding.dim == 0 {
            return Err(Error::InvalidConfig("embedding.dim must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    pub vectorstore_dir: String,
    pub top_k: usize,
    /// Squared-L2 cutoff. Its right value depends on the embedding model.
    pub similarity_threshold: f32,
    pub preview_chars: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            vectorstore_dir: "data/vectorstore".to_string(),
            top_k: 5,
            similarity_threshold: 2.0,
            preview_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model_dir: Option<String>,
    pub use_fake: bool,
    /// Dimension of the hashing embedder. Model embedders report their own.
    pub dim: usize,
    pub max_len: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { model_dir: None, use_fake: false, dim: 384, max_len: 256 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    /// OpenAI-compatible base URL. Unset means the templated fallback answers.
    pub endpoint: Option<String>,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: usize,
    pub temperature: f32,
    pub top_p: f32,
    pub history_turns: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: "lawbot-qwen2.5-1.5b".to_string(),
            api_key: None,
            max_tokens: 256,
            temperature: 0.7,
            top_p: 0.9,
            history_turns: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSettings {
    pub dictionary: Vec<LegalTerm>,
    pub date_calculator: bool,
    pub case_lookup: bool,
}

impl Default for ToolsSettings {
    fn default() -> Self {
        Self { dictionary: default_dictionary(), date_calculator: true, case_lookup: true }
    }
}

pub fn default_dictionary() -> Vec<LegalTerm> {
    vec![
        LegalTerm::new("ipc", "Indian Penal Code - Criminal law of India"),
        LegalTerm::new("crpc", "Code of Criminal Procedure - Procedure for criminal cases"),
        LegalTerm::new("constitution", "Constitution of India - Supreme law of India"),
        LegalTerm::new("bail", "Release of accused from custody pending trial"),
        LegalTerm::new("arrest", "Taking of a person into custody for alleged offence"),
        LegalTerm::new("murder", "Causing death with intention under IPC Section 300"),
        LegalTerm::new("theft", "Taking movable property without consent under IPC Section 378"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusSettings {
    pub data_dir: String,
    /// Characters per chunk.
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self { data_dir: "data/datasets".to_string(), chunk_size: 800, chunk_overlap: 100, batch_size: 32 }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let s = Config::from_toml_str("").settings().expect("settings");
        assert_eq!(s.rag.top_k, 5);
        assert!((s.rag.similarity_threshold - 2.0).abs() < f32::EPSILON);
        assert_eq!(s.tools.dictionary.len(), 7);
        assert_eq!(s.tools.dictionary[0].term, "ipc");
        assert!(s.generator.endpoint.is_none());
    }

    #[test]
    fn toml_overrides_nested_values() {
        let cfg = Config::from_toml_str(
            r#"
            [rag]
            similarity_threshold = 0.75
            [[tools.dictionary]]
            term = "writ"
            definition = "A formal written order"
            "#,
        );
        let s = cfg.settings().expect("settings");
        assert!((s.rag.similarity_threshold - 0.75).abs() < f32::EPSILON);
        assert_eq!(s.rag.top_k, 5, "untouched keys keep defaults");
        assert_eq!(s.tools.dictionary.len(), 1);
        assert_eq!(cfg.get::<usize>("rag.top_k").expect("get"), 5);
    }

    #[test]
    fn validate_rejects_zero_top_k_and_bad_threshold() {
        let err = Config::from_toml_str("[rag]\ntop_k = 0").settings().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        let err = Config::from_toml_str("[rag]\nsimilarity_threshold = -1.0").settings().unwrap_err();
        assert!(err.to_string().contains("similarity_threshold"));
    }

    #[test]
    fn validate_rejects_overlap_not_smaller_than_chunk() {
        let err = Config::from_toml_str("[corpus]\nchunk_size = 100\nchunk_overlap = 100").settings().unwrap_err();
        assert!(err.to_string().contains("chunk_overlap"));
    }

    #[test]
    fn resolve_with_base_keeps_absolute_paths() {
        let base = Path::new("/srv/lawbot");
        assert_eq!(resolve_with_base(base, "data/vectorstore"), PathBuf::from("/srv/lawbot/data/vectorstore"));
        assert_eq!(resolve_with_base(base, "/opt/index"), PathBuf::from("/opt/index"));
    }
}
