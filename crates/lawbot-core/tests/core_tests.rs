use std::fs;
use std::io::Write;
use tempfile::TempDir;

use figment::Jail;

use lawbot_core::config::Config;
use lawbot_core::data_processor::{ChunkingConfig, DataProcessor};

#[test]
fn process_directory_reads_qa_datasets_with_upper_case_source() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(
        dir.join("ipc_qa.json"),
        r#"[{"question": "What is theft?", "answer": "Section 378."},
            {"question": "What is murder?", "answer": "Section 300."}]"#,
    )
    .unwrap();

    let chunks = DataProcessor::new().process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 2, "two short records become two chunks");
    assert!(chunks.iter().all(|c| c.source == "IPC"));
    assert_eq!(chunks[0].text, "Question: What is theft?\nAnswer: Section 378.\nSource: IPC");
}

#[test]
fn process_directory_skips_malformed_jsonl_lines() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("lawbot_cleaned.jsonl");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, r#"{{"instruction": "Define bail", "output": "Release pending trial", "source": "CrPC"}}"#).unwrap();
    writeln!(f, "not json").unwrap();
    writeln!(f).unwrap();
    writeln!(f, r#"{{"instruction": "Define FIR", "output": "First information report", "source": "CrPC"}}"#).unwrap();

    let chunks = DataProcessor::new().process_directory(tmp.path()).expect("process");

    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].text.starts_with("Question: Define bail"));
    assert_ne!(chunks[0].doc_id, chunks[1].doc_id);
}

#[test]
fn long_records_are_split_with_overlap() {
    let tmp = TempDir::new().unwrap();
    let long_answer = "x".repeat(1500);
    fs::write(
        tmp.path().join("constitution_qa.json"),
        format!(r#"[{{"question": "Q", "answer": "{}"}}]"#, long_answer),
    )
    .unwrap();

    let processor = DataProcessor::with_config(ChunkingConfig { chunk_size: 800, chunk_overlap: 100 });
    let chunks = processor.process_directory(tmp.path()).expect("process");

    assert!(chunks.len() >= 2);
    for ch in &chunks {
        assert!(ch.text.chars().count() <= 800);
        assert_eq!(ch.source, "CONSTITUTION");
    }
    let first_tail: String = chunks[0].text.chars().skip(700).collect();
    assert!(chunks[1].text.starts_with(&first_tail), "next window starts 100 chars back");
}

#[test]
fn process_directory_limited_two_files_limit_one() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.txt"), "charlie delta").unwrap();

    let processor = DataProcessor::new();
    let chunks = processor.process_directory_limited(dir, 1).expect("process limited");

    let mut doc_ids = std::collections::HashSet::new();
    for c in &chunks { doc_ids.insert(c.doc_id.clone()); }
    assert_eq!(doc_ids.len(), 1, "limited to one source document");
}

#[test]
fn empty_directory_is_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let chunks = DataProcessor::new().process_directory(tmp.path()).expect("process");
    assert!(chunks.is_empty());
}

#[test]
fn env_vars_override_config_files_with_nested_keys() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[rag]\ntop_k = 7\nsimilarity_threshold = 1.2\n")?;
        jail.create_file("config.test.toml", "[generator]\nmax_tokens = 128\n")?;
        jail.set_env("RUST_ENV", "test");
        jail.set_env("APP_RAG__SIMILARITY_THRESHOLD", "0.5");

        let config = Config::load().map_err(|e| e.to_string())?;
        assert_eq!(config.env_name(), "test");
        let settings = config.settings().map_err(|e| e.to_string())?;
        assert_eq!(settings.rag.top_k, 7);
        assert_eq!(settings.rag.similarity_threshold, 0.5);
        assert_eq!(settings.generator.max_tokens, 128);
        Ok(())
    });
}

#[test]
fn production_rejects_fake_embeddings() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[embedding]\nuse_fake = true\n")?;
        jail.set_env("RUST_ENV", "production");

        let err = Config::load().err().ok_or_else(|| "production config with use_fake loaded".to_string())?;
        assert!(err.to_string().contains("use_fake must be false in production"));
        Ok(())
    });
}
