use std::fs;
use tempfile::TempDir;

use lawbot_core::data_processor::{CorpusDocument, DataProcessor};
use lawbot_core::error::Error;
use lawbot_core::types::PassageMeta;
use lawbot_embed::{Embedder, HashingEmbedder};
use lawbot_vector::{FlatL2Index, IndexBuilder, PassageStore, VectorStore, INDEX_FILE, MANIFEST_FILE, METADATA_FILE};

fn small_store() -> (FlatL2Index, PassageStore) {
    let index = FlatL2Index::from_flat(2, vec![0.0, 0.0, 1.0, 0.0, 0.0, 3.0]).unwrap();
    let passages = PassageStore::new(
        vec!["bail text".into(), "arrest text".into(), "theft text".into()],
        vec![PassageMeta::from_source("CrPC"), PassageMeta::from_source("CrPC"), PassageMeta::from_source("IPC")],
    )
    .unwrap();
    (index, passages)
}

#[test]
fn save_then_load_preserves_rows_and_search() {
    let tmp = TempDir::new().unwrap();
    let (index, passages) = small_store();
    let manifest = VectorStore::save(tmp.path(), &index, &passages, "test:d2").expect("save");
    assert_eq!(manifest.count, 3);

    let store = VectorStore::load(tmp.path()).expect("load");
    assert_eq!(store.count(), 3);
    assert_eq!(store.dim(), 2);
    assert_eq!(store.embedder_id(), Some("test:d2"));

    let hits = store.search(&[0.9, 0.0], 2).unwrap();
    assert_eq!(hits[0].passage_index, 1);
    assert_eq!(store.passage(hits[0].passage_index).unwrap().text, "arrest text");
}

#[test]
fn missing_directory_is_unavailable() {
    let tmp = TempDir::new().unwrap();
    let err = VectorStore::load(&tmp.path().join("nope")).unwrap_err();
    assert!(matches!(err, Error::IndexUnavailable(_)));
}

#[test]
fn metadata_shorter_than_index_is_misaligned() {
    let tmp = TempDir::new().unwrap();
    let (index, passages) = small_store();
    VectorStore::save(tmp.path(), &index, &passages, "test:d2").unwrap();
    fs::write(tmp.path().join(METADATA_FILE), r#"[{"source":"CrPC"},{"source":"CrPC"}]"#).unwrap();

    let err = VectorStore::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::IndexMisaligned(_)), "got {err}");
}

#[test]
fn tampered_index_fails_checksum() {
    let tmp = TempDir::new().unwrap();
    let (index, passages) = small_store();
    VectorStore::save(tmp.path(), &index, &passages, "test:d2").unwrap();
    let path = tmp.path().join(INDEX_FILE);
    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&path, bytes).unwrap();

    let err = VectorStore::load(tmp.path()).unwrap_err();
    assert!(matches!(err, Error::IndexUnavailable(_)));
    assert!(err.to_string().contains("checksum"));
}

#[test]
fn store_without_manifest_still_loads() {
    let tmp = TempDir::new().unwrap();
    let (index, passages) = small_store();
    VectorStore::save(tmp.path(), &index, &passages, "test:d2").unwrap();
    fs::remove_file(tmp.path().join(MANIFEST_FILE)).unwrap();

    let store = VectorStore::load(tmp.path()).expect("load");
    assert!(store.manifest().is_none());
    assert_eq!(store.count(), 3);
}

#[test]
fn corpus_build_with_hashing_embedder_finds_its_own_passage() {
    let tmp = TempDir::new().unwrap();
    let docs = vec![
        CorpusDocument { doc_id: "a".into(), source: "CrPC".into(), text: "Question: What is bail?\nAnswer: Release pending trial".into() },
        CorpusDocument { doc_id: "b".into(), source: "IPC".into(), text: "Question: What is theft?\nAnswer: Section 378 movable property".into() },
    ];
    let chunks = DataProcessor::new().chunk_documents(&docs);
    let embedder = HashingEmbedder::new(64);

    let manifest = IndexBuilder::new(&embedder).batch_size(1).build_and_save(&chunks, tmp.path()).expect("build");
    assert_eq!(manifest.count, 2);
    assert_eq!(manifest.embedder_id, embedder.id());

    let store = VectorStore::load(tmp.path()).expect("load");
    let query = embedder.embed("What is theft? Section 378 movable property").unwrap();
    let hits = store.search(&query, 1).unwrap();
    assert_eq!(store.passage(hits[0].passage_index).unwrap().source, "IPC");
}
