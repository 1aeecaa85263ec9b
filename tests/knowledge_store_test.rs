//! Integration tests for the knowledge store:
//! - Corpus round-trip and wire-format fidelity
//! - Graceful degradation on missing or corrupt corpus files
//! - End-to-end lookup and learn scenarios

use knowbot::knowledge::{KnowledgeBase, DEFAULT_TAG};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tempfile::TempDir;

fn corpus_path(dir: &TempDir) -> PathBuf {
    dir.path().join("intents.json")
}

fn write_greeting_corpus(dir: &TempDir) -> PathBuf {
    let path = corpus_path(dir);
    let doc = serde_json::json!({
        "intents": [
            {
                "tag": "greeting",
                "patron": ["hi", "hello"],
                "respuesta": ["Hey!"],
                "context_set": ""
            }
        ]
    });
    std::fs::write(&path, doc.to_string()).unwrap();
    path
}

fn seeded(path: PathBuf) -> KnowledgeBase {
    KnowledgeBase::load_with_rng(path, StdRng::seed_from_u64(1)).unwrap()
}

// =====================================================================
// LOAD: GRACEFUL DEGRADATION
// =====================================================================

#[test]
fn test_missing_file_yields_empty_store() {
    let dir = TempDir::new().unwrap();
    let mut kb = seeded(corpus_path(&dir));

    assert!(kb.is_empty());
    assert_eq!(kb.lookup("hello"), None);
    assert!(!kb.is_dirty());
}

#[test]
fn test_corrupt_file_yields_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = corpus_path(&dir);
    std::fs::write(&path, "{not valid json at all").unwrap();

    let kb = seeded(path);
    assert!(kb.is_empty());
}

#[test]
fn test_wrong_shape_yields_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = corpus_path(&dir);
    // Valid JSON, wrong structure for the intents document.
    std::fs::write(&path, r#"{"intents": "not a list"}"#).unwrap();

    let kb = seeded(path);
    assert!(kb.is_empty());
}

#[test]
fn test_missing_intents_field_yields_empty_store() {
    let dir = TempDir::new().unwrap();
    let path = corpus_path(&dir);
    std::fs::write(&path, "{}").unwrap();

    let kb = seeded(path);
    assert!(kb.is_empty());
}

// =====================================================================
// PERSIST: ROUND-TRIP AND WIRE FORMAT
// =====================================================================

#[test]
fn test_persist_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_greeting_corpus(&dir);

    let mut kb = seeded(path.clone());
    kb.learn("bye", "See you!", Some("farewell"));
    kb.learn("hello", "Howdy!", None);
    kb.persist().unwrap();

    let reloaded = seeded(path);
    assert_eq!(reloaded.records(), kb.records());
    assert_eq!(reloaded.records()[0].tag, "greeting");
    assert_eq!(reloaded.records()[0].replies, vec!["Hey!", "Howdy!"]);
    assert_eq!(reloaded.records()[1].tag, "farewell");
}

#[test]
fn test_persisted_file_uses_wire_field_names() {
    let dir = TempDir::new().unwrap();
    let mut kb = seeded(corpus_path(&dir));
    kb.learn("ping", "pong", None);
    kb.persist().unwrap();

    let raw = std::fs::read_to_string(corpus_path(&dir)).unwrap();
    assert!(raw.contains("\"intents\""));
    assert!(raw.contains("\"patron\""));
    assert!(raw.contains("\"respuesta\""));
    assert!(raw.contains("\"context_set\""));
    assert!(!raw.contains("\"patterns\""));
    assert!(!raw.contains("\"replies\""));
}

#[test]
fn test_persist_overwrites_previous_content() {
    let dir = TempDir::new().unwrap();
    let path = write_greeting_corpus(&dir);

    let mut kb = seeded(path.clone());
    kb.learn("bye", "See you!", None);
    kb.persist().unwrap();
    kb.persist().unwrap();

    let reloaded = seeded(path);
    assert_eq!(reloaded.len(), 2);
}

#[test]
fn test_persist_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let mut kb = seeded(corpus_path(&dir));
    kb.learn("ping", "pong", None);
    kb.persist().unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name != "intents.json")
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);
}

#[test]
fn test_persist_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("intents.json");

    let mut kb = seeded(path.clone());
    kb.learn("ping", "pong", None);
    kb.persist().unwrap();

    assert!(path.exists());
}

// =====================================================================
// SCENARIOS
// =====================================================================

#[test]
fn test_greeting_scenario() {
    let dir = TempDir::new().unwrap();
    let mut kb = seeded(write_greeting_corpus(&dir));

    assert_eq!(kb.lookup("Hello there").as_deref(), Some("Hey!"));
}

#[test]
fn test_learn_then_lookup_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_greeting_corpus(&dir);
    let mut kb = seeded(path.clone());

    assert_eq!(kb.lookup("bye"), None);
    kb.learn("bye", "See you!", None);
    kb.persist().unwrap();

    assert_eq!(kb.lookup("bye").as_deref(), Some("See you!"));

    // Learning survives a reload.
    let mut reloaded = seeded(path);
    assert_eq!(reloaded.lookup("bye").as_deref(), Some("See you!"));
    let record = reloaded.records().last().unwrap();
    assert_eq!(record.tag, DEFAULT_TAG);
}

#[test]
fn test_learn_from_scratch_scenario() {
    // Empty corpus; the agent learns everything from the user.
    let dir = TempDir::new().unwrap();
    let path = corpus_path(&dir);
    let mut kb = seeded(path.clone());

    kb.learn("what is your name", "I'm Knowbot.", None);
    kb.learn("what is your name", "Knowbot, at your service.", None);
    kb.persist().unwrap();

    let reloaded = seeded(path);
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.records()[0].replies.len(), 2);
}

#[test]
fn test_quarantined_record_is_not_persisted() {
    let dir = TempDir::new().unwrap();
    let path = corpus_path(&dir);
    let doc = serde_json::json!({
        "intents": [
            { "tag": "empty", "patron": [], "respuesta": ["orphan"], "context_set": "" },
            { "tag": "ok", "patron": ["fine"], "respuesta": ["works"], "context_set": "" }
        ]
    });
    std::fs::write(&path, doc.to_string()).unwrap();

    let mut kb = seeded(path.clone());
    assert_eq!(kb.len(), 1);

    kb.learn("extra", "added", None);
    kb.persist().unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("orphan"));
    assert!(raw.contains("works"));
}
