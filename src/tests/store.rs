use super::{DocumentStore, SaveOrigin, SavePayload, SaveRequest, SaveWorker, StoreError};
use crate::document::{Link, LinkDocument, NotesDocument, Section};
use std::fs;
use std::thread;
use std::time::Duration;

fn store_in(dir: &tempfile::TempDir) -> DocumentStore {
    DocumentStore::new(dir.path().to_path_buf())
}

fn sample_doc() -> LinkDocument {
    LinkDocument {
        sections: vec![Section {
            title: "A".to_string(),
            links: vec![Link {
                name: "X".to_string(),
                url: "http://x".to_string(),
            }],
        }],
    }
}

#[test]
fn test_bootstrap_creates_all_documents() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.bootstrap().unwrap();

    assert!(store.links_path().exists());
    assert!(store.settings_path().exists());
    assert!(store.notes_path().exists());

    // And they parse back as valid documents.
    assert!(!store.load_links().unwrap().sections.is_empty());
    store.load_settings().unwrap();
    assert_eq!(store.load_notes().unwrap(), NotesDocument::default());
}

#[test]
fn test_bootstrap_keeps_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.bootstrap().unwrap();
    let doc = sample_doc();
    store.save_links(&doc).unwrap();

    store.bootstrap().unwrap();
    assert_eq!(
        store.load_links().unwrap(),
        doc,
        "bootstrap must never clobber an existing document"
    );
}

#[test]
fn test_save_load_round_trip_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.bootstrap().unwrap();

    let doc = sample_doc();
    store.save_links(&doc).unwrap();

    assert_eq!(store.load_links().unwrap(), doc);
}

#[test]
fn test_unparseable_document_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.bootstrap().unwrap();
    fs::write(store.links_path(), "{ not json").unwrap();

    assert!(matches!(store.load_links(), Err(StoreError::Parse(_))));
}

#[test]
fn test_missing_document_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    assert!(matches!(store.load_links(), Err(StoreError::Io(_))));
}

fn wait_for_outcome(worker: &SaveWorker) -> super::SaveOutcome {
    for _ in 0..200 {
        if let Some(outcome) = worker.poll() {
            return outcome;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("save worker never reported an outcome");
}

#[test]
fn test_worker_writes_and_reports_origin() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.bootstrap().unwrap();

    let worker = SaveWorker::spawn(store.clone());
    let doc = sample_doc();
    worker.submit(SaveRequest {
        origin: SaveOrigin::Commit,
        payload: SavePayload::Links(doc.clone()),
    });

    let outcome = wait_for_outcome(&worker);
    assert_eq!(outcome.origin, SaveOrigin::Commit);
    assert!(outcome.result.is_ok());
    assert_eq!(store.load_links().unwrap(), doc);
}

#[test]
fn test_worker_serializes_writes_in_submission_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.bootstrap().unwrap();

    let worker = SaveWorker::spawn(store.clone());

    let first = sample_doc();
    let mut second = sample_doc();
    second.sections[0].title = "B".to_string();

    worker.submit(SaveRequest {
        origin: SaveOrigin::QuickAdd,
        payload: SavePayload::Links(first),
    });
    worker.submit(SaveRequest {
        origin: SaveOrigin::Commit,
        payload: SavePayload::Links(second.clone()),
    });

    let quick_add = wait_for_outcome(&worker);
    let commit = wait_for_outcome(&worker);
    assert_eq!(quick_add.origin, SaveOrigin::QuickAdd);
    assert_eq!(commit.origin, SaveOrigin::Commit);

    assert_eq!(
        store.load_links().unwrap(),
        second,
        "the later submission must win on disk"
    );
}
