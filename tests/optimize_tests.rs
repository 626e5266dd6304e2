mod common;

use std::fs;
use std::path::Path;
use treedex::analysis::language::Language;
use treedex::command::{Command, CreateIndex, Optimize};
use treedex::core::config::{Config, StopWords};
use treedex::core::error::ErrorKind;
use treedex::core::store::Store;
use treedex::core::types::Kind;
use treedex::index::IndexType;
use treedex::storage::ancestry::AncestorStack;
use treedex::storage::update::UpdateScope;

fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files = Vec::new();
    for sub in ["idx", "meta"] {
        let mut entries: Vec<_> = fs::read_dir(dir.join(sub))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        entries.sort();
        for path in entries {
            files.push((path.display().to_string(), fs::read(&path).unwrap()));
        }
    }
    files
}

#[test]
fn five_record_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::create(Config::new(dir.path()), "db", common::sample_records()).unwrap();
    Optimize::new().run(&mut store).unwrap();

    assert_eq!(store.meta().ndocs, 1);
    let a = store.tag_stats("a").unwrap();
    assert_eq!(a.occurrences, vec![1]);
    assert_eq!(a.values, vec![b"hello".to_vec()]);
    let b = store.tag_stats("b").unwrap();
    assert_eq!(b.occurrences, vec![4]);
    assert!(b.values.is_empty());

    let id = store.attribute_name_stats("id").unwrap();
    assert_eq!(id.occurrences, vec![2]);
    assert_eq!(id.values, vec![b"1".to_vec()]);

    assert_eq!(store.path_count("a", Kind::Element, 1), 1);
    assert_eq!(store.path_count("b", Kind::Element, 1), 1);
    assert_eq!(store.path_count("", Kind::Text, 2), 1);
}

#[test]
fn reconstructed_ancestry_matches_ground_truth() {
    for seed in 0..20 {
        let (records, parents) = common::random_records(seed, 4);
        let mut stack = AncestorStack::new();

        for pre in 0..records.size() as u32 {
            stack.close_until(records.parent(pre));
            let reconstructed = if records.kind(pre) == Kind::Document { None } else { stack.parent() };
            assert_eq!(reconstructed, parents[pre as usize], "seed {} pre {}", seed, pre);
            if records.kind(pre).is_container() {
                stack.open(pre, records.name(pre));
            }
        }
    }
}

#[test]
fn document_count_matches_document_records() {
    let dir = tempfile::tempdir().unwrap();
    let (records, _) = common::random_records(7, 9);
    let documents = records.documents().count() as u32;
    let mut store = Store::create(Config::new(dir.path()), "db", records).unwrap();
    Optimize::new().run(&mut store).unwrap();

    assert_eq!(documents, 9);
    assert_eq!(store.meta().ndocs, documents);
    assert_eq!(store.path_count("", Kind::Document, 1), documents);
}

#[test]
fn optimize_twice_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::new(dir.path());
    config.options.text_index = true;
    config.options.attribute_index = true;
    config.options.fulltext_index = true;
    config.options.fulltext.stemming = true;
    let mut store = Store::create(config, "db", common::library_records()).unwrap();

    Optimize::new().run(&mut store).unwrap();
    let first = snapshot(dir.path());
    Optimize::new().run(&mut store).unwrap();
    let second = snapshot(dir.path());

    assert_eq!(first, second);
    assert!(first.iter().any(|(name, _)| name.ends_with("fulltext.idx")));
}

#[test]
fn selective_rebuild_gating() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::create(Config::new(dir.path()), "db", common::library_records()).unwrap();
    Optimize::new().run(&mut store).unwrap();

    for index_type in IndexType::SELECTIVE {
        assert!(!store.is_indexed(index_type));
        assert!(!store.layout().index_path(index_type).exists());
    }

    // present flag alone keeps the index alive
    CreateIndex::new("attribute").run(&mut store).unwrap();
    Optimize::new().run(&mut store).unwrap();
    assert!(store.is_indexed(IndexType::Attribute));
    assert_eq!(store.attribute_postings("bo"), vec![10]);

    // configuration alone builds it
    store.config_mut().options.token_index = true;
    Optimize::new().run(&mut store).unwrap();
    assert!(store.is_indexed(IndexType::Token));
    assert_eq!(store.token_postings("ana"), vec![2, 18]);
    assert!(!store.is_indexed(IndexType::Text));
}

#[test]
fn failed_selective_rebuild_keeps_statistics() {
    let dir = tempfile::tempdir().unwrap();
    let stop_words = dir.path().join("stop.txt");
    fs::write(&stop_words, "the\nto\n").unwrap();

    let mut config = Config::new(dir.path().join("db"));
    config.options.fulltext.stop_words = StopWords::File(stop_words.clone());
    config.options.fulltext.language = Language::English;
    let mut store = Store::create(config.clone(), "db", common::library_records()).unwrap();
    CreateIndex::new("text").run(&mut store).unwrap();
    CreateIndex::new("fulltext").run(&mut store).unwrap();
    assert!(store.fulltext_postings("the").is_empty());
    assert_eq!(store.fulltext_postings("trees"), vec![4, 7, 23]);

    fs::remove_file(&stop_words).unwrap();
    let err = Optimize::new().run(&mut store).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Io);

    let meta = store.meta();
    assert_eq!(meta.ndocs, 3);
    assert!(meta.uptodate);
    assert!(meta.dirty);
    assert!(!meta.fulltext_index);
    assert!(meta.text_index);
    assert!(!store.layout().update_marker_path().exists());

    let reopened = Store::open(config).unwrap();
    assert_eq!(reopened.meta().ndocs, 3);
    assert!(reopened.meta().dirty);
    assert!(!reopened.is_indexed(IndexType::FullText));
    assert_eq!(reopened.text_postings("Paths"), vec![20]);
}

#[test]
fn stop_before_start_interrupts() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::create(Config::new(dir.path()), "db", common::sample_records()).unwrap();
    let mut optimize = Optimize::new();
    optimize.stop();

    assert_eq!(optimize.run(&mut store).unwrap_err().kind, ErrorKind::Interrupted);
    assert_eq!(store.meta().ndocs, 0);
    assert!(!store.meta().uptodate);
    assert!(!store.layout().update_marker_path().exists());
}

#[test]
fn optimize_reports_progress() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::create(Config::new(dir.path()), "db", common::library_records()).unwrap();
    let mut optimize = Optimize::new();
    optimize.run(&mut store).unwrap();
    assert!(optimize.progress() > 0.9);
}

#[test]
fn unfinished_update_marks_store_stale() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(dir.path());
    let mut store = Store::create(config.clone(), "db", common::sample_records()).unwrap();
    Optimize::new().run(&mut store).unwrap();
    assert!(!store.meta().dirty);

    let scope = UpdateScope::begin(store.layout()).unwrap();
    drop(scope);
    drop(store);

    let store = Store::open(config).unwrap();
    assert!(store.meta().dirty);
    assert!(!store.meta().uptodate);
    assert_eq!(store.meta().ndocs, 1);

    let mut store = store;
    Optimize::new().run(&mut store).unwrap();
    assert!(store.meta().uptodate);
    assert!(!store.layout().update_marker_path().exists());
}

#[test]
fn concurrent_update_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = Store::create(Config::new(dir.path()), "db", common::sample_records()).unwrap();
    let _held = UpdateScope::begin(store.layout()).unwrap();

    let err = Optimize::new().run(&mut store).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Locked);
    assert_eq!(store.meta().ndocs, 0);
}

#[test]
fn corrupt_statistics_are_rebuilt_by_optimize() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(dir.path());
    let mut store = Store::create(config.clone(), "db", common::sample_records()).unwrap();
    Optimize::new().run(&mut store).unwrap();
    let path = store.layout().index_path(IndexType::Tag);
    drop(store);

    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&path, bytes).unwrap();

    let mut store = Store::open(config.clone()).unwrap();
    assert!(!store.meta().uptodate);
    assert!(store.meta().dirty);
    assert!(store.tag_stats("a").is_none());

    Optimize::new().run(&mut store).unwrap();
    assert!(store.meta().uptodate);
    assert!(!store.meta().dirty);
    assert_eq!(store.tag_stats("a").unwrap().occurrences, vec![1]);

    let reopened = Store::open(config).unwrap();
    assert!(reopened.meta().uptodate);
    assert_eq!(reopened.tag_stats("b").unwrap().occurrences, vec![4]);
}
