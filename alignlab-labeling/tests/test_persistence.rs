use std::fs::read_to_string;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::tempdir;

use alignlab_core::models::Group;
use alignlab_labeling::{LabelingEngine, LoadPolicy};

#[fixture]
fn content() -> String {
    read_to_string(PathBuf::from("../tests/data/labeling.jsonl")).unwrap()
}

#[rstest]
fn test_single_record_round_trip() {
    let saved: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&saved);

    let mut engine = LabelingEngine::from_content(r#"{"idx":5,"match":[[[0,2],[1,1]]]}"#, LoadPolicy::Abort)
        .unwrap()
        .with_on_save(move |dumped| *sink.lock().unwrap() = Some(dumped.to_string()));
    engine.save().unwrap();

    let dumped = saved.lock().unwrap().clone().unwrap();
    let reloaded = LabelingEngine::from_content(&dumped, LoadPolicy::Abort).unwrap();

    assert_eq!(reloaded.get_tokens_on_group(5, Group::Comment), Some(vec![vec![0, 1, 2]]));
    assert_eq!(reloaded.get_tokens_on_group(5, Group::Code), Some(vec![vec![1]]));
}

#[rstest]
fn test_fixture_file_round_trip(content: String) {
    let engine = LabelingEngine::from_content(&content, LoadPolicy::Abort).unwrap();
    let dumped = engine.dump().unwrap();

    // the fixture is already in compact form
    assert_eq!(dumped, content.trim_end());
}

#[rstest]
fn test_save_to_file_then_reload(content: String) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("labeling.jsonl");

    let target = path.clone();
    let mut engine = LabelingEngine::from_content(&content, LoadPolicy::Abort)
        .unwrap()
        .with_on_save(move |dumped| std::fs::write(&target, dumped).unwrap());

    engine.change_tokens_to_label(3, Group::Comment, 0, &[0, 1, 2]);
    engine.save().unwrap();

    let reloaded = LabelingEngine::from_content(&read_to_string(&path).unwrap(), LoadPolicy::Abort).unwrap();

    assert_eq!(reloaded.get_sample_indices(), &[5, 0, 3]);
    assert_eq!(
        reloaded.get_tokens_on_group(3, Group::Comment),
        Some(vec![vec![0, 1, 2], vec![3]])
    );
    assert_eq!(reloaded.is_modified(3), false);
}
