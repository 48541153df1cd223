use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::*;

use alignlab::core::models::Group;
use alignlab::core::{AnnotatorConfig, Corpus};
use alignlab::labeling::{LabelingEngine, LoadPolicy};
use alignlab::refs::TeachersRelationshipProvider;
use alignlab::tokenizers::Reconciler;

#[fixture]
fn config() -> AnnotatorConfig {
    let path = PathBuf::from("../tests/data/alignlab.toml");
    AnnotatorConfig::try_from(path.as_path()).unwrap()
}

#[fixture]
fn engine(config: AnnotatorConfig) -> LabelingEngine {
    let content = fs::read_to_string(config.labeling_path()).unwrap();
    LabelingEngine::from_content(&content, LoadPolicy::Abort).unwrap()
}

#[rstest]
fn test_labels_follow_reconciled_tokens(config: AnnotatorConfig, engine: LabelingEngine) {
    let corpus = Corpus::from_config(&config).unwrap();
    let reconciler = Reconciler::default();

    let code = reconciler.reconcile_sample(&corpus, 0, Group::Code).unwrap();
    let labels = engine.get_tokens_on_group(0, Group::Code).unwrap();
    let annotated = code.annotate(&labels, &[]);

    let labeled: Vec<(&str, Option<usize>)> = annotated
        .iter()
        .filter(|span| span.token.is_some())
        .map(|span| (span.text, span.label))
        .collect();

    assert_eq!(code.dropped, Vec::<usize>::new());
    assert_eq!(labeled[3], ("a", Some(1)));
    assert_eq!(labeled[7], ("return", None));
    assert_eq!(labeled[9], ("+", Some(0)));
    assert_eq!(code.text.contains("Return the sum"), false);
}

#[rstest]
fn test_edit_and_write_back(mut engine: LabelingEngine) {
    engine.change_tokens_to_label(0, Group::Code, 0, &[7]);
    assert_eq!(engine.is_modified(0), true);
    assert_eq!(engine.is_modified(5), false);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("labeling.jsonl");
    fs::write(&out, engine.dump().unwrap()).unwrap();

    let reloaded = LabelingEngine::from_content(&read(&out), LoadPolicy::Abort).unwrap();
    assert_eq!(reloaded.get_sample_indices(), &[5, 0, 3]);
    assert_eq!(
        reloaded.get_tokens_on_group(0, Group::Code),
        Some(vec![vec![7, 9], vec![3, 5, 8, 10]])
    );
}

#[rstest]
fn test_teachers_point_at_labeled_samples(config: AnnotatorConfig, engine: LabelingEngine) {
    let content = fs::read_to_string(config.teacher_path()).unwrap();
    let teachers: TeachersRelationshipProvider = content.parse().unwrap();

    for teacher in teachers.teacher_indices(5) {
        assert_eq!(engine.get_labeling_on_sample(teacher).is_some(), true);
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
