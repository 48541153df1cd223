use std::fmt;
use std::sync::Arc;

use fxhash::FxHashMap as HashMap;
use log::{debug, info};

use alignlab_core::jsonl::{LinePolicy, parse_json_lines};
use alignlab_core::models::{Group, LabelingRecord, SampleIndex, TokenIndex, match_to_indices};

use crate::error::LabelingError;
use crate::store::SampleLabeling;

/// Receives the serialized labeling on [LabelingEngine::save].
pub type SaveCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Unloaded,
    Loaded,
    Mutated,
    Saved,
}

///
/// The labeling of a whole corpus: which tokens of each sample belong to
/// which label, per group.
///
/// Reads never fail and mutators are no-ops on paths that do not exist,
/// except for the add operations which grow the sample as needed. Only
/// [LabelingEngine::load] can fail, and a failed load leaves the engine
/// untouched.
///
#[derive(Clone, Default)]
pub struct LabelingEngine {
    labels: HashMap<SampleIndex, SampleLabeling>,
    // insertion order of `labels`, drives the save order
    order: Vec<SampleIndex>,
    sample_indices: Vec<SampleIndex>,
    original: HashMap<SampleIndex, SampleLabeling>,
    on_save: Option<SaveCallback>,
    state: EngineState,
}

impl LabelingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Create an engine from the content of a labeling file.
    ///
    /// # Arguments:
    /// - content: line-delimited `{"idx": .., "match": ..}` records
    /// - policy: what to do with a malformed line
    ///
    pub fn from_content(content: &str, policy: LinePolicy) -> Result<Self, LabelingError> {
        let mut engine = LabelingEngine::new();
        engine.load(content, policy)?;
        Ok(engine)
    }

    pub fn with_on_save<F>(mut self, on_save: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_save = Some(Arc::new(on_save));
        self
    }

    pub fn set_on_save(&mut self, on_save: Option<SaveCallback>) {
        self.on_save = on_save;
    }

    ///
    /// Replace the whole labeling with the content of a labeling file.
    ///
    /// Every line is parsed before anything is replaced. A sample listed
    /// twice keeps its first position and its last labeling.
    ///
    pub fn load(&mut self, content: &str, policy: LinePolicy) -> Result<(), LabelingError> {
        let records = parse_json_lines(content, policy, LabelingRecord::parse_line)?;

        let mut labels: HashMap<SampleIndex, SampleLabeling> = HashMap::default();
        let mut order = Vec::with_capacity(records.len());
        for record in records {
            let labeling = SampleLabeling::from_expanded(&match_to_indices(&record.ranges));
            if labels.insert(record.idx, labeling).is_none() {
                order.push(record.idx);
            }
        }

        info!("Loaded labeling for {} samples", order.len());

        self.original = labels.clone();
        self.labels = labels;
        self.sample_indices = order.clone();
        self.order = order;
        self.state = EngineState::Loaded;

        Ok(())
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    ///
    /// Sample ids in the order they were first seen by the last load.
    ///
    pub fn get_sample_indices(&self) -> &[SampleIndex] {
        &self.sample_indices
    }

    pub fn get_labeling_on_sample(&self, sample: SampleIndex) -> Option<&SampleLabeling> {
        self.labels.get(&sample)
    }

    pub fn get_num_of_labels_on_sample(&self, sample: SampleIndex) -> usize {
        self.labels
            .get(&sample)
            .map(|labeling| labeling.num_labels())
            .unwrap_or(0)
    }

    pub fn get_tokens_on_group(&self, sample: SampleIndex, group: Group) -> Option<Vec<Vec<TokenIndex>>> {
        self.labels
            .get(&sample)
            .map(|labeling| labeling.tokens_on_group(group))
    }

    pub fn get_tokens_on_group_on_label(
        &self,
        sample: SampleIndex,
        group: Group,
        label: usize,
    ) -> Option<&[TokenIndex]> {
        self.labels.get(&sample)?.tokens(group, label)
    }

    fn sample_mut(&mut self, sample: SampleIndex) -> &mut SampleLabeling {
        if !self.labels.contains_key(&sample) {
            self.order.push(sample);
        }
        self.labels.entry(sample).or_default()
    }

    fn touch(&mut self) {
        self.state = EngineState::Mutated;
    }

    ///
    /// Append tokens to a label. Does not remove them from other labels, use
    /// [Self::change_tokens_to_label] for that.
    ///
    pub fn add_tokens_to_label(
        &mut self,
        sample: SampleIndex,
        group: Group,
        label: usize,
        tokens: &[TokenIndex],
    ) {
        self.sample_mut(sample).add(group, label, tokens);
        self.touch();
    }

    pub fn remove_tokens_on_label(
        &mut self,
        sample: SampleIndex,
        group: Group,
        label: usize,
        tokens: &[TokenIndex],
    ) {
        let Some(labeling) = self.labels.get_mut(&sample) else {
            return;
        };
        if labeling.remove(group, label, tokens) {
            self.touch();
        }
    }

    pub fn remove_tokens_from_all_labels(&mut self, sample: SampleIndex, group: Group, tokens: &[TokenIndex]) {
        let Some(labeling) = self.labels.get_mut(&sample) else {
            return;
        };
        labeling.remove_from_all(group, tokens);
        self.touch();
    }

    ///
    /// Move tokens to a label: they are removed from every label of the
    /// group first, so each token ends up owned by exactly one label.
    ///
    pub fn change_tokens_to_label(
        &mut self,
        sample: SampleIndex,
        group: Group,
        label: usize,
        tokens: &[TokenIndex],
    ) {
        self.remove_tokens_from_all_labels(sample, group, tokens);
        self.add_tokens_to_label(sample, group, label, tokens);
    }

    ///
    /// Label assignment as issued by the annotation front-end: `None`
    /// unlabels the tokens.
    ///
    pub fn set_label_of_tokens(
        &mut self,
        sample: SampleIndex,
        group: Group,
        label: Option<usize>,
        tokens: &[TokenIndex],
    ) {
        match label {
            Some(label) => self.change_tokens_to_label(sample, group, label, tokens),
            None => self.remove_tokens_from_all_labels(sample, group, tokens),
        }
    }

    ///
    /// Replace a sample's labeling with an expanded `label -> group -> indices`
    /// structure, e.g. a model suggestion.
    ///
    pub fn set_raw_index_labeling_on_sample(&mut self, sample: SampleIndex, expanded: &[Vec<Vec<TokenIndex>>]) {
        *self.sample_mut(sample) = SampleLabeling::from_expanded(expanded);
        self.touch();
    }

    ///
    /// Restore a sample to its labeling at the last load, or to an empty
    /// labeling when the load did not contain it.
    ///
    pub fn reset_sample(&mut self, sample: SampleIndex) {
        let original = self.original.get(&sample).cloned().unwrap_or_default();
        *self.sample_mut(sample) = original;
        self.touch();
        debug!("Reset sample {}", sample);
    }

    ///
    /// Drop every label of a sample. Does nothing for unknown samples.
    ///
    pub fn clear_all_labels_for_sample(&mut self, sample: SampleIndex) {
        let Some(labeling) = self.labels.get_mut(&sample) else {
            return;
        };
        *labeling = SampleLabeling::new();
        self.touch();
    }

    ///
    /// Whether a sample differs from its labeling at the last load, compared
    /// on the persisted form.
    ///
    pub fn is_modified(&self, sample: SampleIndex) -> bool {
        let current = self.labels.get(&sample).map(|l| l.to_match());
        let original = self.original.get(&sample).map(|l| l.to_match());
        current != original
    }

    ///
    /// Serialize the whole labeling, one record per line in sample insertion
    /// order, without a trailing newline.
    ///
    pub fn dump(&self) -> Result<String, LabelingError> {
        let mut lines = Vec::with_capacity(self.order.len());
        for sample in self.order.iter() {
            if let Some(labeling) = self.labels.get(sample) {
                lines.push(LabelingRecord::new(*sample, labeling.to_match()).to_json_line()?);
            }
        }
        Ok(lines.join("\n"))
    }

    ///
    /// Hand the serialized labeling to the save callback. Without a callback
    /// this does nothing and returns `false`.
    ///
    pub fn save(&mut self) -> Result<bool, LabelingError> {
        let Some(on_save) = self.on_save.clone() else {
            return Ok(false);
        };
        let dumped = self.dump()?;
        on_save(&dumped);
        self.state = EngineState::Saved;
        debug!("Saved labeling for {} samples", self.order.len());
        Ok(true)
    }
}

impl fmt::Debug for LabelingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LabelingEngine")
            .field("samples", &self.order.len())
            .field("state", &self.state)
            .field("on_save", &self.on_save.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::sync::Mutex;

    #[fixture]
    fn engine() -> LabelingEngine {
        let content = r#"{"idx":5,"match":[[[0,1],[1,2]],[[2,2],[4,4]]]}
{"idx":0,"match":[[[2,2],[9,9]],[[4,4,6,6],[3,3,5,5,8,8,10,10]]]}
{"idx":3,"match":[[[],[]],[[3,3],[3,3,6,6]]]}"#;
        LabelingEngine::from_content(content, LinePolicy::Abort).unwrap()
    }

    #[rstest]
    fn test_load_keeps_file_order(engine: LabelingEngine) {
        assert_eq!(engine.get_sample_indices(), &[5, 0, 3]);
        assert_eq!(engine.state(), EngineState::Loaded);
        assert_eq!(engine.get_num_of_labels_on_sample(0), 2);
        assert_eq!(
            engine.get_tokens_on_group(0, Group::Code),
            Some(vec![vec![9], vec![3, 5, 8, 10]])
        );
    }

    #[rstest]
    fn test_reads_on_missing_paths(engine: LabelingEngine) {
        assert_eq!(engine.get_num_of_labels_on_sample(42), 0);
        assert_eq!(engine.get_tokens_on_group(42, Group::Comment), None);
        assert_eq!(engine.get_tokens_on_group_on_label(0, Group::Comment, 7), None);
        assert_eq!(engine.get_tokens_on_group_on_label(3, Group::Comment, 0), Some(&[][..]));
    }

    #[rstest]
    fn test_exclusive_ownership() {
        let mut engine = LabelingEngine::new();
        engine.add_tokens_to_label(1, Group::Comment, 0, &[1, 2]);
        engine.change_tokens_to_label(1, Group::Comment, 1, &[2]);

        assert_eq!(
            engine.get_tokens_on_group(1, Group::Comment),
            Some(vec![vec![1], vec![2]])
        );

        engine.remove_tokens_from_all_labels(1, Group::Comment, &[2]);
        assert_eq!(engine.get_tokens_on_group_on_label(1, Group::Comment, 1), Some(&[][..]));
    }

    #[rstest]
    fn test_change_keeps_other_group(engine: LabelingEngine) {
        let mut engine = engine;
        engine.change_tokens_to_label(0, Group::Comment, 0, &[4]);

        assert_eq!(
            engine.get_tokens_on_group(0, Group::Comment),
            Some(vec![vec![2, 4], vec![6]])
        );
        assert_eq!(
            engine.get_tokens_on_group(0, Group::Code),
            Some(vec![vec![9], vec![3, 5, 8, 10]])
        );
    }

    #[rstest]
    fn test_set_label_of_tokens_none_unlabels(engine: LabelingEngine) {
        let mut engine = engine;
        engine.set_label_of_tokens(5, Group::Code, None, &[1, 4]);

        assert_eq!(
            engine.get_tokens_on_group(5, Group::Code),
            Some(vec![vec![2], vec![]])
        );
        assert_eq!(engine.state(), EngineState::Mutated);
    }

    #[rstest]
    fn test_add_to_new_sample_grows(engine: LabelingEngine) {
        let mut engine = engine;
        engine.add_tokens_to_label(9, Group::Code, 2, &[7]);

        assert_eq!(engine.get_num_of_labels_on_sample(9), 3);
        // the sample order only changes on load
        assert_eq!(engine.get_sample_indices(), &[5, 0, 3]);
        assert_eq!(
            engine.dump().unwrap().lines().last(),
            Some(r#"{"idx":9,"match":[[[],[]],[[],[]],[[],[7,7]]]}"#)
        );
    }

    #[rstest]
    fn test_reset_vs_clear(engine: LabelingEngine) {
        let mut engine = engine;
        let loaded = engine.get_labeling_on_sample(0).cloned();

        engine.change_tokens_to_label(0, Group::Code, 3, &[9, 3]);
        assert_eq!(engine.is_modified(0), true);

        engine.reset_sample(0);
        assert_eq!(engine.get_labeling_on_sample(0).cloned(), loaded);
        assert_eq!(engine.is_modified(0), false);

        engine.clear_all_labels_for_sample(0);
        assert_eq!(engine.get_num_of_labels_on_sample(0), 0);
        assert_eq!(engine.get_tokens_on_group(0, Group::Code), Some(vec![]));

        // the snapshot survives a clear
        engine.reset_sample(0);
        assert_eq!(engine.get_labeling_on_sample(0).cloned(), loaded);
    }

    #[rstest]
    fn test_reset_unknown_sample_creates_empty() {
        let mut engine = LabelingEngine::new();
        engine.reset_sample(4);
        assert_eq!(engine.get_tokens_on_group(4, Group::Code), Some(vec![]));

        engine.clear_all_labels_for_sample(8);
        assert_eq!(engine.get_labeling_on_sample(8), None);
    }

    #[rstest]
    fn test_copy_is_independent(engine: LabelingEngine) {
        let mut copied = engine.clone();
        copied.add_tokens_to_label(5, Group::Comment, 0, &[7]);

        assert_eq!(
            engine.get_tokens_on_group_on_label(5, Group::Comment, 0),
            Some(&[0, 1][..])
        );
        assert_eq!(
            copied.get_tokens_on_group_on_label(5, Group::Comment, 0),
            Some(&[0, 1, 7][..])
        );
    }

    #[rstest]
    fn test_save_invokes_callback(engine: LabelingEngine) {
        let saved: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(vec![]));
        let sink = Arc::clone(&saved);
        let mut engine = engine.with_on_save(move |dumped| sink.lock().unwrap().push(dumped.to_string()));

        // the copy keeps the callback
        let mut copied = engine.clone();
        assert_eq!(copied.save().unwrap(), true);
        assert_eq!(engine.save().unwrap(), true);
        assert_eq!(engine.state(), EngineState::Saved);

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(
            saved[0].lines().next(),
            Some(r#"{"idx":5,"match":[[[0,1],[1,2]],[[2,2],[4,4]]]}"#)
        );
    }

    #[rstest]
    fn test_save_without_callback_is_noop(engine: LabelingEngine) {
        let mut engine = engine;
        assert_eq!(engine.save().unwrap(), false);
        assert_eq!(engine.state(), EngineState::Loaded);
    }

    #[rstest]
    fn test_failed_load_leaves_engine_untouched(engine: LabelingEngine) {
        let mut engine = engine;
        let content = "{\"idx\":1,\"match\":[]}\n{\"idx\":\"2\",\"match\":[]}";

        let err = engine.load(content, LinePolicy::Abort).unwrap_err();
        assert_eq!(err.to_string().contains("line 2"), true);
        assert_eq!(engine.get_sample_indices(), &[5, 0, 3]);

        engine.load(content, LinePolicy::SkipInvalid).unwrap();
        assert_eq!(engine.get_sample_indices(), &[1]);
    }

    #[rstest]
    fn test_duplicate_sample_keeps_first_position() {
        let content = "{\"idx\":2,\"match\":[[[0,0]]]}\n{\"idx\":1,\"match\":[]}\n{\"idx\":2,\"match\":[[[4,5]]]}";
        let engine = LabelingEngine::from_content(content, LinePolicy::Abort).unwrap();

        assert_eq!(engine.get_sample_indices(), &[2, 1]);
        assert_eq!(engine.get_tokens_on_group(2, Group::Comment), Some(vec![vec![4, 5]]));
    }

    #[rstest]
    fn test_extra_groups_are_truncated_on_load() {
        let content = r#"{"idx":1,"match":[[[0,0],[1,1],[2,2]]]}"#;
        let engine = LabelingEngine::from_content(content, LinePolicy::Abort).unwrap();

        assert_eq!(engine.get_sample_indices(), &[1]);
        assert_eq!(engine.get_tokens_on_group_on_label(1, Group::Comment, 0), Some(&[0][..]));
        assert_eq!(engine.get_tokens_on_group_on_label(1, Group::Code, 0), Some(&[1][..]));
    }

    #[rstest]
    fn test_label_past_range_is_ignored(mut engine: LabelingEngine) {
        let before = engine.dump().unwrap();
        engine.set_label_of_tokens(5, Group::Code, Some(usize::MAX), &[9]);

        assert_eq!(engine.get_num_of_labels_on_sample(5), 2);
        assert_eq!(engine.dump().unwrap(), before);
    }
}
