//!
//! Persisted annotator configuration: where the corpus files live, the label
//! colour palette and the feature toggles of the annotation front-end.
//!
//! The core only reads the file locations. Every other value is handed through
//! untouched to whoever renders the corpus. Changes go through generated
//! setters which notify every registered observer with the changed field.
//!
use std::fmt;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

pub const DEFAULT_LABEL_COLORS: [&str; 12] = [
    "green", "red", "yellow", "orange", "cyan", "lime", "pink", "gray", "grape", "violet",
    "indigo", "teal",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorSettings {
    pub tokens_directory: PathBuf,
    pub outline_tokens: bool,
    pub show_teacher_samples: bool,
    pub label_colors: Vec<String>,

    pub complete_code_tokens_file: String,
    pub complete_comment_tokens_file: String,
    pub full_text_file: String,
    pub labeling_file: String,
    pub teacher_file: String,
    pub highlight_file: String,

    pub use_advanced_features: bool,
    pub show_external_labeling: bool,
    pub show_external_labeling_score: bool,
    pub show_external_labeling_score_in_percentage: bool,
}

impl Default for AnnotatorSettings {
    fn default() -> Self {
        AnnotatorSettings {
            tokens_directory: PathBuf::from("/demo"),
            outline_tokens: true,
            show_teacher_samples: false,
            label_colors: vec![],
            complete_code_tokens_file: "tokenized_code_tokens_train.jsonl".to_string(),
            complete_comment_tokens_file: "tokenized_comment_tokens_train.jsonl".to_string(),
            full_text_file: "train.jsonl".to_string(),
            labeling_file: "sorted_labelling_sample_api.jsonl".to_string(),
            teacher_file: "student_teachers_pairs.jsonl".to_string(),
            highlight_file: "auto_highlight.jsonl".to_string(),
            use_advanced_features: false,
            show_external_labeling: false,
            show_external_labeling_score: true,
            show_external_labeling_score_in_percentage: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigField {
    TokensDirectory,
    OutlineTokens,
    ShowTeacherSamples,
    LabelColors,
    CompleteCodeTokensFile,
    CompleteCommentTokensFile,
    FullTextFile,
    LabelingFile,
    TeacherFile,
    HighlightFile,
    UseAdvancedFeatures,
    ShowExternalLabeling,
    ShowExternalLabelingScore,
    ShowExternalLabelingScoreInPercentage,
}

impl ConfigField {
    ///
    /// Stable key the field is persisted under.
    ///
    pub fn key(self) -> &'static str {
        match self {
            ConfigField::TokensDirectory => "tokens-directory",
            ConfigField::OutlineTokens => "outline-tokens",
            ConfigField::ShowTeacherSamples => "show-teacher-samples",
            ConfigField::LabelColors => "label-colors",
            ConfigField::CompleteCodeTokensFile => "complete-code-tokens-file",
            ConfigField::CompleteCommentTokensFile => "complete-comment-tokens-file",
            ConfigField::FullTextFile => "train-data-file",
            ConfigField::LabelingFile => "labeling-file",
            ConfigField::TeacherFile => "teacher-file",
            ConfigField::HighlightFile => "highlighted-code-file",
            ConfigField::UseAdvancedFeatures => "use-advanced-features",
            ConfigField::ShowExternalLabeling => "show-external-labeling",
            ConfigField::ShowExternalLabelingScore => "show-external-labeling-score",
            ConfigField::ShowExternalLabelingScoreInPercentage => {
                "show-external-labeling-score-in-percentage"
            }
        }
    }
}

pub type ConfigObserver = Box<dyn Fn(ConfigField, &AnnotatorSettings) + Send + Sync>;

#[derive(Default)]
pub struct AnnotatorConfig {
    settings: AnnotatorSettings,
    observers: Vec<ConfigObserver>,
}

macro_rules! config_setters {
    ($($setter:ident => $field:ident: $ty:ty, $variant:ident;)*) => {
        impl AnnotatorConfig {
            $(
                pub fn $setter(&mut self, value: $ty) {
                    self.settings.$field = value;
                    self.notify(ConfigField::$variant);
                }
            )*
        }
    };
}

config_setters! {
    set_tokens_directory => tokens_directory: PathBuf, TokensDirectory;
    set_outline_tokens => outline_tokens: bool, OutlineTokens;
    set_show_teacher_samples => show_teacher_samples: bool, ShowTeacherSamples;
    set_label_colors => label_colors: Vec<String>, LabelColors;
    set_complete_code_tokens_file => complete_code_tokens_file: String, CompleteCodeTokensFile;
    set_complete_comment_tokens_file => complete_comment_tokens_file: String, CompleteCommentTokensFile;
    set_full_text_file => full_text_file: String, FullTextFile;
    set_labeling_file => labeling_file: String, LabelingFile;
    set_teacher_file => teacher_file: String, TeacherFile;
    set_highlight_file => highlight_file: String, HighlightFile;
    set_use_advanced_features => use_advanced_features: bool, UseAdvancedFeatures;
    set_show_external_labeling => show_external_labeling: bool, ShowExternalLabeling;
    set_show_external_labeling_score => show_external_labeling_score: bool, ShowExternalLabelingScore;
    set_show_external_labeling_score_in_percentage => show_external_labeling_score_in_percentage: bool, ShowExternalLabelingScoreInPercentage;
}

impl AnnotatorConfig {
    pub fn new(settings: AnnotatorSettings) -> Self {
        Self {
            settings,
            observers: vec![],
        }
    }

    pub fn settings(&self) -> &AnnotatorSettings {
        &self.settings
    }

    ///
    /// Register a callback fired after every setter call.
    ///
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(ConfigField, &AnnotatorSettings) + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn notify(&self, field: ConfigField) {
        for observer in self.observers.iter() {
            observer(field, &self.settings);
        }
    }

    ///
    /// The label palette, falling back to the default colour names when none
    /// has been configured.
    ///
    pub fn label_colors(&self) -> Vec<String> {
        if self.settings.label_colors.is_empty() {
            return DEFAULT_LABEL_COLORS.iter().map(|c| c.to_string()).collect();
        }
        self.settings.label_colors.clone()
    }

    pub fn labeling_path(&self) -> PathBuf {
        self.settings.tokens_directory.join(&self.settings.labeling_file)
    }

    pub fn full_text_path(&self) -> PathBuf {
        self.settings.tokens_directory.join(&self.settings.full_text_file)
    }

    pub fn code_tokens_path(&self) -> PathBuf {
        self.settings
            .tokens_directory
            .join(&self.settings.complete_code_tokens_file)
    }

    pub fn comment_tokens_path(&self) -> PathBuf {
        self.settings
            .tokens_directory
            .join(&self.settings.complete_comment_tokens_file)
    }

    pub fn teacher_path(&self) -> PathBuf {
        self.settings.tokens_directory.join(&self.settings.teacher_file)
    }

    pub fn highlight_path(&self) -> PathBuf {
        self.settings.tokens_directory.join(&self.settings.highlight_file)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(&self.settings)
    }
}

impl fmt::Debug for AnnotatorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotatorConfig")
            .field("settings", &self.settings)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TryFrom<&Path> for AnnotatorConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let settings: AnnotatorSettings = toml::from_str(&toml_str)?;
        Ok(AnnotatorConfig::new(settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::sync::{Arc, Mutex};

    #[rstest]
    fn test_defaults() {
        let config = AnnotatorConfig::default();
        assert_eq!(config.settings().outline_tokens, true);
        assert_eq!(config.label_colors().len(), 12);
        assert_eq!(
            config.labeling_path(),
            PathBuf::from("/demo/sorted_labelling_sample_api.jsonl")
        );
    }

    #[rstest]
    fn test_setters_notify_observers() {
        let seen: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(vec![]));
        let mut config = AnnotatorConfig::default();

        let sink = Arc::clone(&seen);
        config.subscribe(move |field, settings| {
            sink.lock().unwrap().push(field.key());
            if field == ConfigField::LabelingFile {
                assert_eq!(settings.labeling_file, "mine.jsonl");
            }
        });

        config.set_labeling_file("mine.jsonl".to_string());
        config.set_show_external_labeling(true);

        assert_eq!(*seen.lock().unwrap(), vec!["labeling-file", "show-external-labeling"]);
        assert_eq!(config.settings().show_external_labeling, true);
    }

    #[rstest]
    fn test_custom_palette_is_kept() {
        let mut config = AnnotatorConfig::default();
        config.set_label_colors(vec!["#ff0000".to_string()]);
        assert_eq!(config.label_colors(), vec!["#ff0000".to_string()]);
    }

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/alignlab.toml");
        let config = AnnotatorConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.settings().labeling_file, "labeling.jsonl");
        // unset keys keep their defaults
        assert_eq!(config.settings().highlight_file, "auto_highlight.jsonl");
    }

    #[rstest]
    fn test_toml_roundtrip() {
        let mut config = AnnotatorConfig::default();
        config.set_tokens_directory(PathBuf::from("/data/run1"));

        let dumped = config.to_toml().unwrap();
        let settings: AnnotatorSettings = toml::from_str(&dumped).unwrap();
        assert_eq!(&settings, config.settings());
    }
}
