//!
//! Argument parsing and loading shared by the subcommands.
//!
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches};
use log::info;

use alignlab_core::models::{Group, SampleIndex, TokenIndex, TokenRanges};
use alignlab_core::utils::read_to_string_dynamic;
use alignlab_core::{AnnotatorConfig, Corpus};
use alignlab_labeling::{LabelingEngine, LoadPolicy};
use alignlab_tokenizers::ReconcileConfig;

pub const CONFIG_ARG: &str = "config";

pub fn labeling_arg() -> Arg {
    Arg::new("labeling")
        .long("labeling")
        .short('l')
        .help("Labeling file (default: taken from the config)")
}

pub fn skip_invalid_arg() -> Arg {
    Arg::new("skip-invalid")
        .long("skip-invalid")
        .action(ArgAction::SetTrue)
        .help("Skip malformed labeling lines instead of failing")
}

pub fn sample_arg() -> Arg {
    Arg::new("sample")
        .long("sample")
        .short('s')
        .required(true)
        .value_parser(clap::value_parser!(SampleIndex))
        .help("Sample index")
}

pub fn group_arg() -> Arg {
    Arg::new("group")
        .long("group")
        .short('g')
        .default_value("code")
        .value_parser(clap::value_parser!(Group))
        .help("Token group: comment (0) or code (1)")
}

pub fn reconcile_arg() -> Arg {
    Arg::new("reconcile")
        .long("reconcile")
        .short('r')
        .help("TOML file with the text matching policies")
}

///
/// The text matching policies given with `--reconcile`, or the defaults.
///
pub fn load_reconcile_config(matches: &ArgMatches) -> Result<ReconcileConfig> {
    match matches.get_one::<String>("reconcile") {
        Some(path) => ReconcileConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to read reconcile config {}", path)),
        None => Ok(ReconcileConfig::default()),
    }
}

///
/// The annotator config given with `--config`, or the defaults.
///
pub fn load_config(matches: &ArgMatches) -> Result<AnnotatorConfig> {
    match matches.get_one::<String>(CONFIG_ARG) {
        Some(path) => AnnotatorConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to read config {}", path)),
        None => Ok(AnnotatorConfig::default()),
    }
}

pub fn labeling_path(matches: &ArgMatches, config: &AnnotatorConfig) -> PathBuf {
    matches
        .get_one::<String>("labeling")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.labeling_path())
}

pub fn load_policy(matches: &ArgMatches) -> LoadPolicy {
    match matches.get_flag("skip-invalid") {
        true => LoadPolicy::SkipInvalid,
        false => LoadPolicy::Abort,
    }
}

pub fn load_engine(path: &Path, policy: LoadPolicy) -> Result<LabelingEngine> {
    let content = read_to_string_dynamic(path)?;
    let engine = LabelingEngine::from_content(&content, policy)
        .with_context(|| format!("Failed to load labeling {:?}", path))?;
    info!("Loaded {} samples from {:?}", engine.get_sample_indices().len(), path);
    Ok(engine)
}

pub fn load_corpus(config: &AnnotatorConfig) -> Result<Corpus> {
    Corpus::from_config(config).context("Failed to load the corpus files")
}

pub fn required<'a, T: Clone + Send + Sync + 'static>(matches: &'a ArgMatches, id: &str) -> Result<&'a T> {
    matches
        .get_one::<T>(id)
        .with_context(|| format!("--{} is required", id))
}

///
/// Parse a token list like `1,2,5-7` into indices.
///
pub fn parse_token_list(value: &str) -> Result<Vec<TokenIndex>> {
    let mut indices = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start: TokenIndex = start.trim().parse().with_context(|| format!("Invalid token range {}", part))?;
                let end: TokenIndex = end.trim().parse().with_context(|| format!("Invalid token range {}", part))?;
                indices.extend(TokenRanges::new(vec![start, end]).expand());
            }
            None => indices.push(part.parse().with_context(|| format!("Invalid token index {}", part))?),
        }
    }
    Ok(indices)
}
