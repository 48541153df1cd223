use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;
use log::info;

use alignlab_core::models::{Group, SampleIndex};
use alignlab_core::utils::write_dynamic;

use crate::common::{labeling_path, load_config, load_engine, load_policy, parse_token_list, required};

pub fn run_label(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let path = labeling_path(matches, &config);
    let mut engine = load_engine(&path, load_policy(matches))?;

    let sample = *required::<SampleIndex>(matches, "sample")?;
    let group = *required::<Group>(matches, "group")?;
    let tokens = parse_token_list(required::<String>(matches, "tokens")?)?;
    let label = match matches.get_flag("unlabel") {
        true => None,
        false => Some(*required::<usize>(matches, "label")?),
    };

    engine.set_label_of_tokens(sample, group, label, &tokens);
    info!(
        "Sample {} {}: {} tokens -> {}",
        sample,
        group,
        tokens.len(),
        label.map(|l| l.to_string()).unwrap_or_else(|| "unlabeled".to_string())
    );

    let output = matches
        .get_one::<String>("output")
        .map(PathBuf::from)
        .unwrap_or(path);
    write_dynamic(&output, &format!("{}\n", engine.dump()?))?;

    Ok(())
}
