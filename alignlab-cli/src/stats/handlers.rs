use std::io::{self, BufWriter, Write};

use anyhow::Result;
use clap::ArgMatches;

use alignlab_core::models::{Group, SampleIndex};
use alignlab_labeling::LabelingEngine;

use crate::common::{labeling_path, load_config, load_engine, load_policy};

fn count_tokens(engine: &LabelingEngine, sample: SampleIndex, group: Group) -> usize {
    engine
        .get_tokens_on_group(sample, group)
        .map(|labels| labels.iter().map(|tokens| tokens.len()).sum())
        .unwrap_or(0)
}

pub fn run_stats(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let engine = load_engine(&labeling_path(matches, &config), load_policy(matches))?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    writeln!(writer, "idx\tlabels\tcomment_tokens\tcode_tokens")?;
    for sample in engine.get_sample_indices() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            sample,
            engine.get_num_of_labels_on_sample(*sample),
            count_tokens(&engine, *sample, Group::Comment),
            count_tokens(&engine, *sample, Group::Code),
        )?;
    }
    writer.flush()?;

    Ok(())
}
