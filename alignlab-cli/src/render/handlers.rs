use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::warn;

use alignlab_core::models::{Group, SampleIndex};
use alignlab_tokenizers::Reconciler;

use crate::common::{
    labeling_path, load_config, load_corpus, load_engine, load_policy, load_reconcile_config, required,
};

pub fn run_render(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let corpus = load_corpus(&config)?;

    let sample = *required::<SampleIndex>(matches, "sample")?;
    let group = *required::<Group>(matches, "group")?;

    let reconciler = Reconciler::new(load_reconcile_config(matches)?)?;

    let path = labeling_path(matches, &config);
    let labels = match path.exists() {
        true => load_engine(&path, load_policy(matches))?
            .get_tokens_on_group(sample, group)
            .unwrap_or_default(),
        false => {
            warn!("No labeling file at {:?}, rendering without labels", path);
            vec![]
        }
    };

    let reconciliation = reconciler
        .reconcile_sample(&corpus, sample, group)
        .with_context(|| format!("Sample {} is not in the corpus", sample))?;
    if !reconciliation.dropped.is_empty() {
        warn!(
            "{} tokens could not be matched against the text: {:?}",
            reconciliation.dropped.len(),
            reconciliation.dropped
        );
    }

    let show_all = matches.get_flag("all");
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    for span in reconciliation.annotate(&labels, &[]) {
        let label = span.label.map(|l| l.to_string()).unwrap_or_else(|| "-".to_string());
        match span.token {
            Some(token) => writeln!(writer, "{}\t{}\t{:?}", token, label, span.text)?,
            None if show_all => writeln!(writer, "\t\t{:?}", span.text)?,
            None => {}
        }
    }
    writer.flush()?;

    Ok(())
}
