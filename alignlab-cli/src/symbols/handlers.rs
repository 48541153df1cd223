use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;

use alignlab_core::models::{Group, SampleIndex};
use alignlab_refs::to_unique_symbols_with_marker;

use crate::common::{load_config, load_corpus, load_reconcile_config, required};

pub fn run_symbols(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let corpus = load_corpus(&config)?;

    let sample = *required::<SampleIndex>(matches, "sample")?;
    let group = *required::<Group>(matches, "group")?;

    let tokens = corpus
        .tokens(sample, group)
        .with_context(|| format!("Sample {} is not in the corpus", sample))?;
    let marker = load_reconcile_config(matches)?.subword_marker;
    let symbols = to_unique_symbols_with_marker(tokens, group, marker);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    for (index, symbol) in symbols.symbols.iter().enumerate() {
        writeln!(writer, "{}\t{}", index, symbol)?;
    }
    writer.flush()?;

    Ok(())
}
