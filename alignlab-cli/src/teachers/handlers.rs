use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;

use alignlab_core::AnnotatorConfig;
use alignlab_core::models::SampleIndex;
use alignlab_core::utils::read_to_string_dynamic;
use alignlab_refs::TeachersRelationshipProvider;

use crate::common::{load_config, required};

pub fn load_teachers(matches: &ArgMatches, config: &AnnotatorConfig) -> Result<TeachersRelationshipProvider> {
    let path = matches
        .get_one::<String>("teachers")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.teacher_path());
    let content = read_to_string_dynamic(&path)?;
    content
        .parse::<TeachersRelationshipProvider>()
        .with_context(|| format!("Failed to load teachers from {:?}", path))
}

pub fn run_teachers(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let teachers = load_teachers(matches, &config)?;
    let sample = *required::<SampleIndex>(matches, "sample")?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    for teacher in teachers.get_teachers(sample).unwrap_or_default() {
        writeln!(
            writer,
            "{}\t{}",
            teacher.teacher_idx,
            serde_json::to_string(&teacher.extra)?
        )?;
    }
    writer.flush()?;

    Ok(())
}
