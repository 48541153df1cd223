use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use clap::ArgMatches;

use alignlab_core::utils::write_dynamic;

use crate::common::{labeling_path, load_config, load_engine, load_policy};

///
/// Write text to a file, or to stdout when no file is given.
///
pub fn write_output(output: Option<&String>, content: &str) -> Result<()> {
    match output {
        Some(path) => write_dynamic(Path::new(path), &format!("{}\n", content)),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", content)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

pub fn run_normalize(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let engine = load_engine(&labeling_path(matches, &config), load_policy(matches))?;

    write_output(matches.get_one::<String>("output"), &engine.dump()?)
}
