use clap::{Command, arg};

use crate::common::{labeling_arg, skip_invalid_arg};

pub const NORMALIZE_CMD: &str = "normalize";

pub fn create_normalize_cli() -> Command {
    Command::new(NORMALIZE_CMD)
        .about("Rewrite a labeling file in compact range form.")
        .arg(labeling_arg())
        .arg(skip_invalid_arg())
        .arg(arg!(-o --output <OUTPUT> "Output file, gzipped when it ends in .gz (default: stdout)").required(false))
}
