use clap::Command;

use crate::common::{labeling_arg, skip_invalid_arg};

pub const STATS_CMD: &str = "stats";

pub fn create_stats_cli() -> Command {
    Command::new(STATS_CMD)
        .about("Print label and token counts of every sample in a labeling file.")
        .arg(labeling_arg())
        .arg(skip_invalid_arg())
}
