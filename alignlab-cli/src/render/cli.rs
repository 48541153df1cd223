use clap::{Arg, ArgAction, Command};

use crate::common::{group_arg, labeling_arg, reconcile_arg, sample_arg, skip_invalid_arg};

pub const RENDER_CMD: &str = "render";

pub fn create_render_cli() -> Command {
    Command::new(RENDER_CMD)
        .about("Match the tokens of one sample against its text and print the spans with their labels.")
        .arg(labeling_arg())
        .arg(skip_invalid_arg())
        .arg(sample_arg())
        .arg(group_arg())
        .arg(reconcile_arg())
        .arg(
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Also print the text between tokens"),
        )
}
