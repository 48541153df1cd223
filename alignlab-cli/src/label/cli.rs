use clap::{Arg, ArgAction, Command, arg};

use crate::common::{group_arg, labeling_arg, sample_arg, skip_invalid_arg};

pub const LABEL_CMD: &str = "label";

pub fn create_label_cli() -> Command {
    Command::new(LABEL_CMD)
        .about("Move tokens of a sample to a label, or unlabel them, and save the labeling.")
        .arg(labeling_arg())
        .arg(skip_invalid_arg())
        .arg(sample_arg())
        .arg(group_arg())
        .arg(
            Arg::new("label")
                .long("label")
                .value_parser(clap::value_parser!(usize))
                .required_unless_present("unlabel")
                .conflicts_with("unlabel")
                .help("Target label"),
        )
        .arg(
            Arg::new("unlabel")
                .long("unlabel")
                .action(ArgAction::SetTrue)
                .help("Remove the tokens from every label"),
        )
        .arg(arg!(-t --tokens <TOKENS> "Token indices, e.g. 1,2,5-7").required(true))
        .arg(arg!(-o --output <OUTPUT> "Where to save (default: overwrite the labeling file)").required(false))
}
