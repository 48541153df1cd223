use clap::{Arg, ArgAction, Command, arg};

use crate::common::{labeling_arg, reconcile_arg, sample_arg, skip_invalid_arg};

pub const SUGGEST_CMD: &str = "suggest";

pub fn create_suggest_cli() -> Command {
    Command::new(SUGGEST_CMD)
        .about("Build the alignment prompt of a sample, replay a recorded model answer and print the labeling it maps to.")
        .arg(labeling_arg())
        .arg(skip_invalid_arg())
        .arg(sample_arg())
        .arg(reconcile_arg())
        .arg(arg!(--response <RESPONSE> "Recorded model answer").required(true))
        .arg(arg!(--teachers <TEACHERS> "Teacher file (default: taken from the config)").required(false))
        .arg(
            Arg::new("chunk-size")
                .long("chunk-size")
                .default_value("64")
                .value_parser(clap::value_parser!(usize))
                .help("Characters per replayed chunk"),
        )
        .arg(
            Arg::new("no-teacher")
                .long("no-teacher")
                .action(ArgAction::SetTrue)
                .help("Do not prime the prompt with a teacher example"),
        )
        .arg(
            Arg::new("print-prompt")
                .long("print-prompt")
                .action(ArgAction::SetTrue)
                .help("Print the prompt before the result"),
        )
        .arg(
            Arg::new("apply")
                .long("apply")
                .action(ArgAction::SetTrue)
                .help("Replace the sample's labeling with the suggestion and save it"),
        )
}
