use clap::Command;

use crate::common::{group_arg, reconcile_arg, sample_arg};

pub const SYMBOLS_CMD: &str = "symbols";

pub fn create_symbols_cli() -> Command {
    Command::new(SYMBOLS_CMD)
        .about("Print the unique symbols of one token line, as sent to an aligner.")
        .arg(sample_arg())
        .arg(group_arg())
        .arg(reconcile_arg())
}
