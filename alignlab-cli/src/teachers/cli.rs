use clap::{Command, arg};

use crate::common::sample_arg;

pub const TEACHERS_CMD: &str = "teachers";

pub fn create_teachers_cli() -> Command {
    Command::new(TEACHERS_CMD)
        .about("List the teacher samples of a sample.")
        .arg(sample_arg())
        .arg(arg!(--teachers <TEACHERS> "Teacher file (default: taken from the config)").required(false))
}
