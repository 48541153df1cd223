mod common;
mod label;
mod normalize;
mod render;
mod stats;
mod suggest;
mod symbols;
mod teachers;

use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use env_logger::Env;

use crate::common::CONFIG_ARG;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "alignlab";
    pub const BIN_NAME: &str = "alignlab";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Tools for annotating which comment tokens describe which code tokens.")
        .subcommand_required(true)
        .arg(
            Arg::new(CONFIG_ARG)
                .long("config")
                .short('c')
                .global(true)
                .help("Annotator config (TOML)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("More log output, repeat for debug"),
        )
        .subcommand(stats::cli::create_stats_cli())
        .subcommand(normalize::cli::create_normalize_cli())
        .subcommand(label::cli::create_label_cli())
        .subcommand(render::cli::create_render_cli())
        .subcommand(symbols::cli::create_symbols_cli())
        .subcommand(teachers::cli::create_teachers_cli())
        .subcommand(suggest::cli::create_suggest_cli())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(level));
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        //
        // STATS
        //
        Some((stats::cli::STATS_CMD, matches)) => {
            stats::handlers::run_stats(matches)?;
        }

        //
        // NORMALIZE
        //
        Some((normalize::cli::NORMALIZE_CMD, matches)) => {
            normalize::handlers::run_normalize(matches)?;
        }

        //
        // LABEL
        //
        Some((label::cli::LABEL_CMD, matches)) => {
            label::handlers::run_label(matches)?;
        }

        //
        // RENDER
        //
        Some((render::cli::RENDER_CMD, matches)) => {
            render::handlers::run_render(matches)?;
        }

        //
        // SYMBOLS
        //
        Some((symbols::cli::SYMBOLS_CMD, matches)) => {
            symbols::handlers::run_symbols(matches)?;
        }

        //
        // TEACHERS
        //
        Some((teachers::cli::TEACHERS_CMD, matches)) => {
            teachers::handlers::run_teachers(matches)?;
        }

        //
        // SUGGEST
        //
        Some((suggest::cli::SUGGEST_CMD, matches)) => {
            suggest::handlers::run_suggest(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
