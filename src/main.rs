use std::process::ExitCode;

use clap::Parser;
use learnrec::{
    cli::{AppContext, Cli, Commands},
    core::error::RecommendError,
    infra::{config::load_config_from, logging},
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    if let Err(e) = logging::init(cli.verbose, cli.quiet, cli.no_color) {
        eprintln!("warning: {e}");
    }

    match run(cli, &ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e
                .downcast_ref::<RecommendError>()
                .map_or(1, RecommendError::exit_code);
            ExitCode::from(code as u8)
        }
    }
}

fn run(cli: Cli, ctx: &AppContext) -> anyhow::Result<()> {
    match cli.command {
        Commands::Recommend(args) => {
            let cfg = load_config_from(cli.config.as_deref())?;
            learnrec::cli_ext::recommend_cmd::run(args, &cfg, ctx)
        }
        Commands::Init(args) => learnrec::infra::config::init(args, ctx),
        Commands::Completions(args) => learnrec::completion::run(args, ctx),
    }
}
