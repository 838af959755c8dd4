//! docqa - Generate question-answer datasets from markdown documentation.

use clap::Parser;
use docqa_cli::commands;
use docqa_cli::logger::{init_logger, should_use_colors};
use docqa_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> docqa_cli::Result<()> {
    let cli = Cli::parse();

    let color_enabled = should_use_colors(cli.no_color);
    init_logger(cli.verbose, cli.quiet, !color_enabled);

    let config = Config::load(cli.config.as_deref())?;
    let formatter = Formatter::new(color_enabled);

    match cli.command {
        Command::Generate(args) => commands::execute_generate(args, config, &formatter).await?,
        Command::Split(args) => commands::execute_split(args, &config, &formatter).await?,
        Command::Convert(args) => commands::execute_convert(args, &config, &formatter).await?,
    }

    Ok(())
}
