use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use cutforge::config::Settings;
use std::path::PathBuf;
use std::process;
use tracing::{error, Level};

mod cmd;
mod tables;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (defaults to ~/.cutforge/settings.json).
    #[arg(global = true, long)]
    settings: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack a cut list into stock bars and write the plan.
    Optimize(cmd::optimize::OptimizeArgs),
    /// Write a reproducible demo cut list.
    Sample(cmd::sample::SampleArgs),
    /// Write an empty cut list with the expected headers.
    Template(cmd::sample::TemplateArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let settings_path = cli.settings.clone().or_else(Settings::default_path);

    let outcome = match &cli.command {
        Commands::Optimize(args) => cmd::optimize::run(
            args,
            matches
                .subcommand_matches("optimize")
                .expect("optimize subcommand matched"),
            settings_path.as_deref(),
        ),
        Commands::Sample(args) => cmd::sample::run(args),
        Commands::Template(args) => cmd::sample::run_template(args),
    };

    match outcome {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    }
}
