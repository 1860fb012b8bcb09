use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;

use extricate::config::ExtricateConfig;
use extricate::core::{
    print_error_message, print_info_message, run_extraction, run_unification, BatchSummary,
    ExtricateResult,
};
use extricate::env::{self, EnvVar};
use extricate::parsers::css::StyleComposer;

#[derive(Parser, Debug)]
#[command(
    name = "extricate",
    version,
    about = "Lift inline CSS and JavaScript out of HTML pages"
)]
struct Cli {
    /// Configuration file (default: extricate.toml, .extricate.toml, ~/.config/extricate/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, value_name = "LEVEL", value_parser = parse_level)]
    log_level: Option<Level>,

    /// Suppress per-document progress output
    #[arg(short, long, global = true)]
    silent: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Move inline <style>/<script> bodies into css/ and js/ files
    Extract {
        /// Directory containing the HTML documents
        #[arg(short, long, value_name = "DIR")]
        web_dir: Option<PathBuf>,
    },
    /// Replace each target page's <style> block with the shared style bundle
    Unify {
        /// Directory containing the HTML documents
        #[arg(short, long, value_name = "DIR")]
        web_dir: Option<PathBuf>,

        /// Page identities to unify (default: configured targets)
        targets: Vec<String>,
    },
    /// Write an example configuration file
    InitConfig {
        #[arg(default_value = "extricate.toml")]
        path: PathBuf,
    },
    /// Print the supported environment variables
    EnvDocs,
}

fn parse_level(value: &str) -> Result<Level, String> {
    env::core::LogLevel::parse(value).map_err(|e| e.message)
}

fn init_logging(level: Option<Level>) {
    let level = level.unwrap_or_else(|| env::core::LogLevel::get_or_default(Level::WARN));

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr) && !env::core::NoColor::get_or_default(false))
        .init();
}

fn report(summary: &BatchSummary) -> ExitCode {
    print_info_message(&format!("Done: {summary}"));

    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run(cli: Cli) -> ExtricateResult<ExitCode> {
    match cli.command {
        Command::Extract { web_dir } => {
            let mut config = ExtricateConfig::load(cli.config.as_deref())?;
            if let Some(web_dir) = web_dir {
                config.web_dir = web_dir;
            }

            let summary = run_extraction(&config.options(cli.silent))?;
            Ok(report(&summary))
        }
        Command::Unify { web_dir, targets } => {
            let mut config = ExtricateConfig::load(cli.config.as_deref())?;
            if let Some(web_dir) = web_dir {
                config.web_dir = web_dir;
            }
            if !targets.is_empty() {
                config.unify.targets = targets;
                config.validate()?;
            }

            let composer = StyleComposer::new(config.style_bundle()?);
            let summary = run_unification(
                &config.options(cli.silent),
                &config.unify.targets,
                &composer,
            );
            Ok(report(&summary))
        }
        Command::InitConfig { path } => {
            ExtricateConfig::generate_example_config(&path)?;
            print_info_message(&format!("Wrote {}", path.display()));
            Ok(ExitCode::SUCCESS)
        }
        Command::EnvDocs => {
            print!("{}", env::generate_env_docs());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            print_error_message(&error.to_string());
            ExitCode::FAILURE
        }
    }
}
