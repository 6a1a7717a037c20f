mod check;
mod completions;
mod generate;
mod platforms;

use check::CheckCommand;
use clap::{Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use metaforge_codegen::PlatformRegistry;
use platforms::PlatformsCommand;

/// Extension trait for exiting on model errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for metaforge_model::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => {
                eprintln!("{:?}", miette::Report::new(*e));
                std::process::exit(1);
            }
        }
    }
}

/// Every platform compiled into this binary.
pub(crate) fn builtin_platforms() -> PlatformRegistry {
    let mut registry = PlatformRegistry::new();
    registry.register(metaforge_platform_javascript::platform());
    registry
}

#[derive(Parser)]
#[command(name = "metaforge")]
#[command(version)]
#[command(about = "Generate source trees from a platform-independent meta-model")]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn init_tracing(&self) {
        let default = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Platforms(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate code from a model file
    Generate(GenerateCommand),

    /// Validate a model file without generating code
    Check(CheckCommand),

    /// List available target platforms
    Platforms(PlatformsCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
