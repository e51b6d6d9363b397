mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use roam2md_core::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "roam2md",
    version,
    about = "Convert an org-roam knowledge base into linked markdown notes"
)]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/roam2md/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run with debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Path to the actual org-roam directory, as recorded in the database
    #[arg(long, global = true, value_name = "PATH")]
    roam_root: Option<PathBuf>,

    /// org-roam database file
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    /// Local copy of the org-roam directory tree
    #[arg(long, global = true, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Directory to write markdown notes into
    #[arg(long, global = true, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Converter program to run instead of pandoc
    #[arg(long, global = true, value_name = "PROGRAM")]
    pandoc: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert every note (the default when no command is given)
    Convert(ConvertArgs),

    /// Validate configuration and print resolved paths
    Doctor,
}

#[derive(Debug, Args, Default)]
pub struct ConvertArgs {
    /// Exit with status 2 if any note failed to convert
    #[arg(long)]
    pub strict: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

fn main() {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        debug: cli.debug,
        roam_root: cli.roam_root,
        database: cli.database,
        input_dir: cli.input,
        output_dir: cli.output,
        program: cli.pandoc,
    };

    match cli.command.unwrap_or(Commands::Convert(ConvertArgs::default())) {
        Commands::Convert(args) => {
            cmd::convert::run(cli.config.as_deref(), &overrides, &args)
        }
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref(), &overrides),
    }
}
