use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use vqaprep_cli::RunArgs;

mod commands;

use commands::{cmd_profile, cmd_run};

#[derive(Parser)]
#[command(name = "vqaprep")]
#[command(version, about = "Normalize raw images into a uniform VQA training batch", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Running without a subcommand is the same as `run`
    #[command(flatten)]
    run: RunArgs,

    /// Log stage timings and state transitions
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resize, restore, sharpen and optionally normalize a folder of images
    Run(RunArgs),

    /// Report the target size a batch run would infer
    Profile {
        /// Input folder
        #[arg(short, long, value_name = "DIR")]
        input: Option<PathBuf>,

        /// YAML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Commands::Run(args)) => cmd_run(args),
        Some(Commands::Profile { input, config }) => cmd_profile(input, config),
        None => cmd_run(cli.run),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
