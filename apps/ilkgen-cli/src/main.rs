//! ilkgen: generates ILK kinematics solvers for URDF robots.
//!
//! Provides two subcommands:
//! - `generate`: Build the solvers of a query and write one file per solver
//! - `info`: Print workspace crate versions and the default configuration

mod config;
mod error;
mod generate;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::config::GeneratorConfig;
use crate::error::CliError;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Kinematics solver generator.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the solvers of a query.
    Generate {
        /// URDF description of the robot.
        #[arg(short, long)]
        robot: PathBuf,

        /// YAML query. Without it, the pose of the last link relative to the
        /// base is generated.
        #[arg(short, long)]
        query: Option<PathBuf>,

        /// Output directory, overriding the configuration.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// TOML generator configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn run_generate(
    robot: &Path,
    query: Option<&Path>,
    output_dir: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<(), CliError> {
    let mut settings = match config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(dir) = output_dir {
        settings.output_dir = dir;
    }
    settings.validate()?;

    let written = generate::generate(robot, query, &settings)?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}

fn run_info() {
    let config = GeneratorConfig::default();
    println!("ilkgen v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  ilkgen-robot  {}", env!("CARGO_PKG_VERSION"));
    println!("  ilkgen-solver {}", env!("CARGO_PKG_VERSION"));
    println!("  ilkgen-emit   {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("defaults:");
    println!("  output_dir = {}", config.output_dir.display());
    println!("  extension  = {}", config.extension);
    println!();
    println!("edition: 2024");
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Generate {
            robot,
            query,
            output_dir,
            config,
        }) => run_generate(
            &robot,
            query.as_deref(),
            output_dir,
            config.as_deref(),
        ),
        Some(Commands::Info) | None => {
            run_info();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
