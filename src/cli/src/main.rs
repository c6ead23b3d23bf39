use std::path::PathBuf;

use animator::{HexpressionsConfig, PuzzleModule};
use clap::{ArgAction, Parser, Subcommand};
use env_logger::TimestampPrecision;
use hexpr_core::{Face, ModuleId, TargetWordJudge};
use interpreter::{Command, Pacing, command::positional_name};
use itertools::Itertools;
use log::{LevelFilter, info};
use owo_colors::OwoColorize;

mod console;
mod repl;

use console::ConsoleTarget;

/// Plays Regular Hexpressions from the terminal
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The configuration file to use, in TOML format. Defaults to
    /// `hexpressions/config.toml` in the user configuration directory.
    #[arg(long, short = 'c', value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a puzzle, reading chat commands from stdin.
    Run,
    /// Print the presses, waits and cancellation points a command runs as.
    Plan {
        /// The command, e.g. "cycle tm tr".
        command: String,
    },
    /// Print every face's rotation cycle and button position.
    Topology,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Run => {
            let module = PuzzleModule::from_config(
                ModuleId(1),
                &config,
                TargetWordJudge::new(config.target_word.clone().unwrap_or_default()),
                ConsoleTarget::default(),
            )?;
            repl::run(&module.into_handle(), &config)?;
        }
        Commands::Plan { command } => {
            let command = Command::parse(&command)?;
            let plan = command.plan(&Pacing::from(&config));
            println!("{}", command.bold());
            for step in plan {
                println!("  {step}");
            }
        }
        Commands::Topology => {
            for face in Face::ALL {
                println!(
                    "{} ({}): {}",
                    face.bold(),
                    positional_name(face),
                    face.rotation_cycle().iter().join(" -> ")
                );
            }
        }
    }

    Ok(())
}

/// An explicitly named file must exist; the default location falls back to
/// built-in defaults when absent.
fn load_config(path: Option<PathBuf>) -> color_eyre::Result<HexpressionsConfig> {
    if let Some(path) = path {
        info!(target: "config", "Loading configuration: path={}", path.display());
        return Ok(HexpressionsConfig::load(&path)?);
    }

    let default_path = dirs::config_dir().map(|dir| dir.join("hexpressions").join("config.toml"));
    match default_path {
        Some(path) if path.is_file() => {
            info!(target: "config", "Loading configuration: path={}", path.display());
            Ok(HexpressionsConfig::load(&path)?)
        }
        _ => {
            info!(target: "config", "Using the default configuration");
            Ok(HexpressionsConfig::default())
        }
    }
}
