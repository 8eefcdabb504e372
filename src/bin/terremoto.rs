//! Terremoto - shake-table colonnade runner
//!
//! Run with: `cargo run --bin terremoto -- run --excitation sine -v`
//!
//! # Commands
//!
//! - `run`: Build the colonnade, shake it and write the logs
//! - `layout`: Print a layout plan as JSON
//! - `config`: Print the default configuration as JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use terremoto_engine::colonnade::{ExcitationSource, LayoutVariant, Session, SimulationConfig};
use terremoto_engine::physics::KinematicWorld;

/// Seismic colonnade on a shake table
#[derive(Parser)]
#[command(name = "terremoto")]
#[command(version)]
#[command(about = "Builds a masonry colonnade, shakes it and logs its motion on the table")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a session on the headless kinematic world
    Run {
        /// JSON configuration file; defaults apply to missing fields
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
        #[arg(long, value_enum)]
        excitation: Option<ExcitationArg>,
        /// Directory receiving the log files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Simulated time at which the run ends (seconds)
        #[arg(long)]
        end_time: Option<f64>,
    },
    /// Print the solids of a layout as JSON
    Layout {
        #[arg(long, value_enum, default_value = "simple")]
        layout: LayoutArg,
    },
    /// Print the default configuration as JSON
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Simple,
    Extended,
}

impl From<LayoutArg> for LayoutVariant {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Simple => LayoutVariant::Simple,
            LayoutArg::Extended => LayoutVariant::Extended,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExcitationArg {
    WithBarrier,
    WithoutBarrier,
    Sine,
}

impl From<ExcitationArg> for ExcitationSource {
    fn from(arg: ExcitationArg) -> Self {
        match arg {
            ExcitationArg::WithBarrier => ExcitationSource::WithBarrier,
            ExcitationArg::WithoutBarrier => ExcitationSource::WithoutBarrier,
            ExcitationArg::Sine => ExcitationSource::Sine,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            layout,
            excitation,
            output_dir,
            end_time,
        } => {
            let mut config = match config {
                Some(path) => SimulationConfig::from_path(&path)?,
                None => SimulationConfig::default(),
            };
            if let Some(layout) = layout {
                config.layout = layout.into();
            }
            if let Some(excitation) = excitation {
                config.excitation.source = excitation.into();
            }
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            if let Some(end_time) = end_time {
                config.end_time = end_time;
            }
            run(config)
        }
        Commands::Layout { layout } => {
            let plan = LayoutVariant::from(layout).build()?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&SimulationConfig::default())?);
            Ok(())
        }
    }
}

fn run(config: SimulationConfig) -> Result<()> {
    let output_dir = config.output_dir.clone();
    let mut session =
        Session::setup(KinematicWorld::new(), config).context("session setup failed")?;
    let summary = session.run_until(|_| false).context("session aborted")?;

    info!(output = %output_dir.display(), "logs written");
    println!(
        "{} steps, t = {:.3} s, {} relative rows, {} excitation rows -> {}",
        summary.steps,
        summary.final_time,
        summary.records_written,
        summary.excitation_rows,
        output_dir.display()
    );
    Ok(())
}
