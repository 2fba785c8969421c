//! HFB CLI
//!
//! Prints and validates rule profiles, replays scripted scenarios and
//! prints their rulings and statistics as JSON.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use hfb_cli::RulesFormat;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "hfb")]
#[command(about = "Play-state referee tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Print a rule set
    Rules {
        /// Preset name (default, casual, competitive)
        #[arg(long)]
        profile: Option<String>,

        /// Rules file (json, yaml or yml); wins over --profile
        #[arg(long)]
        file: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = RulesFormat::Json)]
        format: RulesFormat,
    },

    /// Check a rules file
    Validate {
        /// Rules file (json, yaml or yml)
        path: PathBuf,
    },

    /// Replay a scenario and print the report as JSON
    Run {
        /// Scenario file (json, yaml or yml)
        scenario: PathBuf,

        /// Rules file replacing the scenario's rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long, default_value = "false")]
        pretty: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rules {
            profile,
            file,
            format,
        } => {
            let config = hfb_cli::resolve_rules(profile.as_deref(), file.as_deref())?;
            println!("{}", hfb_cli::render_rules(&config, format)?);
        }

        Commands::Validate { path } => {
            hfb_cli::validate_rules(&path)?;
            println!("{} is valid", path.display());
        }

        Commands::Run {
            scenario,
            rules,
            out,
            pretty,
        } => {
            let report = hfb_cli::run_scenario(&scenario, rules.as_deref())?;
            let json = hfb_cli::render_report(&report, pretty)?;

            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    tracing::info!("report written to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("hfb CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
