mod config;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fxcalc::{AngleMode, Evaluation, Key, Session, calculate, normalize};

#[derive(Parser)]
#[command(name = "fxcalc", version, about = "Scientific calculator core")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true, env = "FXCALC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize and evaluate an expression
    Eval {
        /// Expression as typed, e.g. "2^10" or "sin(90)"
        expr: String,

        /// Angle mode for trigonometric functions (degrees, radians)
        #[arg(short, long)]
        mode: Option<AngleMode>,
    },

    /// Print the canonical form of an expression
    Normalize {
        expr: String,
    },

    /// Feed key labels into a fresh session, printing the display after each
    Keys {
        /// Key labels such as 7, +, =, M+, DEG/RAD (read from stdin if empty)
        labels: Vec<String>,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Eval { expr, mode } => {
            let mode = mode.unwrap_or(config.session.angle_mode);
            let result = calculate(&expr, mode);
            println!("{result}");
            if matches!(result, Evaluation::Error) {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Normalize { expr } => {
            println!("{}", normalize(&expr));
        }

        Commands::Keys { labels } => {
            let mut session = Session::with_config(&config.session);
            let stdout = io::stdout();
            let mut out = stdout.lock();

            if labels.is_empty() {
                for line in io::stdin().lock().lines() {
                    let line = line?;
                    let label = line.trim();
                    if label.is_empty() {
                        continue;
                    }
                    session.press(&Key::from(label));
                    writeln!(out, "{}", session.display())?;
                }
            } else {
                for label in &labels {
                    session.press(&Key::from(label.as_str()));
                    writeln!(out, "{}", session.display())?;
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
