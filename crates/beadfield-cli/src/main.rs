use anyhow::Context;
use beadfield::LayoutConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod driver;
mod scene;

use driver::RunOptions;
use scene::Scene;

/// Headless beadfield driver.
#[derive(Parser, Debug)]
#[command(name = "beadfield")]
#[command(about = "Run a force-directed bead layout headlessly and print positions as JSON")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate a JSON5 scene file and print the resulting layout.
    Simulate {
        scene: PathBuf,

        /// Upper bound on ticks.
        #[arg(long, default_value_t = 2000)]
        max_ticks: usize,

        /// Keep ticking after the layout has settled.
        #[arg(long)]
        no_settle: bool,

        /// Include every frame's positions in the output.
        #[arg(long)]
        trace: bool,

        /// Write the JSON here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },
    /// Print the default layout config.
    Config,
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn")
            .add_directive(format!("beadfield={level}").parse()?)
            .add_directive(format!("beadfield_cli={level}").parse()?),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    match args.command {
        Command::Simulate {
            scene,
            max_ticks,
            no_settle,
            trace,
            out,
            pretty,
        } => {
            let scene = Scene::load(&scene)?;
            let report = driver::run(
                &scene,
                RunOptions {
                    max_ticks,
                    stop_when_settled: !no_settle,
                    trace,
                },
            )?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            match out {
                Some(path) => std::fs::write(&path, json + "\n")
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&LayoutConfig::default())?);
        }
    }

    Ok(())
}
