//! bitskip-viz: terminal dashboard for the BitSkip paper results
//!
//! # Usage
//!
//! ```bash
//! # Interactive dashboard
//! bitskip-viz
//!
//! # Start on the early-exit view
//! bitskip-viz --tab earlyexit
//!
//! # Print one frame without a terminal
//! bitskip-viz --snapshot --tab intrinsic --width 140 --height 50
//!
//! # Dump the embedded dataset
//! bitskip-viz --dump-json > bitskip.json
//! ```
//!
//! Keys: `1`/`2`/`3` select a view, `Tab`/`Shift+Tab` cycle, `q` quits.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use bitskip_viz::app::{App, Tab};
use bitskip_viz::dataset::DatasetExport;
use bitskip_viz::tui::{self, TuiConfig};
use bitskip_viz::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "bitskip-viz")]
#[command(about = "Terminal dashboard for the BitSkip quantization and early-exit results")]
#[command(version)]
struct Args {
    /// View shown on start
    #[arg(short, long, value_enum, default_value_t = Tab::Overview)]
    tab: Tab,

    /// Event poll interval in milliseconds
    #[arg(long, default_value = "250")]
    tick_ms: u64,

    /// Render a single frame to stdout and exit
    #[arg(long, conflicts_with = "dump_json")]
    snapshot: bool,

    /// Snapshot width in columns
    #[arg(long, default_value = "120")]
    width: u16,

    /// Snapshot height in rows
    #[arg(long, default_value = "48")]
    height: u16,

    /// Print the embedded dataset as JSON and exit
    #[arg(long)]
    dump_json: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn tui_config(&self) -> TuiConfig {
        TuiConfig {
            tick_rate_ms: self.tick_ms,
            initial_tab: self.tab,
            width: self.width,
            height: self.height,
        }
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .init();
        },
        None => {
            registry
                .with(fmt::layer().with_writer(io::stderr).with_target(false))
                .init();
        },
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    init_logging(args.log_file.as_deref())?;
    let config = args.tui_config();
    debug!(?config, "parsed configuration");

    if args.dump_json {
        let json = DatasetExport::collect().to_json()?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{json}")?;
        return Ok(());
    }

    if args.snapshot {
        let frame = tui::render_to_string(&App::new(config.initial_tab), config.width, config.height)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(frame.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    tui::run(&config)
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            err.exit_code()
        },
    }
}
