mod dash;
mod opener;

use anyhow::{Context, Result};
use clap::Parser;
use dash::App;
use piponger_client::{HttpStatusApi, Poller};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "piponger-dash",
    version,
    about = "Live status dashboard for a piponger master, pinger or ponger"
)]
struct Cli {
    /// Node API address, as host:port or a full http(s) URL.
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: String,

    #[arg(long, default_value_t = 2500)]
    poll_ms: u64,

    #[arg(long, default_value_t = 500)]
    loading_floor_ms: u64,

    /// Print one frame per snapshot instead of the full-screen dashboard.
    #[arg(long)]
    plain: bool,

    /// Fetch a single snapshot, print it and exit.
    #[arg(long)]
    once: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Interactive,
    Plain,
    Once,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.once {
            Mode::Once
        } else if self.plain {
            Mode::Plain
        } else if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
            Mode::Once
        } else {
            Mode::Interactive
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mode = cli.mode();
    init_logging(mode, cli.log_file.as_ref())?;

    let api = HttpStatusApi::new(&cli.addr)?;
    let poller = Poller::new(
        Duration::from_millis(cli.poll_ms.max(1)),
        Duration::from_millis(cli.loading_floor_ms),
    );
    info!(server = %api.base_url(), ?mode, "starting dashboard");
    let app = App::new(api, poller);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async move {
        match mode {
            Mode::Interactive => dash::run_interactive(app).await,
            Mode::Plain => dash::run_plain(app).await,
            Mode::Once => dash::run_once(app).await,
        }
    })
}

fn init_logging(mode: Mode, log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        let _ = builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    } else if mode == Mode::Interactive {
        let _ = builder.with_writer(io::sink).try_init();
    } else {
        let _ = builder.with_writer(io::stderr).try_init();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_node_api() {
        let cli = Cli::parse_from(["piponger-dash"]);
        assert_eq!(cli.addr, "127.0.0.1:5000");
        assert_eq!(cli.poll_ms, 2500);
        assert_eq!(cli.loading_floor_ms, 500);
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn once_wins_over_plain() {
        let cli = Cli::parse_from(["piponger-dash", "--plain", "--once"]);
        assert_eq!(cli.mode(), Mode::Once);
        let cli = Cli::parse_from(["piponger-dash", "--plain", "--addr", "https://node:8443"]);
        assert_eq!(cli.mode(), Mode::Plain);
        assert_eq!(cli.addr, "https://node:8443");
    }
}
