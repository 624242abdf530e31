use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use backend_infrastructure::CONFIG_ENV;

#[derive(Parser, Debug)]
#[command(name = "ledgerscope")]
#[command(about = "Ledgerscope balance anomaly server", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Also write daily-rotated logs into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer())
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log dir {}", dir.display()))?;
    let (writer, guard) = non_blocking(rolling::daily(dir, "ledgerscope.log"));
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // dropping the guard flushes buffered file logs
    let _guard = init_tracing(args.log_dir.as_deref())?;

    if let Some(config) = args.config {
        std::env::set_var(CONFIG_ENV, config);
    }

    backend_bootstrap::run_standalone().await
}
