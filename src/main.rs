mod plugins;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jobwire_config::RoutingDef;
use jobwire_engine::{Engine, Registry};

/// Jobwire - routes trigger events to jobs
#[derive(Parser)]
#[command(name = "jobwire")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the routing file (default: ~/.jobwire/routing.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Start the engine and run until interrupted
  Run {
    /// Period of the built-in `tick` trigger in milliseconds
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,
  },

  /// Validate the routing file against the built-in plugins
  Check,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging();

  let config = match cli.config {
    Some(path) => path,
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".jobwire")
      .join("routing.json"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  match cli.command {
    Some(Commands::Run { interval_ms }) => {
      rt.block_on(run(&config, Duration::from_millis(interval_ms)))
    }
    Some(Commands::Check) => rt.block_on(check(&config)),
    None => {
      println!("jobwire - use --help to see available commands");
      Ok(())
    }
  }
}

fn init_logging() {
  let filter =
    EnvFilter::try_from_env("JOBWIRE_LOG").unwrap_or_else(|_| EnvFilter::new("jobwire=info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}

/// Build a registry holding the built-ins and the routers from `path`.
async fn load_registry(path: &Path, interval: Duration) -> Result<(Registry, RoutingDef)> {
  let routing = RoutingDef::load(path)
    .await
    .with_context(|| format!("failed to load routing file: {}", path.display()))?;

  let registry = Registry::new();
  plugins::register_builtins(&registry, interval).context("failed to register built-ins")?;
  registry
    .apply_routing(&routing)
    .with_context(|| format!("invalid routing in {}", path.display()))?;

  Ok((registry, routing))
}

async fn run(path: &Path, interval: Duration) -> Result<()> {
  let (registry, routing) = load_registry(path, interval).await?;
  tracing::info!(
    routers = routing.routers.len(),
    jobs = routing.job_count(),
    "routing loaded"
  );

  let engine = Engine::new(Arc::new(registry));
  engine.start().context("failed to start engine")?;

  tokio::signal::ctrl_c()
    .await
    .context("failed to listen for ctrl-c")?;

  engine.stop().await.context("failed to stop engine")?;
  Ok(())
}

async fn check(path: &Path) -> Result<()> {
  let (_, routing) = load_registry(path, Duration::from_secs(1)).await?;
  println!(
    "{}: ok ({} routers, {} jobs)",
    path.display(),
    routing.routers.len(),
    routing.job_count()
  );
  Ok(())
}
