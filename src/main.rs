use clap::{Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shelfmark::app::App;
use shelfmark::config::Config;
use shelfmark::proxy;

#[derive(Parser, Debug)]
#[command(name = "shelfmark")]
#[command(about = "A terminal watchlist backed by a hosted record store")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/shelfmark/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run the record proxy and offline asset cache
  Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;

  match args.command {
    Some(Command::Serve) => {
      tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

      proxy::serve(config).await
    }
    None => {
      // The TUI owns stdout while the terminal is in raw mode; logs go to a file
      let _guard = init_file_logging()?;

      let mut app = App::new(config).await?;
      app.run().await
    }
  }
}

fn init_file_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
  let log_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?
    .join("shelfmark");

  std::fs::create_dir_all(&log_dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", log_dir.display(), e))?;

  let appender = tracing_appender::rolling::never(log_dir, "shelfmark.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Ok(guard)
}
