mod cli;
mod commands;
mod config;
mod render;

use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};

use anyhow::{bail, Result};
use clap::Parser;
use fanpulse_engine::{ApiClient, ChannelNotificationSink, QueryCache};
use fanpulse_logging::DEFAULT_LOG_FILE;

use cli::{Cli, Command, ConfigAction};
use commands::AppContext;
use config::{AppConfig, CONFIG_FILENAME};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    if let Command::Config { action } = &cli.command {
        return run_config(action, &config_path);
    }

    let config = AppConfig::load(&config_path)?;
    fanpulse_logging::initialize(
        config.log_destination(),
        cli.log_level,
        Path::new(DEFAULT_LOG_FILE),
    );

    let settings = config.gateway_settings(|key| std::env::var(key).ok())?;
    let (tx, rx) = mpsc::channel();
    let api = ApiClient::new(&settings, Arc::new(ChannelNotificationSink::new(tx)))?;
    let ctx = AppContext {
        api,
        cache: Arc::new(QueryCache::new()),
        config,
        notices: rx,
    };

    let result = commands::run(cli.command, &ctx).await;
    ctx.flush_notices();
    result
}

fn run_config(action: &ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!("{} already exists, use --force to overwrite", path.display());
            }
            let written = AppConfig::default().save(path)?;
            println!("Wrote {}", written.display());
        }
        ConfigAction::Show => {
            let config = AppConfig::load(path)?;
            let pretty = ron::ser::PrettyConfig::new();
            println!("{}", ron::ser::to_string_pretty(&config, pretty)?);
        }
    }
    Ok(())
}
